use std::sync::Arc;
use std::thread;

use strato::api::{ApiResponse, Application, ApplicationRepository};
use strato::testkit::fakes::{FakeApplicationRepository, FakeUi};
use strato::terminal::Ui;

fn app(name: &str) -> Application {
    Application {
        guid: format!("{name}-guid"),
        name: name.to_string(),
    }
}

// ── Precedence law: stub > per-call override > default ────────────

#[tokio::test]
async fn default_return_applies_to_every_call() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name.set_returns(ApiResponse::ok(app("default")));

    for _ in 0..3 {
        let reply = apps.find_by_name("anything").await;
        assert_eq!(reply.value().unwrap().name, "default");
    }
}

#[tokio::test]
async fn per_call_override_beats_the_default_on_its_ordinal_only() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name.set_returns(ApiResponse::ok(app("default")));
    apps.find_by_name
        .set_returns_on_call(1, ApiResponse::ok(app("second-call")));

    assert_eq!(
        apps.find_by_name("x").await.value().unwrap().name,
        "default"
    );
    assert_eq!(
        apps.find_by_name("x").await.value().unwrap().name,
        "second-call"
    );
    assert_eq!(
        apps.find_by_name("x").await.value().unwrap().name,
        "default"
    );
}

#[tokio::test]
async fn stub_wins_regardless_of_other_configuration() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name.set_returns(ApiResponse::ok(app("default")));
    apps.find_by_name
        .set_returns_on_call(0, ApiResponse::ok(app("override")));
    apps.find_by_name
        .set_stub(|name| ApiResponse::ok(app(&format!("stubbed-{name}"))));

    assert_eq!(
        apps.find_by_name("a").await.value().unwrap().name,
        "stubbed-a"
    );
    assert_eq!(
        apps.find_by_name("b").await.value().unwrap().name,
        "stubbed-b"
    );
}

#[tokio::test]
async fn unconfigured_method_returns_the_zero_envelope() {
    let apps = FakeApplicationRepository::new();
    let reply = apps.find_by_name("anything").await;
    assert!(reply.is_success());
    assert!(reply.value().is_none());
    assert!(reply.warnings().is_empty());
}

// ── Invocation log law ────────────────────────────────────────────

#[tokio::test]
async fn log_has_one_entry_per_call_in_call_order() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name("first").await;
    apps.find_by_name("second").await;
    apps.find_by_name("third").await;

    assert_eq!(apps.find_by_name.call_count(), 3);
    let invocations = apps.invocations();
    assert_eq!(
        invocations["find_by_name"],
        [
            vec!["first".to_string()],
            vec!["second".to_string()],
            vec!["third".to_string()],
        ]
    );
}

#[tokio::test]
async fn snapshot_does_not_reflect_later_calls() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name("before").await;

    let snapshot = apps.invocations();
    apps.find_by_name("after").await;

    assert_eq!(snapshot["find_by_name"].len(), 1);
    assert_eq!(apps.invocations()["find_by_name"].len(), 2);
}

#[tokio::test]
async fn args_for_call_tracks_each_ordinal() {
    let apps = FakeApplicationRepository::new();
    apps.find_by_name("first").await;
    apps.find_by_name("second").await;

    assert_eq!(apps.find_by_name.args_for_call(0).unwrap(), "first");
    assert_eq!(apps.find_by_name.args_for_call(1).unwrap(), "second");
    assert!(apps.find_by_name.args_for_call(2).is_none());
}

// ── Concurrency ───────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_tasks_lose_no_calls() {
    let apps = Arc::new(FakeApplicationRepository::new());
    apps.find_by_name.set_returns(ApiResponse::ok(app("any")));

    let calls: Vec<_> = (0..32)
        .map(|i| {
            let apps = Arc::clone(&apps);
            tokio::spawn(async move { apps.find_by_name(&format!("app-{i}")).await })
        })
        .collect();
    let results = futures::future::join_all(calls).await;

    for result in results {
        assert!(result.unwrap().is_success());
    }
    assert_eq!(apps.find_by_name.call_count(), 32);
    assert_eq!(apps.invocations()["find_by_name"].len(), 32);
}

#[test]
fn concurrent_threads_can_script_and_read_while_calling() {
    let apps = Arc::new(FakeApplicationRepository::new());
    apps.find_by_name.set_returns(ApiResponse::ok(app("any")));
    let runtime = tokio::runtime::Runtime::new().unwrap();

    thread::scope(|scope| {
        for i in 0..8 {
            let apps = Arc::clone(&apps);
            let handle = runtime.handle().clone();
            scope.spawn(move || {
                handle.block_on(apps.find_by_name(&format!("app-{i}")));
                // Reads under the same lock discipline as the writes.
                let _ = apps.find_by_name.call_count();
                let _ = apps.invocations();
            });
        }
    });

    assert_eq!(apps.find_by_name.call_count(), 8);
}

// ── FakeUi capture ────────────────────────────────────────────────

#[test]
fn fake_ui_records_everything_in_order() {
    let ui = FakeUi::new();
    ui.say("Adding route...");
    ui.warn("careful");
    ui.ok();
    ui.failed("it broke");

    assert_eq!(
        ui.outputs(),
        [
            "Adding route...",
            "warning: careful",
            "OK",
            "FAILED",
            "it broke",
        ]
    );
    assert!(ui.printed_ok());
    assert!(ui.printed_failed());
}

#[test]
fn contains_matches_parts_in_order_within_one_line() {
    let ui = FakeUi::new();
    ui.say("Adding route my-host.example.com to app my-app as admin...");

    assert!(ui.contains(&["Adding route", "my-app", "admin"]));
    assert!(!ui.contains(&["admin", "Adding route"]));
    assert!(!ui.contains(&["no such text"]));
}
