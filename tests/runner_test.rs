use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use strato::commands::{Command, CommandArgs, CommandError, RunOutcome, run_command};
use strato::requirements::{Requirement, RequirementError, RequirementFactory};
use strato::testkit::fakes::{FakeFactory, FakeRequirement, FakeUi};

/// A command with scripted requirements, recording whether run executed.
struct ProbeCommand {
    requirements: Vec<Arc<dyn Requirement>>,
    usage_error: bool,
    ran: Arc<AtomicBool>,
}

impl ProbeCommand {
    fn with_requirements(requirements: Vec<Arc<dyn Requirement>>) -> Self {
        Self {
            requirements,
            usage_error: false,
            ran: Arc::new(AtomicBool::new(false)),
        }
    }

    fn with_usage_error() -> Self {
        Self {
            requirements: Vec::new(),
            usage_error: true,
            ran: Arc::new(AtomicBool::new(false)),
        }
    }

    fn did_run(&self) -> bool {
        self.ran.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for ProbeCommand {
    fn get_requirements(
        &mut self,
        _factory: &dyn RequirementFactory,
        _args: &CommandArgs,
    ) -> Result<Vec<Arc<dyn Requirement>>, CommandError> {
        if self.usage_error {
            return Err(CommandError::Usage("probe".to_string()));
        }
        Ok(self.requirements.clone())
    }

    async fn run(&mut self, _args: &CommandArgs) -> Result<(), CommandError> {
        self.ran.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A passing requirement that records its label into a shared trace.
struct TracingRequirement {
    label: &'static str,
    trace: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Requirement for TracingRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        self.trace.lock().unwrap().push(self.label);
        Ok(())
    }
}

#[tokio::test]
async fn zero_requirements_pass_trivially() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let mut cmd = ProbeCommand::with_requirements(vec![]);

    let outcome = run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    assert!(outcome.requirements_passed());
    assert!(cmd.did_run());
}

#[tokio::test]
async fn all_passing_requirements_each_execute_once_then_run() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let first = FakeRequirement::passing();
    let second = FakeRequirement::passing();
    let mut cmd = ProbeCommand::with_requirements(vec![first.clone(), second.clone()]);

    let outcome = run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    assert!(outcome.requirements_passed());
    assert!(cmd.did_run());
    assert_eq!(first.execution_count(), 1);
    assert_eq!(second.execution_count(), 1);
}

#[tokio::test]
async fn requirements_execute_in_declaration_order() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut cmd = ProbeCommand::with_requirements(vec![
        Arc::new(TracingRequirement {
            label: "login",
            trace: trace.clone(),
        }),
        Arc::new(TracingRequirement {
            label: "application",
            trace: trace.clone(),
        }),
        Arc::new(TracingRequirement {
            label: "route",
            trace: trace.clone(),
        }),
    ]);

    run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    assert_eq!(*trace.lock().unwrap(), ["login", "application", "route"]);
}

#[tokio::test]
async fn first_failure_short_circuits_the_rest() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let first = FakeRequirement::passing();
    let second = FakeRequirement::failing(RequirementError::NotLoggedIn);
    let third = FakeRequirement::passing();
    let mut cmd =
        ProbeCommand::with_requirements(vec![first.clone(), second.clone(), third.clone()]);

    let outcome = run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    assert!(!outcome.requirements_passed());
    assert!(matches!(
        outcome,
        RunOutcome::RequirementsFailed(RequirementError::NotLoggedIn)
    ));
    assert!(!cmd.did_run());
    assert_eq!(first.execution_count(), 1);
    assert_eq!(second.execution_count(), 1);
    assert_eq!(third.execution_count(), 0);
    assert!(ui.printed_failed());
}

#[tokio::test]
async fn usage_error_means_requirements_were_never_evaluated() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let mut cmd = ProbeCommand::with_usage_error();

    let outcome = run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    // Distinct from "evaluated and failed".
    assert!(matches!(outcome, RunOutcome::UsageError(_)));
    assert!(!outcome.requirements_passed());
    assert!(!cmd.did_run());
    assert!(ui.contains(&["Incorrect Usage", "probe"]));
}

#[tokio::test]
async fn requirement_failure_is_reported_through_the_sink() {
    let factory = FakeFactory::logged_in();
    let ui = FakeUi::new();
    let mut cmd = ProbeCommand::with_requirements(vec![FakeRequirement::failing(
        RequirementError::not_found("Application", "ghost"),
    )]);

    run_command(&mut cmd, &CommandArgs::default(), &factory, &ui).await;

    assert!(ui.printed_failed());
    assert!(ui.contains(&["Application", "ghost", "not found"]));
}
