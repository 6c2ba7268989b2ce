//! One instrumented stand-in per dependency interface.
//!
//! Method cells are public fields so tests script and assert on them
//! directly: `apps.find_by_name.set_returns(...)`,
//! `routes.bind.call_count()`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{InvocationLog, MethodCell};
use crate::api::{
    ApiResponse, Application, ApplicationRepository, Organization, OrganizationActor, Quota,
    QuotaRepository, Route, RouteRepository,
};
use crate::requirements::{
    ApplicationRequirement, OrganizationRequirement, Requirement, RequirementError,
    RequirementFactory, RouteRequirement,
};
use crate::terminal::Ui;

pub struct FakeApplicationRepository {
    pub find_by_name: MethodCell<String, ApiResponse<Application>>,
    log: Arc<InvocationLog>,
}

impl FakeApplicationRepository {
    pub fn new() -> Self {
        let log = Arc::new(InvocationLog::new());
        Self {
            find_by_name: MethodCell::new("find_by_name", Arc::clone(&log)),
            log,
        }
    }

    pub fn invocations(&self) -> HashMap<String, Vec<Vec<String>>> {
        self.log.snapshot()
    }
}

impl Default for FakeApplicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplicationRepository for FakeApplicationRepository {
    async fn find_by_name(&self, name: &str) -> ApiResponse<Application> {
        self.find_by_name
            .invoke(name.to_string(), vec![name.to_string()])
            .unwrap_or_default()
    }
}

pub struct FakeRouteRepository {
    pub find_by_host_and_domain: MethodCell<(String, String), ApiResponse<Route>>,
    pub bind: MethodCell<(Route, Application), ApiResponse<()>>,
    pub unbind: MethodCell<(Route, Application), ApiResponse<()>>,
    log: Arc<InvocationLog>,
}

impl FakeRouteRepository {
    pub fn new() -> Self {
        let log = Arc::new(InvocationLog::new());
        Self {
            find_by_host_and_domain: MethodCell::new(
                "find_by_host_and_domain",
                Arc::clone(&log),
            ),
            bind: MethodCell::new("bind", Arc::clone(&log)),
            unbind: MethodCell::new("unbind", Arc::clone(&log)),
            log,
        }
    }

    pub fn invocations(&self) -> HashMap<String, Vec<Vec<String>>> {
        self.log.snapshot()
    }
}

impl Default for FakeRouteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteRepository for FakeRouteRepository {
    async fn find_by_host_and_domain(&self, host: &str, domain: &str) -> ApiResponse<Route> {
        self.find_by_host_and_domain
            .invoke(
                (host.to_string(), domain.to_string()),
                vec![host.to_string(), domain.to_string()],
            )
            .unwrap_or_default()
    }

    async fn bind(&self, route: &Route, app: &Application) -> ApiResponse<()> {
        self.bind
            .invoke(
                (route.clone(), app.clone()),
                vec![route.url(), app.name.clone()],
            )
            .unwrap_or_default()
    }

    async fn unbind(&self, route: &Route, app: &Application) -> ApiResponse<()> {
        self.unbind
            .invoke(
                (route.clone(), app.clone()),
                vec![route.url(), app.name.clone()],
            )
            .unwrap_or_default()
    }
}

pub struct FakeQuotaRepository {
    pub find_all: MethodCell<(), ApiResponse<Vec<Quota>>>,
    log: Arc<InvocationLog>,
}

impl FakeQuotaRepository {
    pub fn new() -> Self {
        let log = Arc::new(InvocationLog::new());
        Self {
            find_all: MethodCell::new("find_all", Arc::clone(&log)),
            log,
        }
    }

    pub fn invocations(&self) -> HashMap<String, Vec<Vec<String>>> {
        self.log.snapshot()
    }
}

impl Default for FakeQuotaRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuotaRepository for FakeQuotaRepository {
    async fn find_all(&self) -> ApiResponse<Vec<Quota>> {
        self.find_all.invoke((), vec![]).unwrap_or_default()
    }
}

pub struct FakeOrganizationActor {
    pub get_organization: MethodCell<String, ApiResponse<Organization>>,
    log: Arc<InvocationLog>,
}

impl FakeOrganizationActor {
    pub fn new() -> Self {
        let log = Arc::new(InvocationLog::new());
        Self {
            get_organization: MethodCell::new("get_organization", Arc::clone(&log)),
            log,
        }
    }

    pub fn invocations(&self) -> HashMap<String, Vec<Vec<String>>> {
        self.log.snapshot()
    }
}

impl Default for FakeOrganizationActor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationActor for FakeOrganizationActor {
    async fn get_organization(&self, name: &str) -> ApiResponse<Organization> {
        self.get_organization
            .invoke(name.to_string(), vec![name.to_string()])
            .unwrap_or_default()
    }
}

/// Captures everything a command says, in order, one entry per line.
/// OK and FAILED markers are recorded the way the terminal prints them.
pub struct FakeUi {
    outputs: Mutex<Vec<String>>,
}

impl FakeUi {
    pub fn new() -> Self {
        Self {
            outputs: Mutex::new(Vec::new()),
        }
    }

    pub fn outputs(&self) -> Vec<String> {
        self.outputs.lock().unwrap().clone()
    }

    /// True when some single output line contains all the given parts,
    /// left to right.
    pub fn contains(&self, parts: &[&str]) -> bool {
        self.outputs().iter().any(|line| {
            let mut rest = line.as_str();
            for part in parts {
                match rest.find(part) {
                    Some(at) => rest = &rest[at + part.len()..],
                    None => return false,
                }
            }
            true
        })
    }

    pub fn printed_ok(&self) -> bool {
        self.outputs().iter().any(|line| line == "OK")
    }

    pub fn printed_failed(&self) -> bool {
        self.outputs().iter().any(|line| line == "FAILED")
    }

    fn push(&self, line: String) {
        self.outputs.lock().unwrap().push(line);
    }
}

impl Default for FakeUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for FakeUi {
    fn say(&self, message: &str) {
        self.push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.push(format!("warning: {message}"));
    }

    fn ok(&self) {
        self.push("OK".to_string());
    }

    fn failed(&self, message: &str) {
        self.push("FAILED".to_string());
        self.push(message.to_string());
    }

    fn fail_with_usage(&self, usage: &str) {
        self.push("FAILED".to_string());
        self.push(format!("Incorrect Usage. Usage: {usage}"));
    }
}

/// A scripted requirement: passes or fails on demand and counts how many
/// times the runner executed it.
pub struct FakeRequirement {
    outcome: Option<RequirementError>,
    executions: AtomicUsize,
}

impl FakeRequirement {
    pub fn passing() -> Arc<Self> {
        Arc::new(Self {
            outcome: None,
            executions: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: RequirementError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Some(error),
            executions: AtomicUsize::new(0),
        })
    }

    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Requirement for FakeRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            None => Ok(()),
            Some(error) => Err(error.clone()),
        }
    }
}

/// A requirement factory wired to fake collaborators. Resource
/// requirements are real ones resolving against the fake repositories,
/// so scripting the repositories scripts the requirements; the login
/// requirement is a scripted pass/fail toggle.
pub struct FakeFactory {
    pub login_success: AtomicBool,
    pub apps: Arc<FakeApplicationRepository>,
    pub routes: Arc<FakeRouteRepository>,
    pub quotas: Arc<FakeQuotaRepository>,
    pub orgs: Arc<FakeOrganizationActor>,
    pub ui: Arc<FakeUi>,
    requested: Mutex<Vec<String>>,
}

impl FakeFactory {
    pub fn logged_in() -> Self {
        Self::new(true)
    }

    pub fn logged_out() -> Self {
        Self::new(false)
    }

    fn new(login_success: bool) -> Self {
        Self {
            login_success: AtomicBool::new(login_success),
            apps: Arc::new(FakeApplicationRepository::new()),
            routes: Arc::new(FakeRouteRepository::new()),
            quotas: Arc::new(FakeQuotaRepository::new()),
            orgs: Arc::new(FakeOrganizationActor::new()),
            ui: Arc::new(FakeUi::new()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Which requirements commands asked for, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn note(&self, entry: String) {
        self.requested.lock().unwrap().push(entry);
    }
}

impl RequirementFactory for FakeFactory {
    fn login(&self) -> Arc<dyn Requirement> {
        if self.login_success.load(Ordering::SeqCst) {
            FakeRequirement::passing()
        } else {
            FakeRequirement::failing(RequirementError::NotLoggedIn)
        }
    }

    fn application(&self, name: &str) -> Arc<ApplicationRequirement> {
        self.note(format!("application {name}"));
        Arc::new(ApplicationRequirement::new(
            name,
            self.apps.clone(),
            self.ui.clone(),
        ))
    }

    fn route(&self, host: &str, domain: &str) -> Arc<RouteRequirement> {
        let label = if host.is_empty() {
            domain.to_string()
        } else {
            format!("{host}.{domain}")
        };
        self.note(format!("route {label}"));
        Arc::new(RouteRequirement::new(
            host,
            domain,
            self.routes.clone(),
            self.ui.clone(),
        ))
    }

    fn organization(&self, name: &str) -> Arc<OrganizationRequirement> {
        self.note(format!("org {name}"));
        Arc::new(OrganizationRequirement::new(
            name,
            self.orgs.clone(),
            self.ui.clone(),
        ))
    }
}
