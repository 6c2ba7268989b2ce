//! Preconditions a command declares before it is allowed to run.
//!
//! A [`Requirement`] either passes or fails with a [`RequirementError`].
//! Named-resource requirements (application, route, organization) resolve
//! their selector against the platform exactly once and cache the result,
//! so the owning command's run phase reuses it instead of re-resolving.
//! Warnings emitted during resolution go straight to the shared [`Ui`]
//! sink.

pub mod application;
pub mod login;
pub mod organization;
pub mod route;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApplicationRepository, OrganizationActor, RouteRepository};
use crate::session::Session;
use crate::terminal::Ui;

pub use application::ApplicationRequirement;
pub use login::LoginRequirement;
pub use organization::OrganizationRequirement;
pub use route::RouteRequirement;

/// A precondition that was not met.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequirementError {
    #[error("Not logged in. Use 'strato login' to log in first")]
    NotLoggedIn,
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
    #[error("{0}")]
    Lookup(String),
}

impl RequirementError {
    pub fn not_found(kind: &'static str, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }
}

/// A single pass/fail precondition check.
///
/// `execute` must be idempotent: the runner invokes it exactly once per
/// command run, but a second invocation must not repeat remote work.
#[async_trait]
pub trait Requirement: Send + Sync {
    async fn execute(&self) -> Result<(), RequirementError>;
}

impl std::fmt::Debug for dyn Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Requirement")
    }
}

/// Hands out requirement variants to commands. Commands never construct
/// requirements directly, so tests can substitute scripted ones.
pub trait RequirementFactory: Send + Sync {
    fn login(&self) -> Arc<dyn Requirement>;
    fn application(&self, name: &str) -> Arc<ApplicationRequirement>;
    fn route(&self, host: &str, domain: &str) -> Arc<RouteRequirement>;
    fn organization(&self, name: &str) -> Arc<OrganizationRequirement>;
}

/// The factory the binary wires up: real session, real repositories.
pub struct PlatformFactory {
    session: Arc<Session>,
    apps: Arc<dyn ApplicationRepository>,
    routes: Arc<dyn RouteRepository>,
    orgs: Arc<dyn OrganizationActor>,
    ui: Arc<dyn Ui>,
}

impl PlatformFactory {
    pub fn new(
        session: Arc<Session>,
        apps: Arc<dyn ApplicationRepository>,
        routes: Arc<dyn RouteRepository>,
        orgs: Arc<dyn OrganizationActor>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            session,
            apps,
            routes,
            orgs,
            ui,
        }
    }
}

impl RequirementFactory for PlatformFactory {
    fn login(&self) -> Arc<dyn Requirement> {
        Arc::new(LoginRequirement::new(Arc::clone(&self.session)))
    }

    fn application(&self, name: &str) -> Arc<ApplicationRequirement> {
        Arc::new(ApplicationRequirement::new(
            name,
            Arc::clone(&self.apps),
            Arc::clone(&self.ui),
        ))
    }

    fn route(&self, host: &str, domain: &str) -> Arc<RouteRequirement> {
        Arc::new(RouteRequirement::new(
            host,
            domain,
            Arc::clone(&self.routes),
            Arc::clone(&self.ui),
        ))
    }

    fn organization(&self, name: &str) -> Arc<OrganizationRequirement> {
        Arc::new(OrganizationRequirement::new(
            name,
            Arc::clone(&self.orgs),
            Arc::clone(&self.ui),
        ))
    }
}
