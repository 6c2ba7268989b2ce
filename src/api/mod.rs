//! Platform API surface: the response envelope, the resource models, and
//! the repository/actor traits commands talk to.
//!
//! Every remote-facing call returns an [`ApiResponse`] carrying three things
//! at once: the typed value (on success), an ordered list of non-fatal
//! warnings, and the error (on failure). Warnings can accompany either
//! outcome and callers are expected to surface them regardless.

pub mod http;

use async_trait::async_trait;

/// Ordered, human-readable diagnostics accumulated during a remote call.
pub type Warnings = Vec<String>;

/// A remote call failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{kind} {name} not found")]
    NotFound { kind: String, name: String },
    #[error("{0}")]
    Failed(String),
    #[error("cannot reach the platform API: {0}")]
    Unreachable(String),
}

impl ApiError {
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

/// The envelope returned by every repository/actor call.
///
/// Unlike a plain `Result`, the warnings travel with both outcomes, so a
/// failed call can still hand its diagnostics to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    value: Option<T>,
    warnings: Warnings,
    error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying a value and no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            warnings: Vec::new(),
            error: None,
        }
    }

    /// A failed response carrying no value.
    pub fn fail(error: ApiError) -> Self {
        Self {
            value: None,
            warnings: Vec::new(),
            error: Some(error),
        }
    }

    /// Attach warnings to either kind of response.
    pub fn with_warnings(mut self, warnings: Warnings) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Split the envelope so value, warnings, and error propagate together.
    pub fn into_parts(self) -> (Option<T>, Warnings, Option<ApiError>) {
        (self.value, self.warnings, self.error)
    }
}

/// The zero envelope: a success with no value and no warnings. Stand-ins
/// return this when no return value has been configured.
impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            value: None,
            warnings: Vec::new(),
            error: None,
        }
    }
}

// ── Models ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Application {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub guid: String,
    pub host: String,
    pub domain: Domain,
}

impl Route {
    /// Full URL of the route: `host.domain`, or just the domain for
    /// hostless routes.
    pub fn url(&self) -> String {
        if self.host.is_empty() {
            self.domain.name.clone()
        } else {
            format!("{}.{}", self.host, self.domain.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Organization {
    pub guid: String,
    pub name: String,
    pub quota_name: String,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quota {
    pub name: String,
    pub memory_limit_mb: u64,
    pub routes_limit: u32,
    pub services_limit: u32,
    pub non_basic_services_allowed: bool,
}

impl Quota {
    /// Memory limit rendered for the quota table: whole gigabytes as
    /// `"1G"`, everything else as megabytes (`"434M"`).
    pub fn memory_display(&self) -> String {
        if self.memory_limit_mb > 0 && self.memory_limit_mb % 1024 == 0 {
            format!("{}G", self.memory_limit_mb / 1024)
        } else {
            format!("{}M", self.memory_limit_mb)
        }
    }
}

// ── Repository / actor traits ─────────────────────────────────────

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> ApiResponse<Application>;
}

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn find_by_host_and_domain(&self, host: &str, domain: &str) -> ApiResponse<Route>;
    async fn bind(&self, route: &Route, app: &Application) -> ApiResponse<()>;
    async fn unbind(&self, route: &Route, app: &Application) -> ApiResponse<()>;
}

#[async_trait]
pub trait QuotaRepository: Send + Sync {
    async fn find_all(&self) -> ApiResponse<Vec<Quota>>;
}

#[async_trait]
pub trait OrganizationActor: Send + Sync {
    async fn get_organization(&self, name: &str) -> ApiResponse<Organization>;
}
