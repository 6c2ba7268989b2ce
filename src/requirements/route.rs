use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Requirement, RequirementError};
use crate::api::{ApiError, Route, RouteRepository};
use crate::terminal::Ui;

/// Resolves a route by host + domain and caches it. The host may be
/// empty for hostless routes.
pub struct RouteRequirement {
    host: String,
    domain: String,
    routes: Arc<dyn RouteRepository>,
    ui: Arc<dyn Ui>,
    resolved: RwLock<Option<Route>>,
}

impl RouteRequirement {
    pub fn new(host: &str, domain: &str, routes: Arc<dyn RouteRepository>, ui: Arc<dyn Ui>) -> Self {
        Self {
            host: host.to_string(),
            domain: domain.to_string(),
            routes,
            ui,
            resolved: RwLock::new(None),
        }
    }

    fn label(&self) -> String {
        if self.host.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.host, self.domain)
        }
    }

    /// The resolved route.
    ///
    /// # Panics
    ///
    /// Panics if read before a successful `execute()`.
    pub fn route(&self) -> Route {
        self.resolved
            .read()
            .unwrap()
            .clone()
            .expect("route requirement read before execution")
    }
}

#[async_trait]
impl Requirement for RouteRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        if self.resolved.read().unwrap().is_some() {
            return Ok(());
        }

        let (value, warnings, error) = self
            .routes
            .find_by_host_and_domain(&self.host, &self.domain)
            .await
            .into_parts();
        self.ui.warn_all(&warnings);

        if let Some(error) = error {
            return Err(match error {
                ApiError::NotFound { .. } => {
                    RequirementError::not_found("Route", &self.label())
                }
                other => RequirementError::Lookup(other.to_string()),
            });
        }

        let route = value.ok_or_else(|| RequirementError::not_found("Route", &self.label()))?;
        *self.resolved.write().unwrap() = Some(route);
        Ok(())
    }
}
