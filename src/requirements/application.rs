use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Requirement, RequirementError};
use crate::api::{ApiError, Application, ApplicationRepository};
use crate::terminal::Ui;

/// Resolves an application by name and caches it for the command's run
/// phase. A missing application is a failure, never an empty value.
pub struct ApplicationRequirement {
    name: String,
    apps: Arc<dyn ApplicationRepository>,
    ui: Arc<dyn Ui>,
    resolved: RwLock<Option<Application>>,
}

impl ApplicationRequirement {
    pub fn new(name: &str, apps: Arc<dyn ApplicationRepository>, ui: Arc<dyn Ui>) -> Self {
        Self {
            name: name.to_string(),
            apps,
            ui,
            resolved: RwLock::new(None),
        }
    }

    /// The resolved application.
    ///
    /// # Panics
    ///
    /// Panics if read before a successful `execute()` — the runner makes
    /// that unreachable for commands going through it.
    pub fn application(&self) -> Application {
        self.resolved
            .read()
            .unwrap()
            .clone()
            .expect("application requirement read before execution")
    }
}

#[async_trait]
impl Requirement for ApplicationRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        if self.resolved.read().unwrap().is_some() {
            return Ok(());
        }

        let (value, warnings, error) = self.apps.find_by_name(&self.name).await.into_parts();
        self.ui.warn_all(&warnings);

        if let Some(error) = error {
            return Err(match error {
                ApiError::NotFound { .. } => {
                    RequirementError::not_found("Application", &self.name)
                }
                other => RequirementError::Lookup(other.to_string()),
            });
        }

        let app =
            value.ok_or_else(|| RequirementError::not_found("Application", &self.name))?;
        *self.resolved.write().unwrap() = Some(app);
        Ok(())
    }
}
