use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Requirement, RequirementError};
use crate::api::{ApiError, Organization, OrganizationActor};
use crate::terminal::Ui;

/// Resolves an organization by name through the organization actor and
/// caches it.
pub struct OrganizationRequirement {
    name: String,
    orgs: Arc<dyn OrganizationActor>,
    ui: Arc<dyn Ui>,
    resolved: RwLock<Option<Organization>>,
}

impl OrganizationRequirement {
    pub fn new(name: &str, orgs: Arc<dyn OrganizationActor>, ui: Arc<dyn Ui>) -> Self {
        Self {
            name: name.to_string(),
            orgs,
            ui,
            resolved: RwLock::new(None),
        }
    }

    /// The resolved organization.
    ///
    /// # Panics
    ///
    /// Panics if read before a successful `execute()`.
    pub fn organization(&self) -> Organization {
        self.resolved
            .read()
            .unwrap()
            .clone()
            .expect("organization requirement read before execution")
    }
}

#[async_trait]
impl Requirement for OrganizationRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        if self.resolved.read().unwrap().is_some() {
            return Ok(());
        }

        let (value, warnings, error) =
            self.orgs.get_organization(&self.name).await.into_parts();
        self.ui.warn_all(&warnings);

        if let Some(error) = error {
            return Err(match error {
                ApiError::NotFound { .. } => RequirementError::not_found("Org", &self.name),
                other => RequirementError::Lookup(other.to_string()),
            });
        }

        let org = value.ok_or_else(|| RequirementError::not_found("Org", &self.name))?;
        *self.resolved.write().unwrap() = Some(org);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResponse;
    use crate::testkit::fakes::{FakeOrganizationActor, FakeUi};

    fn sample_org() -> Organization {
        Organization {
            guid: "org-guid".to_string(),
            name: "my-org".to_string(),
            quota_name: "default".to_string(),
            domains: vec!["example.com".to_string()],
        }
    }

    #[tokio::test]
    async fn resolves_through_the_actor() {
        let orgs = Arc::new(FakeOrganizationActor::new());
        orgs.get_organization.set_returns(ApiResponse::ok(sample_org()));
        let ui = Arc::new(FakeUi::new());

        let requirement = OrganizationRequirement::new("my-org", orgs.clone(), ui);
        requirement.execute().await.unwrap();

        assert_eq!(requirement.organization(), sample_org());
        assert_eq!(orgs.get_organization.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_organization_fails() {
        let orgs = Arc::new(FakeOrganizationActor::new());
        orgs.get_organization
            .set_returns(ApiResponse::fail(ApiError::not_found("Org", "ghost-org")));
        let ui = Arc::new(FakeUi::new());

        let requirement = OrganizationRequirement::new("ghost-org", orgs, ui);
        assert_eq!(
            requirement.execute().await,
            Err(RequirementError::not_found("Org", "ghost-org"))
        );
    }
}
