//! org: show one organization, resolved through the organization actor
//! during the requirements phase and displayed from the cached resource.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Command, CommandArgs, CommandError, report_failed};
use crate::requirements::{OrganizationRequirement, Requirement, RequirementFactory};
use crate::session::Session;
use crate::terminal::Ui;

const USAGE: &str = "org NAME";

pub struct ShowOrg {
    ui: Arc<dyn Ui>,
    session: Arc<Session>,
    org_req: Option<Arc<OrganizationRequirement>>,
}

impl ShowOrg {
    pub fn new(ui: Arc<dyn Ui>, session: Arc<Session>) -> Self {
        Self {
            ui,
            session,
            org_req: None,
        }
    }
}

#[async_trait]
impl Command for ShowOrg {
    fn get_requirements(
        &mut self,
        factory: &dyn RequirementFactory,
        args: &CommandArgs,
    ) -> Result<Vec<Arc<dyn Requirement>>, CommandError> {
        let [name] = args.positional() else {
            return Err(CommandError::Usage(USAGE.to_string()));
        };

        let org_req = factory.organization(name);
        self.org_req = Some(Arc::clone(&org_req));

        let requirements: Vec<Arc<dyn Requirement>> = vec![factory.login(), org_req];
        Ok(requirements)
    }

    async fn run(&mut self, _args: &CommandArgs) -> Result<(), CommandError> {
        let org = self
            .org_req
            .as_ref()
            .expect("org command run before requirements")
            .organization();

        let identity = self
            .session
            .identity()
            .map_err(|e| report_failed(self.ui.as_ref(), e.to_string()))?;

        self.ui.say(&format!(
            "Getting info for org {} as {}...",
            org.name, identity.username
        ));
        self.ui.ok();
        self.ui.say("");
        self.ui.say(&format!("  name:     {}", org.name));
        self.ui.say(&format!("  quota:    {}", org.quota_name));
        self.ui
            .say(&format!("  domains:  {}", org.domains.join(", ")));
        Ok(())
    }
}
