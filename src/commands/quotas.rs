//! quotas: list every quota defined on the targeted platform.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Command, CommandArgs, CommandError, report_failed};
use crate::api::QuotaRepository;
use crate::requirements::{Requirement, RequirementFactory};
use crate::session::Session;
use crate::terminal::Ui;

const USAGE: &str = "quotas";

pub struct ListQuotas {
    ui: Arc<dyn Ui>,
    session: Arc<Session>,
    quotas: Arc<dyn QuotaRepository>,
}

impl ListQuotas {
    pub fn new(ui: Arc<dyn Ui>, session: Arc<Session>, quotas: Arc<dyn QuotaRepository>) -> Self {
        Self {
            ui,
            session,
            quotas,
        }
    }
}

#[async_trait]
impl Command for ListQuotas {
    fn get_requirements(
        &mut self,
        factory: &dyn RequirementFactory,
        args: &CommandArgs,
    ) -> Result<Vec<Arc<dyn Requirement>>, CommandError> {
        if !args.is_empty() {
            return Err(CommandError::Usage(USAGE.to_string()));
        }
        Ok(vec![factory.login()])
    }

    async fn run(&mut self, _args: &CommandArgs) -> Result<(), CommandError> {
        let identity = self
            .session
            .identity()
            .map_err(|e| report_failed(self.ui.as_ref(), e.to_string()))?;

        self.ui
            .say(&format!("Getting quotas as {}...", identity.username));

        let (value, warnings, error) = self.quotas.find_all().await.into_parts();
        self.ui.warn_all(&warnings);

        if let Some(error) = error {
            return Err(report_failed(self.ui.as_ref(), error.to_string()));
        }

        self.ui.ok();
        self.ui.say("");

        let quotas = value.unwrap_or_default();
        self.ui.say(&format!(
            "{:<28} {:>14} {:>8} {:>18} {:>20}",
            "name", "memory limit", "routes", "service instances", "paid service plans"
        ));
        for quota in quotas {
            self.ui.say(&format!(
                "{:<28} {:>14} {:>8} {:>18} {:>20}",
                quota.name,
                quota.memory_display(),
                quota.routes_limit,
                quota.services_limit,
                if quota.non_basic_services_allowed {
                    "allowed"
                } else {
                    "disallowed"
                },
            ));
        }
        Ok(())
    }
}
