//! Executes a command's declared requirements in order, short-circuiting
//! on the first failure, and only then invokes the run phase.

use super::{Command, CommandArgs, CommandError};
use crate::requirements::{RequirementError, RequirementFactory};
use crate::terminal::Ui;

/// What happened when a command went through the gate. Distinguishes
/// "requirements were never evaluated" (malformed input) from "evaluated
/// and failed" from "passed and ran".
#[derive(Debug)]
pub enum RunOutcome {
    /// `get_requirements` rejected the invocation; nothing was evaluated.
    UsageError(CommandError),
    /// A requirement failed; later requirements and the run phase never
    /// executed.
    RequirementsFailed(RequirementError),
    /// Every requirement passed and the run phase executed.
    Ran(Result<(), CommandError>),
}

impl RunOutcome {
    pub fn requirements_passed(&self) -> bool {
        matches!(self, RunOutcome::Ran(_))
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, RunOutcome::Ran(Ok(())))
    }
}

/// The requirement gate. Usage and requirement failures are reported
/// through the sink here; the run phase reports its own outcome.
pub async fn run_command(
    command: &mut dyn Command,
    args: &CommandArgs,
    factory: &dyn RequirementFactory,
    ui: &dyn Ui,
) -> RunOutcome {
    let requirements = match command.get_requirements(factory, args) {
        Ok(requirements) => requirements,
        Err(CommandError::Usage(usage)) => {
            ui.fail_with_usage(&usage);
            return RunOutcome::UsageError(CommandError::Usage(usage));
        }
        Err(other) => {
            ui.failed(&other.to_string());
            return RunOutcome::UsageError(other);
        }
    };

    for requirement in &requirements {
        if let Err(error) = requirement.execute().await {
            ui.failed(&error.to_string());
            return RunOutcome::RequirementsFailed(error);
        }
    }

    RunOutcome::Ran(command.run(args).await)
}
