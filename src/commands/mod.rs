//! User-invoked commands and the runner that gates them.
//!
//! A command has a two-phase contract: [`Command::get_requirements`]
//! validates the argument shape and declares an ordered list of
//! [`Requirement`]s, then [`Command::run`] performs the action — but only
//! after the runner has executed every requirement successfully. Run
//! reads resolved resources off the requirements it stored during phase
//! one, so no named resource is resolved twice in one invocation.

mod runner;

pub mod org;
pub mod quotas;
pub mod route_mapper;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::requirements::{Requirement, RequirementError, RequirementFactory};
use crate::terminal::Ui;

pub use runner::{RunOutcome, run_command};

/// Why a command invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Malformed invocation: wrong argument count or missing flag. Raised
    /// before any requirement is constructed.
    #[error("Incorrect Usage. Usage: {0}")]
    Usage(String),
    /// A declared requirement was not met; the action never ran.
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    /// The action itself was attempted and failed remotely.
    #[error("{0}")]
    Action(String),
}

/// The argument source handed to commands: positional arguments plus
/// named flag values, already split by the outer CLI layer.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    positional: Vec<String>,
    flags: HashMap<String, String>,
}

impl CommandArgs {
    pub fn new(positional: Vec<String>) -> Self {
        Self {
            positional,
            flags: HashMap::new(),
        }
    }

    pub fn with_flag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.flags.insert(name.to_string(), value.into());
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }
}

/// A user-invoked action with the two-phase contract.
#[async_trait]
pub trait Command: Send {
    /// Validate the argument shape, then construct the ordered requirement
    /// list. Must not construct any requirement on malformed input.
    fn get_requirements(
        &mut self,
        factory: &dyn RequirementFactory,
        args: &CommandArgs,
    ) -> Result<Vec<Arc<dyn Requirement>>, CommandError>;

    /// Perform the action. Only invoked after every declared requirement
    /// has passed. Reports its own outcome (OK / FAILED) through the sink.
    async fn run(&mut self, args: &CommandArgs) -> Result<(), CommandError>;
}

/// Report a failure through the sink and hand back the matching error.
/// Keeps the "every failure is visible" rule in one place for run phases.
pub(crate) fn report_failed(ui: &dyn Ui, message: impl Into<String>) -> CommandError {
    let message = message.into();
    ui.failed(&message);
    CommandError::Action(message)
}
