//! strato — a command-line client for the Strato platform.
//!
//! Commands follow a two-phase protocol: declare [`requirements`], have
//! them validated in order by the [`commands`] runner, then run the
//! action against the [`api`] repositories, surfacing the warnings every
//! remote call may carry. [`testkit`] holds the instrumented stand-ins
//! the test suite scripts and asserts on.

pub mod api;
pub mod commands;
pub mod requirements;
pub mod session;
pub mod terminal;
pub mod testkit;
