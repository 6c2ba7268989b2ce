//! The output sink commands and requirements report through.
//!
//! Everything user-visible flows through the [`Ui`] trait so tests can
//! capture it with a stand-in. [`TerminalUi`] is the stdout implementation
//! used by the binary.

/// Where command output goes: descriptive lines, warnings, and the
/// terminal OK / FAILED markers.
pub trait Ui: Send + Sync {
    fn say(&self, message: &str);
    fn warn(&self, message: &str);
    fn ok(&self);
    fn failed(&self, message: &str);
    fn fail_with_usage(&self, usage: &str);

    /// Forward every warning from a response envelope, in order.
    fn warn_all(&self, warnings: &[String]) {
        for warning in warnings {
            self.warn(warning);
        }
    }
}

/// Plain stdout/stderr sink.
pub struct TerminalUi;

impl Ui for TerminalUi {
    fn say(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn ok(&self) {
        println!("OK");
    }

    fn failed(&self, message: &str) {
        println!("FAILED");
        println!("{message}");
    }

    fn fail_with_usage(&self, usage: &str) {
        println!("FAILED");
        println!("Incorrect Usage. Usage: {usage}");
    }
}
