// Panel isolation for the CLI.
//
// A panel is any fallible unit of dashboard output. One panel failing is
// logged and recorded, and the caller moves on to the next one.
use crate::error::Result;
use tracing::error;

#[derive(Debug, Default)]
pub struct PanelRun {
    failed: Vec<(String, String)>,
}

impl PanelRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `panel`, keeping its error instead of propagating it.
    pub fn run(&mut self, name: &str, panel: impl FnOnce() -> Result<()>) -> bool {
        match panel() {
            Ok(()) => true,
            Err(e) => {
                error!(panel = name, error = %e, "panel failed");
                eprintln!("Error in {} panel: {}\n", name, e);
                self.failed.push((name.to_string(), e.to_string()));
                false
            }
        }
    }

    /// Count a failure that happened outside any panel (e.g. the summary write).
    pub fn record_failure(&mut self, name: &str, message: impl Into<String>) {
        self.failed.push((name.to_string(), message.into()));
    }

    pub fn failures(&self) -> usize {
        self.failed.len()
    }

    /// Names of failed panels, in run order.
    pub fn failed_panels(&self) -> Vec<&str> {
        self.failed.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}
