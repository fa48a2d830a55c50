use serde::{Deserialize, Serialize};

/// Host configuration for [`EventLoop`](crate::runtime::event_loop::EventLoop).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Initial reading of the virtual clock, in milliseconds.
    pub start_ms: u64,
    /// Print timer and invocation events to stdout.
    pub trace: bool,
}

impl RuntimeConfig {
    pub fn from_json_str(source: &str) -> Result<Self, String> {
        serde_json::from_str(source).map_err(|e| format!("invalid runtime config: {}", e))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
