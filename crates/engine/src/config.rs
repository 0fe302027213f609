//! Game loop configuration.

/// Settings for [`GameLoop`](crate::GameLoop)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Piece stream seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Capacity of the command queue
    pub max_pending_commands: usize,
    /// Whether the loop runs its own gravity timer
    pub gravity: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_pending_commands: 32,
            gravity: true,
        }
    }
}

impl LoopConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let seed = env::var("BLOCKFALL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let max_pending_commands = env::var("BLOCKFALL_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        let gravity = env::var("BLOCKFALL_GRAVITY")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.gravity);

        Self {
            seed,
            max_pending_commands,
            gravity,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
