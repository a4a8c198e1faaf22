//! Planner configuration.

/// Recognized planner options and their effects.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Upper bound on turn-history entries in State; oldest evicted.
    pub max_history_size: usize,
    /// Enable working-context prepending.
    pub augment_user_message: bool,
    /// Label before augmenter output.
    pub context_prefix: String,
    /// Label before user message.
    pub request_prefix: String,
    /// Current blob version for serialization.
    pub schema_version: u16,
    /// Make the assembled prompt available via a hook.
    pub capture_readable_prompt: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_history_size: 10,
            augment_user_message: true,
            context_prefix: "Current state:".to_string(),
            request_prefix: "User request:".to_string(),
            schema_version: 1,
            capture_readable_prompt: false,
        }
    }
}

impl PlannerConfig {
    /// Load overrides from the process environment, falling back to
    /// `Default` for unset variables — the `AnthropicClient::from_env`
    /// style used throughout the LLM client layer.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_history_size: env_usize("CONVO_MAX_HISTORY_SIZE", defaults.max_history_size),
            augment_user_message: env_bool("CONVO_AUGMENT_USER_MESSAGE", defaults.augment_user_message),
            context_prefix: std::env::var("CONVO_CONTEXT_PREFIX").unwrap_or(defaults.context_prefix),
            request_prefix: std::env::var("CONVO_REQUEST_PREFIX").unwrap_or(defaults.request_prefix),
            schema_version: env_u16("CONVO_SCHEMA_VERSION", defaults.schema_version),
            capture_readable_prompt: env_bool("CONVO_CAPTURE_READABLE_PROMPT", defaults.capture_readable_prompt),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_history_size, 10);
        assert!(config.augment_user_message);
        assert_eq!(config.context_prefix, "Current state:");
        assert_eq!(config.request_prefix, "User request:");
        assert_eq!(config.schema_version, 1);
        assert!(!config.capture_readable_prompt);
    }
}
