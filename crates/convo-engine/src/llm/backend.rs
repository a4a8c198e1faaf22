//! Which `LlmClient` implementation to construct, selected via the
//! `AGENT_BACKEND` environment variable.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentBackend {
    Anthropic,
    OpenAi,
}

impl Default for AgentBackend {
    fn default() -> Self {
        AgentBackend::Anthropic
    }
}

impl FromStr for AgentBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(AgentBackend::Anthropic),
            "openai" | "gpt" => Ok(AgentBackend::OpenAi),
            other => Err(format!("unknown AGENT_BACKEND: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_backend_names() {
        assert_eq!("anthropic".parse::<AgentBackend>().unwrap(), AgentBackend::Anthropic);
        assert_eq!("OpenAI".parse::<AgentBackend>().unwrap(), AgentBackend::OpenAi);
    }

    #[test]
    fn unknown_backend_name_is_an_error() {
        assert!("mistral".parse::<AgentBackend>().is_err());
    }

    #[test]
    fn defaults_to_anthropic() {
        assert_eq!(AgentBackend::default(), AgentBackend::Anthropic);
    }
}
