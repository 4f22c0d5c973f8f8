//! Client configuration for the supported hosted providers

use std::time::Duration;

use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

/// Supported hosted providers. All of them speak the same chat-completion
/// wire shape; the choice only selects defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    /// Cerebras inference API
    Cerebras,
    /// Groq inference API
    Groq,
    /// OpenAI API
    OpenAI,
}

impl LLMProvider {
    /// Parse a provider name as it appears in flags and environment
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cerebras" => Some(Self::Cerebras),
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Default endpoint base URL for the provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Cerebras => "https://api.cerebras.ai/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenAI => "https://api.openai.com/v1",
        }
    }

    /// Default model for the provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Cerebras => "llama3.1-70b",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    /// Provider name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cerebras => "cerebras",
            Self::Groq => "groq",
            Self::OpenAI => "openai",
        }
    }
}

impl Default for LLMProvider {
    fn default() -> Self {
        Self::Cerebras
    }
}

/// Chat client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider to talk to
    pub provider: LLMProvider,
    /// API key
    pub api_key: String,
    /// Endpoint base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self::for_provider(LLMProvider::default())
    }
}

impl LLMConfig {
    /// Configuration with a provider's defaults.
    /// The API key is left empty; callers overlay it explicitly or via
    /// [`LLMConfig::from_env`] so tests stay deterministic.
    pub fn for_provider(provider: LLMProvider) -> Self {
        Self {
            provider,
            api_key: String::new(),
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
            timeout: Duration::from_secs(45),
        }
    }

    /// Overlay configuration from environment variables:
    /// `MUSTAKHRIJ_PROVIDER`, `MUSTAKHRIJ_API_KEY`, `MUSTAKHRIJ_MODEL`,
    /// `MUSTAKHRIJ_BASE_URL`
    pub fn from_env(&mut self) {
        if let Ok(name) = std::env::var("MUSTAKHRIJ_PROVIDER") {
            match LLMProvider::parse(&name) {
                Some(provider) => {
                    *self = Self {
                        api_key: std::mem::take(&mut self.api_key),
                        ..Self::for_provider(provider)
                    };
                }
                None => warn!(provider = %name, "unknown provider, keeping current"),
            }
        }
        if let Ok(key) = std::env::var("MUSTAKHRIJ_API_KEY") {
            self.api_key = key;
        }
        if let Ok(model) = std::env::var("MUSTAKHRIJ_MODEL") {
            self.model = model;
        }
        if let Ok(url) = std::env::var("MUSTAKHRIJ_BASE_URL") {
            self.base_url = url;
        }
    }

    /// Reject a configuration no request could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::configuration(format!(
                "{} API key is required",
                self.provider.name()
            )));
        }
        if self.base_url.is_empty() {
            return Err(Error::configuration("endpoint base URL is required"));
        }
        if self.model.is_empty() {
            return Err(Error::configuration("model identifier is required"));
        }
        Ok(())
    }
}

/// Serde helpers for Duration
mod duration_serde {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let config = LLMConfig::for_provider(LLMProvider::Cerebras);
        assert_eq!(config.base_url, "https://api.cerebras.ai/v1");
        assert_eq!(config.model, "llama3.1-70b");
        assert!(config.api_key.is_empty());

        let config = LLMConfig::for_provider(LLMProvider::Groq);
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(LLMProvider::parse("Cerebras"), Some(LLMProvider::Cerebras));
        assert_eq!(LLMProvider::parse("GROQ"), Some(LLMProvider::Groq));
        assert_eq!(LLMProvider::parse("mistral"), None);
    }

    #[test]
    fn test_validate_requires_key() {
        let mut config = LLMConfig::default();
        assert!(config.validate().is_err());

        config.api_key = "csk-test".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = LLMConfig::for_provider(LLMProvider::Groq);
        let json = serde_json::to_string(&config).unwrap();
        let back: LLMConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.provider, LLMProvider::Groq);
        assert_eq!(back.timeout, Duration::from_secs(45));
    }
}
