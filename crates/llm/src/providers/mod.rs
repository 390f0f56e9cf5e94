pub mod gemini;
pub mod openai;

use std::time::Duration;

use docqa_core::config::LlmConfig;
use serde::Serialize;

use crate::provider::{LlmError, LlmProvider};

/// Build the ordered provider fallback chain from config: OpenAI when its
/// key is set, then Gemini. No credentials at all is a configuration error.
pub fn build_chain(config: &LlmConfig) -> Result<Vec<Box<dyn LlmProvider>>, LlmError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let mut chain: Vec<Box<dyn LlmProvider>> = Vec::new();

    if let Some(api_key) = &config.openai_api_key {
        chain.push(Box::new(openai::OpenAiProvider::new(
            api_key.clone(),
            config.openai_model.clone(),
            config.openai_base_url.clone(),
            timeout,
        )));
    }
    if let Some(api_key) = &config.gemini_api_key {
        chain.push(Box::new(gemini::GeminiProvider::new(
            api_key.clone(),
            config.gemini_model.clone(),
            timeout,
        )));
    }

    if chain.is_empty() {
        return Err(LlmError::NotConfigured(
            "no LLM credentials: set OPENAI_API_KEY or GEMINI_API_KEY".into(),
        ));
    }
    Ok(chain)
}

/// Availability report for the two providers (CLI `api` command, /health).
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub active: Option<&'static str>,
    pub openai_available: bool,
    pub gemini_available: bool,
    pub openai_model: Option<String>,
    pub gemini_model: Option<String>,
}

impl ProviderStatus {
    pub fn from_config(config: &LlmConfig) -> Self {
        let openai = config.openai_api_key.is_some();
        let gemini = config.gemini_api_key.is_some();
        Self {
            active: if openai {
                Some("openai")
            } else if gemini {
                Some("gemini")
            } else {
                None
            },
            openai_available: openai,
            gemini_available: gemini,
            openai_model: openai.then(|| config.openai_model.clone()),
            gemini_model: gemini.then(|| config.gemini_model.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> LlmConfig {
        LlmConfig {
            openai_api_key: None,
            openai_model: "gpt-4o".into(),
            openai_base_url: None,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".into(),
            temperature: 0.1,
            max_tokens: 4096,
            request_timeout_secs: 60,
        }
    }

    #[test]
    fn chain_empty_without_credentials() {
        let err = build_chain(&base_config()).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn chain_orders_openai_before_gemini() {
        let mut config = base_config();
        config.openai_api_key = Some("sk-test".into());
        config.gemini_api_key = Some("g-test".into());
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].name(), "openai");
        assert_eq!(chain[1].name(), "gemini");
    }

    #[test]
    fn gemini_only_chain() {
        let mut config = base_config();
        config.gemini_api_key = Some("g-test".into());
        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name(), "gemini");
    }

    #[test]
    fn status_reports_active_provider() {
        let mut config = base_config();
        config.gemini_api_key = Some("g-test".into());
        let status = ProviderStatus::from_config(&config);
        assert_eq!(status.active, Some("gemini"));
        assert!(!status.openai_available);
        assert!(status.gemini_available);
        assert_eq!(status.gemini_model.as_deref(), Some("gemini-1.5-flash"));
    }
}
