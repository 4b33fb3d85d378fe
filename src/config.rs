use anyhow::{Context, Result};

pub const DEFAULT_LOKALISE_API_URL: &str = "https://api.lokalise.com/api2";
pub const DEFAULT_LLM_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";

#[derive(Debug, Clone)]
pub struct Config {
    // Lokalise
    pub lokalise_api_token: String,
    pub lokalise_project_id: String,
    pub lokalise_api_url: String,

    // LLM (OpenAI-compatible chat completions)
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Lokalise
            lokalise_api_token: std::env::var("LOKALISE_API_TOKEN")
                .context("LOKALISE_API_TOKEN not set")?,
            lokalise_project_id: std::env::var("LOKALISE_PROJECT_ID")
                .context("LOKALISE_PROJECT_ID not set")?,
            lokalise_api_url: std::env::var("LOKALISE_API_URL")
                .unwrap_or_else(|_| DEFAULT_LOKALISE_API_URL.to_string()),

            // LLM
            llm_api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?,
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),

            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        })
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "LOKALISE_API_TOKEN",
        "LOKALISE_PROJECT_ID",
        "LOKALISE_API_URL",
        "OPENAI_API_KEY",
        "LLM_API_URL",
        "LLM_MODEL",
        "HOST",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn set_required() {
        std::env::set_var("LOKALISE_API_TOKEN", "lok-token");
        std::env::set_var("LOKALISE_PROJECT_ID", "123.abc");
        std::env::set_var("OPENAI_API_KEY", "sk-test");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        set_required();

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.lokalise_api_token, "lok-token");
        assert_eq!(config.lokalise_project_id, "123.abc");
        assert_eq!(config.llm_api_key, "sk-test");
        assert_eq!(config.lokalise_api_url, DEFAULT_LOKALISE_API_URL);
        assert_eq!(config.llm_api_url, DEFAULT_LLM_API_URL);
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_required();
        std::env::set_var("LOKALISE_API_URL", "http://localhost:9000");
        std::env::set_var("LLM_API_URL", "http://localhost:9001/v1/chat/completions");
        std::env::set_var("LLM_MODEL", "gpt-4o-mini");
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "3000");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.lokalise_api_url, "http://localhost:9000");
        assert_eq!(config.llm_api_url, "http://localhost:9001/v1/chat/completions");
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.bind_address(), "127.0.0.1:3000");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back_to_default() {
        clear_env();
        set_required();
        std::env::set_var("PORT", "not-a-port");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.port, 8000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_is_an_error() {
        clear_env();
        std::env::set_var("LOKALISE_PROJECT_ID", "123.abc");
        std::env::set_var("OPENAI_API_KEY", "sk-test");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("LOKALISE_API_TOKEN"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_llm_key_is_an_error() {
        clear_env();
        std::env::set_var("LOKALISE_API_TOKEN", "lok-token");
        std::env::set_var("LOKALISE_PROJECT_ID", "123.abc");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        clear_env();
    }
}
