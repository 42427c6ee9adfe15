use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // AI provider
    pub anthropic_api_key: String,
    pub claude_model: String,

    // Social statistics provider
    pub rapidapi_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string()),
            rapidapi_key: required_env("RAPIDAPI_KEY"),
        }
    }

    /// Log the loaded config with secrets redacted.
    pub fn log_redacted(&self) {
        let redact = |s: &str| {
            if s.len() > 8 {
                format!("{}…", &s[..8])
            } else {
                "set".to_string()
            }
        };
        tracing::info!(
            model = %self.claude_model,
            anthropic_api_key = %redact(&self.anthropic_api_key),
            rapidapi_key = %redact(&self.rapidapi_key),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
