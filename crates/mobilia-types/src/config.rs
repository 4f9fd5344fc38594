//! Application configuration, deserialized from `config.toml` in the data dir.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section has working defaults so a missing
/// or partial config file still yields a runnable service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Model identifier sent to the completion service.
    #[serde(default = "default_model")]
    pub model: String,
    /// Site name interpolated into the prompts.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Output budget for the streamed generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// How many previous turns seed the LLM context.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
    /// Deadline for the blocking intent call and for each streamed fragment.
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            site_name: default_site_name(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            history_turns: default_history_turns(),
            completion_timeout_secs: default_completion_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results below this cosine similarity are dropped by the endpoint.
    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f32,
    /// Feature cache time-to-live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    /// Upload size ceiling for the image-search endpoint.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_floor: default_similarity_floor(),
            cache_ttl_secs: default_cache_ttl(),
            default_top_k: default_top_k(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_site_name() -> String {
    "Mobilia".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f64 {
    0.3
}

fn default_history_turns() -> usize {
    3
}

fn default_completion_timeout() -> u64 {
    15
}

fn default_similarity_floor() -> f32 {
    0.5
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_top_k() -> usize {
    5
}

fn default_max_upload() -> usize {
    5 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.assistant.history_turns, 3);
        assert_eq!(config.search.cache_ttl_secs, 3600);
        assert!((config.search.similarity_floor - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[server]
port = 9001

[assistant]
model = "gpt-4o"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.assistant.model, "gpt-4o");
        assert_eq!(config.assistant.completion_timeout_secs, 15);
        assert_eq!(config.search.max_upload_bytes, 5 * 1024 * 1024);
    }
}
