use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub client: ClientConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // in bytes
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub sentinel_enabled: bool,
    pub sentinel_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub simulation_delay_ms: u64,
    pub storage_path: String,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulation_delay(&self) -> Duration {
        Duration::from_millis(self.simulation_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_ms: 5000,
            simulation_delay_ms: 400,
            storage_path: "dayone_storage.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub allowed_origin: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut config: Config = config.try_deserialize()?;

        // Fall back to the bare variable name
        if config.ai.api_key.is_none() {
            config.ai.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        Ok(config)
    }
}
