use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub gemini_base_url: String,
    pub discovery_model: String,
    pub analysis_model: String,
    /// Number of businesses the discovery prompt asks for.
    pub discovery_limit: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Leads analysed concurrently per group. Always at least 1.
    pub batch_size: usize,
    /// Per-lead analysis deadline; `0` disables it.
    pub analysis_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &"[redacted]")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("discovery_model", &self.discovery_model)
            .field("analysis_model", &self.analysis_model)
            .field("discovery_limit", &self.discovery_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("batch_size", &self.batch_size)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .finish()
    }
}
