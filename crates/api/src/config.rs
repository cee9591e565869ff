use std::env;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let bind = env::var("GUIDE_BIND")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let body_limit_bytes = env::var("GUIDE_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_BODY_LIMIT_BYTES);

        Self {
            bind,
            body_limit_bytes,
        }
    }
}
