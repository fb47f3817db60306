use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://192.168.0.251:8410/rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Timeout of the reachability probe, independent of `timeout`.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// ERP backend connection configuration.
#[derive(Clone)]
pub struct BackendConfig {
    /// REST root, without trailing slash.
    pub base_url: String,
    /// Basic-auth user sent on every request.
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    /// The ERP usually serves a self-signed certificate on the LAN.
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// `API_TIMEOUT` is in milliseconds.
    pub fn from_env() -> Self {
        let config = Self {
            base_url: std::env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            username: std::env::var("API_USERNAME").unwrap_or_default(),
            password: std::env::var("API_PASSWORD").unwrap_or_default(),
            timeout: std::env::var("API_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT),
            accept_invalid_certs: std::env::var("API_ACCEPT_INVALID_CERTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        if config.username.is_empty() {
            tracing::warn!("API_USERNAME not set, backend requests will be rejected");
        }
        config
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let config = BackendConfig {
            base_url: "http://localhost:8410/rest/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_url("VKPCLILOGIN"),
            "http://localhost:8410/rest/VKPCLILOGIN"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let config = BackendConfig {
            password: "segredo".into(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("segredo"));
    }
}
