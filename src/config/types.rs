use serde::Deserialize;

/// Top-level settings structure for the `rove.toml` file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    /// Process-wide proxy applied to all network egress
    #[serde(default)]
    pub proxy: ProxySettings,

    /// Capacity limits for the persistent store
    #[serde(default)]
    pub limits: LimitSettings,
}

/// Proxy configuration applied to the shared HTTP client
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub kind: ProxyKind,

    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

impl ProxySettings {
    /// Builds the proxy URL for the configured proxy, or None when no proxy
    /// is configured or the host is empty
    pub fn url(&self) -> Option<String> {
        let scheme = match self.kind {
            ProxyKind::None => return None,
            ProxyKind::Http => "http",
            ProxyKind::Socks5 => "socks5",
        };

        if self.host.is_empty() {
            return None;
        }

        Some(format!("{}://{}:{}", scheme, self.host, self.port))
    }
}

/// Kind of proxy to route requests through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    None,
    Http,
    Socks5,
}

/// Capacity limits for the persistent store
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LimitSettings {
    /// Byte ceiling per table file; writers stop accepting rows beyond it
    #[serde(default = "default_max_table_bytes")]
    pub max_table_bytes: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_table_bytes: default_max_table_bytes(),
        }
    }
}

fn default_max_table_bytes() -> u64 {
    2 * 1024 * 1024 * 1024 // 2 GiB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_proxy_has_no_url() {
        let settings = ProxySettings::default();
        assert_eq!(settings.url(), None);
    }

    #[test]
    fn test_http_proxy_url() {
        let settings = ProxySettings {
            kind: ProxyKind::Http,
            host: "proxy.example.com".to_string(),
            port: 8080,
            user: String::new(),
            password: String::new(),
        };
        assert_eq!(
            settings.url(),
            Some("http://proxy.example.com:8080".to_string())
        );
    }

    #[test]
    fn test_socks5_proxy_without_host_is_ignored() {
        let settings = ProxySettings {
            kind: ProxyKind::Socks5,
            ..Default::default()
        };
        assert_eq!(settings.url(), None);
    }

    #[test]
    fn test_default_table_cap() {
        let limits = LimitSettings::default();
        assert_eq!(limits.max_table_bytes, 2 * 1024 * 1024 * 1024);
    }
}
