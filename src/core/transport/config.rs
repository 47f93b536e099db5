//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (local pipe mode).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport with JSON-RPC messages.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_tcp_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "tcp")]
fn default_tcp_host() -> String {
    "127.0.0.1".to_string()
}

// Network mode is meant to be reachable from outside the container/host.
#[cfg(feature = "http")]
fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 10000;

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "http"), feature = "tcp"))]
        {
            return Self::Tcp(TcpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_tcp_host(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_http_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create a TCP transport config.
    #[cfg(feature = "tcp")]
    pub fn tcp(port: u16, host: impl Into<String>) -> Self {
        Self::Tcp(TcpConfig {
            port,
            host: host.into(),
        })
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// `local` forces STDIO. Otherwise `MCP_TRANSPORT` selects the transport,
    /// and network (HTTP) mode is used when it is unset.
    pub fn from_env(local: bool) -> Self {
        Self::from_lookup(local, |key| std::env::var(key).ok())
    }

    /// Build the transport config from an arbitrary variable lookup.
    pub fn from_lookup<F>(local: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        #[cfg(feature = "stdio")]
        if local {
            return Self::Stdio;
        }
        #[cfg(not(feature = "stdio"))]
        if local {
            tracing::warn!("--local requested but the stdio feature is disabled");
        }

        let transport = lookup("MCP_TRANSPORT").unwrap_or_default().to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "tcp")]
            "tcp" => {
                let port = lookup("MCP_TCP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000);
                let host = lookup("MCP_TCP_HOST").unwrap_or_else(default_tcp_host);
                Self::Tcp(TcpConfig { port, host })
            }
            #[cfg(feature = "http")]
            _ => {
                let port = lookup("MCP_HTTP_PORT")
                    .or_else(|| lookup("PORT"))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_PORT);
                let host = lookup("MCP_HTTP_HOST").unwrap_or_else(default_http_host);
                let rpc_path = lookup("MCP_HTTP_PATH").unwrap_or_else(default_rpc_path);
                let enable_cors = lookup("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    enable_cors,
                })
            }
            #[cfg(not(feature = "http"))]
            _ => Self::default(),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (local mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    /// Check if this transport is the local STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_local_flag_forces_stdio() {
        let config = TransportConfig::from_lookup(true, lookup_from(&[("MCP_TRANSPORT", "http")]));
        assert!(config.is_stdio());
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_explicit_stdio() {
        let config = TransportConfig::from_lookup(false, lookup_from(&[("MCP_TRANSPORT", "STDIO")]));
        assert_eq!(config, TransportConfig::stdio());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_network_mode_defaults_to_http() {
        let config = TransportConfig::from_lookup(false, lookup_from(&[]));
        assert_eq!(config, TransportConfig::Http(HttpConfig::default()));
        assert_eq!(config.description(), "HTTP on 0.0.0.0:10000/mcp");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_port_falls_back_to_port_variable() {
        let config = TransportConfig::from_lookup(false, lookup_from(&[("PORT", "8123")]));
        match config {
            TransportConfig::Http(cfg) => assert_eq!(cfg.port, 8123),
            other => panic!("expected HTTP transport, got {:?}", other),
        }

        let config = TransportConfig::from_lookup(
            false,
            lookup_from(&[("PORT", "8123"), ("MCP_HTTP_PORT", "9000"), ("MCP_HTTP_CORS", "0")]),
        );
        match config {
            TransportConfig::Http(cfg) => {
                assert_eq!(cfg.port, 9000);
                assert!(!cfg.enable_cors);
            }
            other => panic!("expected HTTP transport, got {:?}", other),
        }
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn test_tcp_from_lookup() {
        let config = TransportConfig::from_lookup(
            false,
            lookup_from(&[("MCP_TRANSPORT", "tcp"), ("MCP_TCP_PORT", "4100")]),
        );
        assert_eq!(config, TransportConfig::tcp(4100, "127.0.0.1"));
    }
}
