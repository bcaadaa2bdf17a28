//! Server configuration.
//!
//! One small struct with documented defaults rather than scattered
//! constants: everything an operator can tune lives here, and the binary
//! maps CLI flags and `FILE2MD_*` environment variables onto it.

/// Configuration for the file2md HTTP server.
///
/// # Example
/// ```rust
/// use file2md::ServerConfig;
///
/// let config = ServerConfig {
///     port: 8080,
///     ..ServerConfig::default()
/// };
/// assert_eq!(config.bind_addr(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind. Default: `0.0.0.0` (all interfaces).
    pub host: String,

    /// TCP port to listen on. Default: 5000.
    pub port: u16,

    /// Maximum accepted request body size in bytes. Default: 25 MiB.
    ///
    /// Uploads are buffered in memory while the multipart body is read, so
    /// this bound is also the per-request memory bound. Raise it for large
    /// PDFs or audio files; anything above it is rejected before staging.
    pub max_upload_bytes: usize,

    /// Upper bound on extracted text length per conversion, in characters.
    /// Default: 500 000 (the engine's own default).
    pub extract_max_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 25 * 1024 * 1024,
            extract_max_chars: 500_000,
        }
    }
}

impl ServerConfig {
    /// The `host:port` pair to hand to a TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr(), "0.0.0.0:5000");
        assert_eq!(c.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(c.extract_max_chars, 500_000);
    }
}
