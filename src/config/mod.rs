// Configuration module entry point
// Loads the startup configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

use crate::error::{Result, ServerError};

pub use state::AppState;
pub use types::{
    AccessLogFormat, Config, FilesConfig, LogLevel, LoggingConfig, PerformanceConfig,
    ServerConfig, TlsConfig,
};

/// Config file used when `--config` is not given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "gzserve";

/// Prefix for environment overrides, e.g. `GZSERVE_SERVER__PORT=8443`
pub const ENV_PREFIX: &str = "GZSERVE";

/// Keys whose environment value is a comma-separated list
const ENV_LIST_KEYS: &[&str] = &["files.index_files"];

impl Config {
    /// Load configuration from the given file path (extension optional).
    ///
    /// The file may be absent; defaults and `GZSERVE_*` environment variables
    /// still apply.
    pub fn load_from(config_path: &str) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Like [`Config::load_from`], reading overrides from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let environment = ENV_LIST_KEYS.iter().fold(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .source(env),
            |environment, key| environment.with_list_parse_key(key),
        );

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(environment)
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 443)?
            .set_default("server.backlog", 1024)?
            .set_default("tls.cert_file", "cert.pem")?
            .set_default("tls.key_file", "key.pem")?
            .set_default("files.root", ".")?
            .set_default("files.index_files", vec!["index.html", "index.htm"])?
            .set_default("files.directory_listing", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.handshake_timeout", 10)?
            .set_default("performance.connection_timeout", 120)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let host = self.server.host.as_str();
        // Bare IPv6 literals need brackets before the port
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        };
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }

    /// Ensure the document root is an existing directory and pin it to an
    /// absolute path so later cwd changes cannot move it.
    pub fn canonical_root(&self) -> Result<std::path::PathBuf> {
        let root: &Path = &self.files.root;
        let canonical = root.canonicalize().map_err(|e| ServerError::InvalidRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !canonical.is_dir() {
            return Err(ServerError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(canonical)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_file(body: &str) -> Config {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        Config::load_from(file.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/gzserve-test-config").unwrap();
        assert_eq!(cfg.server.port, 443);
        assert_eq!(cfg.tls.cert_file, Path::new("cert.pem"));
        assert_eq!(cfg.tls.key_file, Path::new("key.pem"));
        assert_eq!(cfg.files.root, Path::new("."));
        assert_eq!(cfg.files.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Common);
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = load_file(
            r#"
[server]
host = "127.0.0.1"
port = 8443

[files]
root = "/srv/www"
directory_listing = false

[logging]
level = "debug"
access_log_format = "json"

[performance]
max_connections = 64
"#,
        );
        assert_eq!(cfg.server.port, 8443);
        assert_eq!(cfg.files.root, Path::new("/srv/www"));
        assert!(!cfg.files.directory_listing);
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Json);
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8443".parse::<SocketAddr>().unwrap()
        );
    }

    fn load_env(vars: &[(&str, &str)]) -> Result<Config> {
        let env = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::load_with_env("/nonexistent/gzserve-test-config", Some(env))
    }

    #[test]
    fn test_env_overrides_scalars() {
        let cfg = load_env(&[
            ("GZSERVE_SERVER__PORT", "8443"),
            ("GZSERVE_FILES__DIRECTORY_LISTING", "false"),
            ("GZSERVE_LOGGING__ACCESS_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.server.port, 8443);
        assert!(!cfg.files.directory_listing);
        assert_eq!(cfg.logging.access_log_format, AccessLogFormat::Json);
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn test_env_sets_index_files_list() {
        let cfg = load_env(&[("GZSERVE_FILES__INDEX_FILES", "main.html")]).unwrap();
        assert_eq!(cfg.files.index_files, vec!["main.html"]);

        let cfg = load_env(&[("GZSERVE_FILES__INDEX_FILES", "index.html,home.htm")]).unwrap();
        assert_eq!(cfg.files.index_files, vec!["index.html", "home.htm"]);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(b"[server]\nport = 8443\nhost = \"127.0.0.1\"\n")
            .unwrap();
        let env = [("GZSERVE_SERVER__PORT".to_string(), "9443".to_string())]
            .into_iter()
            .collect();

        let cfg = Config::load_with_env(file.path().to_str().unwrap(), Some(env)).unwrap();
        assert_eq!(cfg.server.port, 9443);
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_ipv6_host() {
        let mut cfg = Config::load_from("/nonexistent/gzserve-test-config").unwrap();
        cfg.server.host = "::1".to_string();
        cfg.server.port = 8443;
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "[::1]:8443".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::load_from("/nonexistent/gzserve-test-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_canonical_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from("/nonexistent/gzserve-test-config").unwrap();
        cfg.files.root = dir.path().to_path_buf();
        assert!(cfg.canonical_root().unwrap().is_absolute());

        cfg.files.root = dir.path().join("missing");
        assert!(matches!(
            cfg.canonical_root(),
            Err(ServerError::InvalidRoot { .. })
        ));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        cfg.files.root = file;
        assert!(matches!(
            cfg.canonical_root(),
            Err(ServerError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_to_toml_round_trips_port() {
        let cfg = Config::load_from("/nonexistent/gzserve-test-config").unwrap();
        let rendered = cfg.to_toml().unwrap();
        assert!(rendered.contains("port = 443"));
        assert!(rendered.contains("access_log_format = \"common\""));
    }
}
