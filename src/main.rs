use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use gzserve::config::{self, AppState, Config};
use gzserve::{logger, server, Result};

/// HTTPS static file server preferring precompressed `.gz` siblings
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file path, extension optional
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Document root (overrides files.root)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Listening port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Command-line flags win over file and environment settings
    fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = &self.root {
            cfg.files.root.clone_from(root);
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match start(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn start(args: Args) -> Result<()> {
    let mut cfg = Config::load_from(&args.config)?;
    args.apply_overrides(&mut cfg);

    if args.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let state = Arc::new(AppState::new(cfg)?);
    runtime.block_on(server::run(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn defaults() -> Config {
        Config::load_from("/nonexistent/gzserve-cli-test").unwrap()
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["gzserve", "--root", "/srv/www", "-p", "8443"]);
        let mut cfg = defaults();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.files.root, Path::new("/srv/www"));
        assert_eq!(cfg.server.port, 8443);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::parse_from(["gzserve"]);
        assert_eq!(args.config, config::DEFAULT_CONFIG_PATH);
        assert!(!args.print_config);

        let mut cfg = defaults();
        cfg.server.port = 9443;
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.server.port, 9443);
        assert_eq!(cfg.files.root, Path::new("."));
    }
}
