use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use trexctl::config_loader::{self, CliOverrides};
use trexctl::logging::StdLog;
use trexctl::trex::{TrexTrafficServer, DEFAULT_BASE_DIR, DEFAULT_CONFIG_PATH};

/// Well-known location of the launch state file
const STATE_FILE: &str = "/tmp/trex_server.json";

/// Configure and launch a TRex traffic-generator server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the generator configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Base directory containing the installed server version
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    trex_dir: PathBuf,

    /// Path where the rendered server configuration file is written
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    out: PathBuf,

    /// Override the core count from the configuration file
    #[arg(long)]
    cores: Option<u32>,

    /// Force software (non-accelerated) mode
    #[arg(long)]
    software: bool,

    /// Render the configuration file without starting the server
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting trexctl");
    info!("Configuration file: {:?}", args.config);
    info!("Installation base directory: {:?}", args.trex_dir);

    // Load the generator configuration and apply CLI overrides
    let mut config = config_loader::load_config(&args.config)?;
    let overrides = CliOverrides {
        cores: args.cores,
        software_mode: args.software.then_some(true),
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    if args.dry_run {
        let rendered = trexctl::trex::render_config(&config, &args.out, &StdLog)?;
        info!("Rendered server configuration: {:?}", rendered);
        info!("Dry run requested, not starting the server");
        return Ok(());
    }

    let server = TrexTrafficServer::new(&args.trex_dir, Arc::new(StdLog))
        .wrap_err("Failed to locate the server installation")?;

    let handle = server
        .run_server(&config, Some(&args.out))
        .wrap_err("Failed to launch the server")?;

    info!("Server configuration: {:?}", handle.config_path);
    info!("Server log: {:?}", handle.log_path);
    info!("Server PID: {}", handle.pid);

    // Record the launch for operators; the process itself stays detached
    let state = serde_json::to_string_pretty(&handle)?;
    fs::write(STATE_FILE, state)
        .wrap_err_with(|| format!("Failed to write launch state file '{}'", STATE_FILE))?;
    info!("Launch state recorded at {}", STATE_FILE);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&[
            "trexctl",
            "--config", "generator.yaml",
        ]);

        assert_eq!(args.config, PathBuf::from("generator.yaml"));
        assert_eq!(args.trex_dir, PathBuf::from("/opt/trex"));
        assert_eq!(args.out, PathBuf::from("/etc/trex_cfg.yaml"));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_override_args() {
        let args = Args::parse_from(&[
            "trexctl",
            "--config", "generator.yaml",
            "--cores", "8",
            "--software",
            "--dry-run",
        ]);

        assert_eq!(args.cores, Some(8));
        assert!(args.software);
        assert!(args.dry_run);
    }
}
