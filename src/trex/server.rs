//! TRex server installation discovery and launch.
//!
//! The server is started detached: it gets its own process group, its output
//! goes to a fixed log file, and no handle to it is retained. Ownership of
//! the process passes entirely to the operating system at spawn time.

use crate::config::GeneratorConfig;
use crate::logging::EventLog;
use crate::trex::renderer::{self, RenderError, DEFAULT_CONFIG_PATH};
use crate::trex::types::ServerHandle;
use std::fs::{self, File};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Base directory expected to hold exactly one installed server version
pub const DEFAULT_BASE_DIR: &str = "/opt/trex";

/// File receiving the launched server's stdout and stderr
pub const SERVER_LOG_PATH: &str = "/tmp/trex.log";

/// Launcher executable inside the installation root
const SERVER_BINARY: &str = "t-rex-64";

/// Errors raised while locating or launching the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Expected exactly one server version under {base_dir:?}, found {found}")]
    Installation { base_dir: PathBuf, found: usize },

    #[error("Failed to read installation directory {base_dir:?}: {source}")]
    InstallationScan {
        base_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to open server log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn server process: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Renders configuration files for the TRex server and launches it.
pub struct TrexTrafficServer {
    /// Root of the single installed server version
    trex_dir: PathBuf,
    log: Arc<dyn EventLog>,
}

impl TrexTrafficServer {
    /// Locate the installed server under `base_dir`.
    ///
    /// The hosting environment provisions exactly one installed version; an
    /// empty or ambiguous installation directory is a deployment error and
    /// fails construction.
    pub fn new(base_dir: impl AsRef<Path>, log: Arc<dyn EventLog>) -> Result<Self, ServerError> {
        let base_dir = base_dir.as_ref();
        let entries = fs::read_dir(base_dir)
            .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
            .map_err(|source| ServerError::InstallationScan {
                base_dir: base_dir.to_path_buf(),
                source,
            })?;

        if entries.len() != 1 {
            return Err(ServerError::Installation {
                base_dir: base_dir.to_path_buf(),
                found: entries.len(),
            });
        }

        Ok(Self {
            trex_dir: entries[0].path(),
            log,
        })
    }

    /// Root directory of the installed server version
    pub fn trex_dir(&self) -> &Path {
        &self.trex_dir
    }

    /// Render the server configuration and start the server detached.
    ///
    /// The configuration is written to `filename`, or to the well-known
    /// system path when unspecified. The spawned process is never waited on
    /// and its exit status is never inspected; the returned handle only
    /// records where it ended up.
    pub fn run_server(
        &self,
        config: &GeneratorConfig,
        filename: Option<&Path>,
    ) -> Result<ServerHandle, ServerError> {
        let dest = filename.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let config_path = renderer::render_config(config, dest, self.log.as_ref())?;

        let log_path = PathBuf::from(SERVER_LOG_PATH);
        // each launch starts a fresh server log
        let server_log = File::create(&log_path).map_err(|source| ServerError::LogFile {
            path: log_path.clone(),
            source,
        })?;
        let server_log_err = server_log.try_clone().map_err(|source| ServerError::LogFile {
            path: log_path.clone(),
            source,
        })?;

        let mut command = Command::new(self.trex_dir.join(SERVER_BINARY));
        command
            .args(server_args(config, &config_path))
            .current_dir(&self.trex_dir)
            .stdin(Stdio::null())
            .stdout(server_log)
            .stderr(server_log_err)
            // own process group, so the server survives the parent's exit
            .process_group(0);

        let child = command.spawn().map_err(ServerError::Spawn)?;
        let pid = child.id();
        drop(child);

        self.log.info("TRex server is running...");

        Ok(ServerHandle {
            pid,
            log_path,
            config_path,
        })
    }
}

/// Derive the server argument vector from the generator configuration.
///
/// Conditional flags are omitted entirely when their trigger does not hold.
pub fn server_args(config: &GeneratorConfig, config_path: &Path) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        "-c".to_string(),
        config.cores.to_string(),
        "--iom".to_string(),
        "0".to_string(),
        "--no-scapy-server".to_string(),
        "--close-at-end".to_string(),
    ];

    if config.software_mode {
        args.push("--software".to_string());
    }
    if config.vlan_tagging || config.vtep_vlan() {
        args.push("--vlan".to_string());
    }
    if let Some(mbuf_factor) = config.mbuf_factor.filter(|&factor| factor != 0) {
        args.push("--mbuf-factor".to_string());
        args.push(mbuf_factor.to_string());
    }

    args.push("--cfg".to_string());
    args.push(config_path.display().to_string());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    /// Discards messages; installation tests have nothing to assert on
    struct NullLog;

    impl EventLog for NullLog {
        fn info(&self, _message: &str) {}
        fn warn(&self, _message: &str) {}
    }

    fn sample_config() -> GeneratorConfig {
        serde_yaml::from_str(
            r#"
name: "trex01"
cores: 4
pcis:
  - "0000:00:04.0"
  - "0000:00:05.0"
zmq_pub_port: 4500
zmq_rpc_port: 4501
limit_memory: 1024
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_locator_records_single_version() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir(base.path().join("v3.03")).unwrap();

        let server = TrexTrafficServer::new(base.path(), Arc::new(NullLog)).unwrap();
        assert_eq!(server.trex_dir(), base.path().join("v3.03"));
    }

    #[test]
    fn test_locator_rejects_empty_base_dir() {
        let base = tempfile::tempdir().unwrap();

        let result = TrexTrafficServer::new(base.path(), Arc::new(NullLog));
        assert!(matches!(
            result,
            Err(ServerError::Installation { found: 0, .. })
        ));
    }

    #[test]
    fn test_locator_rejects_multiple_versions() {
        let base = tempfile::tempdir().unwrap();
        fs::create_dir(base.path().join("v3.03")).unwrap();
        fs::create_dir(base.path().join("v3.04")).unwrap();

        let result = TrexTrafficServer::new(base.path(), Arc::new(NullLog));
        assert!(matches!(
            result,
            Err(ServerError::Installation { found: 2, .. })
        ));
    }

    #[test]
    fn test_locator_rejects_missing_base_dir() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("nothing-here");

        let result = TrexTrafficServer::new(&missing, Arc::new(NullLog));
        assert!(matches!(result, Err(ServerError::InstallationScan { .. })));
    }

    #[test]
    fn test_server_args_baseline() {
        let config = sample_config();
        let args = server_args(&config, Path::new("/etc/trex_cfg.yaml"));

        assert_eq!(
            args,
            vec![
                "-i",
                "-c",
                "4",
                "--iom",
                "0",
                "--no-scapy-server",
                "--close-at-end",
                "--cfg",
                "/etc/trex_cfg.yaml",
            ]
        );
    }

    #[test]
    fn test_server_args_software_and_vtep_vlan() {
        let mut config = sample_config();
        config.software_mode = true;
        config.vlan_tagging = false;
        config
            .gen_config
            .insert("vtep_vlan".to_string(), Value::Bool(true));
        config.mbuf_factor = None;

        let args = server_args(&config, Path::new("/etc/trex_cfg.yaml"));
        assert!(args.contains(&"--software".to_string()));
        assert!(args.contains(&"--vlan".to_string()));
        assert!(!args.contains(&"--mbuf-factor".to_string()));
    }

    #[test]
    fn test_server_args_mbuf_factor() {
        let mut config = sample_config();
        config.mbuf_factor = Some(8);

        let args = server_args(&config, Path::new("/etc/trex_cfg.yaml"));
        let at = args.iter().position(|arg| arg == "--mbuf-factor").unwrap();
        assert_eq!(args[at + 1], "8");
    }

    #[test]
    fn test_server_args_zero_mbuf_factor_omitted() {
        let mut config = sample_config();
        config.mbuf_factor = Some(0);

        let args = server_args(&config, Path::new("/etc/trex_cfg.yaml"));
        assert!(!args.contains(&"--mbuf-factor".to_string()));
    }

    #[test]
    fn test_vlan_flag_from_tagging() {
        let mut config = sample_config();
        config.vlan_tagging = true;

        let args = server_args(&config, Path::new("/etc/trex_cfg.yaml"));
        assert!(args.contains(&"--vlan".to_string()));
    }
}
