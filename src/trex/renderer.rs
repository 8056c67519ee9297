//! TRex configuration file rendering.
//!
//! Builds the typed configuration document from a [`GeneratorConfig`],
//! serializes it to YAML, and persists it with overwrite semantics. The
//! serialized text is parsed back before anything touches disk; a document
//! that does not parse never reaches the filesystem.

use crate::config::{GeneratorConfig, PlatformConfig};
use crate::logging::EventLog;
use crate::trex::types::{TrexConfigDoc, TrexDualIf, TrexPlatform};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the rendered server configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/trex_cfg.yaml";

/// One traffic port pair per server instance
const PORT_LIMIT: u32 = 2;
/// Configuration schema version the server expects
const CONFIG_VERSION: u32 = 2;

/// Errors raised while rendering the server configuration file
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize server configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("Rendered server configuration is not well-formed YAML: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("Failed to write server configuration to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render the server configuration file for `config` at `dest`.
///
/// An existing file at `dest` is removed first, so repeated renders always
/// leave the most recent configuration behind. Returns the destination path.
pub fn render_config(
    config: &GeneratorConfig,
    dest: &Path,
    log: &dyn EventLog,
) -> Result<PathBuf, RenderError> {
    let document = build_document(config, log);

    let body = serde_yaml::to_string(&[document]).map_err(RenderError::Serialize)?;
    let text = format!("# Config generated by trexctl\n{}", body);

    // The document must parse before it is allowed to reach disk.
    serde_yaml::from_str::<serde_yaml::Value>(&text).map_err(RenderError::Parse)?;

    if dest.exists() {
        fs::remove_file(dest).map_err(|source| RenderError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    fs::write(dest, text).map_err(|source| RenderError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(dest.to_path_buf())
}

/// Build the typed configuration document from the generator configuration
fn build_document(config: &GeneratorConfig, log: &dyn EventLog) -> TrexConfigDoc {
    TrexConfigDoc {
        port_limit: PORT_LIMIT,
        version: CONFIG_VERSION,
        zmq_pub_port: config.zmq_pub_port,
        zmq_rpc_port: config.zmq_rpc_port,
        prefix: config.name.clone(),
        limit_memory: config.limit_memory,
        interfaces: config.pcis.clone(),
        platform: config
            .platform
            .as_ref()
            .and_then(|platform| build_platform(platform, log)),
    }
}

/// Build the thread-pinning block, if the platform configuration is complete.
///
/// Both thread ids must be set and non-zero; otherwise the block is omitted
/// and the server falls back to its own defaults. A socket entry without a
/// thread list renders as an empty list rather than failing the render.
fn build_platform(platform: &PlatformConfig, log: &dyn EventLog) -> Option<TrexPlatform> {
    match (
        set_thread_id(platform.master_thread_id),
        set_thread_id(platform.latency_thread_id),
    ) {
        (Some(master_thread_id), Some(latency_thread_id)) => Some(TrexPlatform {
            master_thread_id,
            latency_thread_id,
            dual_if: platform
                .dual_if
                .iter()
                .map(|binding| TrexDualIf {
                    socket: binding.socket,
                    threads: binding.threads.clone().unwrap_or_else(|| {
                        log.warn(&format!("No threads defined for socket {}", binding.socket));
                        Vec::new()
                    }),
                })
                .collect(),
        }),
        _ => {
            log.info(
                "Generator profile 'platform' sub-properties are set but not filled in \
                 config file. The server will use default values.",
            );
            None
        }
    }
}

/// A thread id of zero counts as unset
fn set_thread_id(id: Option<u32>) -> Option<u32> {
    id.filter(|&thread| thread != 0)
}
