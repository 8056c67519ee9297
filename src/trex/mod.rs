//! TRex server configuration and launch.
//!
//! This module is the bridge between the benchmark's generator configuration
//! and a running TRex server:
//!
//! - `types.rs`: typed representation of the server's YAML configuration file
//! - `renderer.rs`: document construction, validation, and persistence
//! - `server.rs`: installation discovery and detached process launch
//!
//! The flow is render-then-launch: [`TrexTrafficServer::run_server`] writes
//! the configuration file, derives the command-line flag set from the same
//! configuration object, and spawns the server detached with its output
//! redirected to a fixed log file.

pub mod renderer;
pub mod server;
pub mod types;

// Re-export commonly used items for convenience
pub use renderer::{render_config, RenderError, DEFAULT_CONFIG_PATH};
pub use server::{server_args, ServerError, TrexTrafficServer, DEFAULT_BASE_DIR, SERVER_LOG_PATH};
pub use types::{ServerHandle, TrexConfigDoc, TrexDualIf, TrexPlatform};
