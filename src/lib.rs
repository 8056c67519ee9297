//! # trexctl - Configuration and launch utility for TRex traffic-generator servers
//!
//! This library renders native TRex server configuration files from a
//! benchmark's generator configuration and starts the server as a detached
//! background process.
//!
//! ## Overview
//!
//! trexctl is the piece of a network benchmarking workflow that stands up the
//! traffic generator: it locates the installed TRex version, writes the
//! server's YAML configuration file, derives the server's command-line flags
//! from the same configuration object, and launches the server detached so it
//! survives the parent's exit. It deliberately does not monitor, collect
//! output from, or shut down the launched server.
//!
//! ## Architecture
//!
//! The library is organized into a few modules:
//!
//! - `config`: type-safe generator configuration structures and validation
//! - `config_loader`: configuration file loading and CLI overrides
//! - `logging`: the injected `EventLog` capability used by the components
//! - `trex`: rendered-document types, config rendering, and server launch
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trexctl::config_loader;
//! use trexctl::logging::StdLog;
//! use trexctl::trex::TrexTrafficServer;
//!
//! let config = config_loader::load_config("generator.yaml".as_ref())?;
//!
//! let server = TrexTrafficServer::new("/opt/trex", Arc::new(StdLog))?;
//! let handle = server.run_server(&config, None)?;
//!
//! // The server now runs detached; `handle` records its PID, log file,
//! // and the rendered configuration path.
//! println!("server pid {}", handle.pid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Format
//!
//! Generator configurations use YAML:
//!
//! ```yaml
//! name: "trex01"
//! cores: 4
//! pcis:
//!   - "0000:00:04.0"
//!   - "0000:00:05.0"
//! zmq_pub_port: 4500
//! zmq_rpc_port: 4501
//! limit_memory: 1024
//! software_mode: false
//! vlan_tagging: false
//! platform:
//!   master_thread_id: 1
//!   latency_thread_id: 2
//!   dual_if:
//!     - socket: 0
//!       threads: [3, 4, 5]
//! ```
//!
//! ## Error Handling
//!
//! Components return typed `thiserror` errors (`ValidationError`,
//! `RenderError`, `ServerError`); the binary surfaces them through
//! `color_eyre::Result`. Deployment problems (an empty or ambiguous
//! installation directory) and malformed rendered documents are fatal;
//! incomplete platform sub-properties and missing per-socket thread lists
//! are logged and recovered.

pub mod config;
pub mod config_loader;
pub mod logging;
pub mod trex;
