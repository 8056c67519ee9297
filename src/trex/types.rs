//! TRex-specific type definitions.
//!
//! This module contains the typed representation of the TRex server
//! configuration file. The structures serialize to the exact YAML schema the
//! server expects (a top-level sequence holding one port-group mapping), so
//! structural nesting is enforced by the serializer rather than by hand-built
//! indentation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One port group of a TRex server configuration file.
///
/// The configuration file itself is a YAML sequence of these mappings; this
/// tool always emits exactly one.
#[derive(Serialize, Debug)]
pub struct TrexConfigDoc {
    /// Number of ports the server drives (fixed at 2: one traffic pair)
    pub port_limit: u32,
    /// Configuration schema version understood by the server
    pub version: u32,
    /// ZMQ publisher port for the server's control plane
    pub zmq_pub_port: u16,
    /// ZMQ RPC port for the server's control plane
    pub zmq_rpc_port: u16,
    /// DPDK resource namespace prefix
    pub prefix: String,
    /// Memory cap for the server process, in MB
    pub limit_memory: u32,
    /// PCI addresses of the NICs the server binds, in port order
    pub interfaces: Vec<String>,
    /// CPU thread-pinning block; omitted so the server applies its defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<TrexPlatform>,
}

/// CPU thread-pinning block of a TRex configuration file.
#[derive(Serialize, Debug)]
pub struct TrexPlatform {
    /// Thread id of the server's master thread
    pub master_thread_id: u32,
    /// Thread id of the latency-measurement thread
    pub latency_thread_id: u32,
    /// Per-socket data-plane thread assignments, in port order
    pub dual_if: Vec<TrexDualIf>,
}

/// Data-plane threads assigned to one NUMA socket.
#[derive(Serialize, Debug)]
pub struct TrexDualIf {
    /// NUMA socket id
    pub socket: u32,
    /// Thread ids pinned to that socket; empty when none were configured
    pub threads: Vec<u32>,
}

/// Opaque record of a launched server.
///
/// The launch is fire-and-forget: no process handle is retained and nothing
/// ever waits on the server. This record only tells the caller where the
/// server ended up (its PID, its output log, the config it was started with).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerHandle {
    /// OS process id of the spawned server
    pub pid: u32,
    /// File receiving the server's stdout and stderr
    pub log_path: PathBuf,
    /// Configuration file the server was pointed at
    pub config_path: PathBuf,
}
