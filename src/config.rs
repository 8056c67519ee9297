use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Canonical PCI bus address form: `DDDD:BB:DD.F` (domain:bus:device.function)
static PCI_PATTERN: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"^[0-9a-fA-F]{4}:[0-9a-fA-F]{2}:[0-9a-fA-F]{2}\.[0-7]$").unwrap()
);

/// Traffic-generator configuration consumed by the renderer and launcher.
///
/// This arrives fully populated from the benchmark configuration file and is
/// never mutated by the rendering or launch path.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// Namespace prefix for the generator's DPDK resources and config file
    pub name: String,
    /// Number of cores handed to the generator's data-plane threads
    pub cores: u32,
    /// Run the generator in software (non-accelerated) mode
    #[serde(default)]
    pub software_mode: bool,
    /// Enable VLAN tagging on generated traffic
    #[serde(default)]
    pub vlan_tagging: bool,
    /// Memory-buffer pool multiplier, omitted when the generator default applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mbuf_factor: Option<u32>,
    /// PCI bus addresses of the NICs handed to the generator, in port order
    pub pcis: Vec<String>,
    /// ZMQ publisher port for the generator's control plane
    pub zmq_pub_port: u16,
    /// ZMQ RPC port for the generator's control plane
    pub zmq_rpc_port: u16,
    /// Memory cap for the generator process, in MB
    pub limit_memory: u32,
    /// Free-form generator tuning knobs, queried for `vtep_vlan`
    #[serde(default)]
    pub gen_config: HashMap<String, Value>,
    /// Optional CPU thread-pinning layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformConfig>,
}

/// CPU thread-pinning layout for the generator.
///
/// Both thread ids must be set (and non-zero) for the layout to take effect;
/// otherwise the generator falls back to its own defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlatformConfig {
    /// Thread id of the generator's master thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_thread_id: Option<u32>,
    /// Thread id of the latency-measurement thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_thread_id: Option<u32>,
    /// Per-NIC-socket thread bindings, in port order
    #[serde(default)]
    pub dual_if: Vec<CoreThreadBinding>,
}

/// Threads bound to one NUMA socket.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoreThreadBinding {
    /// NUMA socket the threads belong to
    pub socket: u32,
    /// Data-plane thread ids on that socket; a missing list is recoverable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<u32>>,
}

impl GeneratorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::InvalidGenerator(
                "name cannot be empty".to_string()
            ));
        }

        if self.cores == 0 {
            return Err(ValidationError::InvalidGenerator(
                "cores must be at least 1".to_string()
            ));
        }

        if self.limit_memory == 0 {
            return Err(ValidationError::InvalidGenerator(
                "limit_memory must be non-zero".to_string()
            ));
        }

        if self.zmq_pub_port == 0 || self.zmq_rpc_port == 0 {
            return Err(ValidationError::InvalidPorts(
                "ZMQ ports must be non-zero".to_string()
            ));
        }
        if self.zmq_pub_port == self.zmq_rpc_port {
            return Err(ValidationError::InvalidPorts(
                format!("zmq_pub_port and zmq_rpc_port must differ (both {})", self.zmq_pub_port)
            ));
        }

        for pci in &self.pcis {
            if !PCI_PATTERN.is_match(pci) {
                return Err(ValidationError::InvalidInterface(
                    format!("'{}' is not a valid PCI bus address (expected DDDD:BB:DD.F)", pci)
                ));
            }
        }

        Ok(())
    }

    /// Whether the free-form generator settings carry a truthy `vtep_vlan` flag
    pub fn vtep_vlan(&self) -> bool {
        self.gen_config.get("vtep_vlan").map_or(false, is_truthy)
    }
}

/// Truthiness of a free-form YAML value, matching the generator's own
/// reading of its tuning knobs: null, false, 0, "" and empty collections
/// are false, everything else is true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid generator configuration: {0}")]
    InvalidGenerator(String),
    #[error("Invalid interface configuration: {0}")]
    InvalidInterface(String),
    #[error("Invalid control-plane ports: {0}")]
    InvalidPorts(String),
}
