//! Public configuration types consumed by the plugin runtime.
//!
//! Everything here is built once by the loader and never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Default value of `[cisco] model_class`.
pub const DEFAULT_MODEL_CLASS: &str =
    "neutron.plugins.cisco.models.virt_phy_sw_v2.VirtualPhysicalSwitchModelV2";

/// Default SSH port for `[NEXUS_SWITCH:<address>]` sections.
pub const DEFAULT_NEXUS_SSH_PORT: u16 = 22;

/// Validated options from the `[cisco]` and `[cisco_n1k]` sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginOptions {
    /// Prefix for tenant VLAN interface names (`q-2001`).
    pub vlan_name_prefix: String,
    /// Prefix for provider VLAN interface names (`p-2001`).
    pub provider_vlan_name_prefix: String,
    pub provider_vlan_auto_create: bool,
    pub provider_vlan_auto_trunk: bool,
    /// Dotted module path of the plugin model class.
    pub model_class: String,
    pub nexus_l3_enable: bool,
    pub svi_round_robin: bool,

    pub integration_bridge: String,
    pub default_policy_profile: String,
    pub network_node_policy_profile: String,
    pub default_network_profile: String,
    /// Seconds between policy-profile polls.
    pub poll_duration: u64,
    pub restrict_policy_profiles: bool,
    pub http_pool_size: usize,
    /// Seconds.
    pub http_timeout: u64,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            vlan_name_prefix: "q-".to_string(),
            provider_vlan_name_prefix: "p-".to_string(),
            provider_vlan_auto_create: true,
            provider_vlan_auto_trunk: true,
            model_class: DEFAULT_MODEL_CLASS.to_string(),
            nexus_l3_enable: false,
            svi_round_robin: false,
            integration_bridge: "br-int".to_string(),
            default_policy_profile: "service_profile".to_string(),
            network_node_policy_profile: "dhcp_pp".to_string(),
            default_network_profile: "network_pool".to_string(),
            poll_duration: 60,
            restrict_policy_profiles: false,
            http_pool_size: 4,
            http_timeout: 15,
        }
    }
}

impl PluginOptions {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_duration)
    }

    pub fn http_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Interface name for a tenant VLAN, e.g. `q-2001`.
    pub fn vlan_name(&self, vlan_id: u16) -> String {
        format!("{}{vlan_id}", self.vlan_name_prefix)
    }

    /// Interface name for a provider VLAN, e.g. `p-2001`.
    pub fn provider_vlan_name(&self, vlan_id: u16) -> String {
        format!("{}{vlan_id}", self.provider_vlan_name_prefix)
    }
}

/// A password or other credential that must not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("********")
    }
}

/// Login for a VSM, from an `[N1KV:<address>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchCredential {
    pub address: String,
    pub username: String,
    pub password: Secret,
}

/// A Nexus switch, from a `[NEXUS_SWITCH:<address>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NexusSwitch {
    pub address: String,
    pub username: String,
    pub password: Secret,
    pub ssh_port: u16,
    /// compute hostname -> switch port (e.g. `compute1` -> `1/2`).
    pub host_ports: BTreeMap<String, String>,
}

impl NexusSwitch {
    pub fn port_for_host(&self, host: &str) -> Option<&str> {
        self.host_ports.get(host).map(String::as_str)
    }
}

/// Fully-resolved plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginConfig {
    pub options: PluginOptions,
    /// address -> credential, one per `N1KV:` section.
    pub credentials: BTreeMap<String, SwitchCredential>,
    /// address -> switch, one per `NEXUS_SWITCH:` section.
    pub nexus_switches: BTreeMap<String, NexusSwitch>,
}

impl PluginConfig {
    pub fn credential(&self, address: &str) -> Option<&SwitchCredential> {
        self.credentials.get(address)
    }

    pub fn nexus_switch(&self, address: &str) -> Option<&NexusSwitch> {
        self.nexus_switches.get(address)
    }
}
