//! Resolution of raw sections into typed configuration.
//!
//! Sections are resolved in source order and validation is fail-fast: the
//! first bad value aborts the load and no partially-built configuration is
//! returned. Within a known section its own options are checked in schema
//! order, then any options that belong to the other known section.

use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::AppError;

use super::raw::{self, ConfigSection, RawCisco, RawN1k, RawSwitchLogin};
use super::types::*;

pub const CISCO_SECTION: &str = "cisco";
pub const N1K_SECTION: &str = "cisco_n1k";
pub const N1KV_PREFIX: &str = "N1KV:";
pub const NEXUS_SWITCH_PREFIX: &str = "NEXUS_SWITCH:";

/// Path used when neither an explicit path nor `CISCO_PLUGIN_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/cisco_plugins.ini";

/// Load config from the given path, `CISCO_PLUGIN_CONFIG`, or
/// [`DEFAULT_CONFIG_PATH`], in that order.
pub fn load(config_path: Option<&str>) -> Result<PluginConfig, AppError> {
    let env_path = env::var("CISCO_PLUGIN_CONFIG").ok();
    let path = config_path
        .or(env_path.as_deref())
        .unwrap_or(DEFAULT_CONFIG_PATH);
    load_from(&expand_home(path))
}

/// Read and resolve a configuration file.
pub fn load_from(path: &Path) -> Result<PluginConfig, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read configuration file");
    load_str(&text)
}

/// Parse and resolve configuration text.
pub fn load_str(text: &str) -> Result<PluginConfig, AppError> {
    let sections = raw::parse(text)?;
    load_sections(&sections)
}

/// Resolve already-parsed sections into a [`PluginConfig`].
pub fn load_sections(sections: &[ConfigSection]) -> Result<PluginConfig, AppError> {
    let mut seen = HashSet::new();
    let mut options = PluginOptions::default();
    let mut credentials = BTreeMap::new();
    let mut nexus_switches = BTreeMap::new();

    for section in sections {
        if !seen.insert(section.name.as_str()) {
            return Err(AppError::DuplicateSection { name: section.name.clone() });
        }

        if section.name == CISCO_SECTION {
            apply_cisco(&section.name, raw::shape(section)?, &mut options)?;
            apply_n1k(&section.name, raw::shape(section)?, &mut PluginOptions::default())?;
            report_extra_keys(section, raw::CISCO_KEYS, raw::N1K_KEYS, N1K_SECTION);
        } else if section.name == N1K_SECTION {
            apply_n1k(&section.name, raw::shape(section)?, &mut options)?;
            apply_cisco(&section.name, raw::shape(section)?, &mut PluginOptions::default())?;
            report_extra_keys(section, raw::N1K_KEYS, raw::CISCO_KEYS, CISCO_SECTION);
        } else if let Some(rest) = section.name.strip_prefix(N1KV_PREFIX) {
            let credential = resolve_credential(section, rest)?;
            if credentials.contains_key(&credential.address) {
                return Err(AppError::DuplicateSection { name: section.name.clone() });
            }
            credentials.insert(credential.address.clone(), credential);
        } else if let Some(rest) = section.name.strip_prefix(NEXUS_SWITCH_PREFIX) {
            let switch = resolve_nexus_switch(section, rest)?;
            if nexus_switches.contains_key(&switch.address) {
                return Err(AppError::DuplicateSection { name: section.name.clone() });
            }
            nexus_switches.insert(switch.address.clone(), switch);
        } else {
            debug!(section = %section.name, "ignoring unrecognised section");
        }
    }

    info!(
        credentials = credentials.len(),
        nexus_switches = nexus_switches.len(),
        nexus_l3_enable = options.nexus_l3_enable,
        "plugin configuration loaded"
    );

    Ok(PluginConfig { options, credentials, nexus_switches })
}

fn apply_cisco(section: &str, raw: RawCisco, opts: &mut PluginOptions) -> Result<(), AppError> {
    if let Some(v) = raw.vlan_name_prefix {
        opts.vlan_name_prefix = non_empty(section, "vlan_name_prefix", v)?;
    }
    if let Some(v) = raw.provider_vlan_name_prefix {
        opts.provider_vlan_name_prefix = non_empty(section, "provider_vlan_name_prefix", v)?;
    }
    if let Some(v) = raw.provider_vlan_auto_create {
        opts.provider_vlan_auto_create = boolean(section, "provider_vlan_auto_create", &v)?;
    }
    if let Some(v) = raw.provider_vlan_auto_trunk {
        opts.provider_vlan_auto_trunk = boolean(section, "provider_vlan_auto_trunk", &v)?;
    }
    if let Some(v) = raw.model_class {
        opts.model_class = non_empty(section, "model_class", v)?;
    }
    if let Some(v) = raw.nexus_l3_enable {
        opts.nexus_l3_enable = boolean(section, "nexus_l3_enable", &v)?;
    }
    if let Some(v) = raw.svi_round_robin {
        opts.svi_round_robin = boolean(section, "svi_round_robin", &v)?;
    }
    Ok(())
}

fn apply_n1k(section: &str, raw: RawN1k, opts: &mut PluginOptions) -> Result<(), AppError> {
    if let Some(v) = raw.integration_bridge {
        opts.integration_bridge = non_empty(section, "integration_bridge", v)?;
    }
    if let Some(v) = raw.default_policy_profile {
        opts.default_policy_profile = non_empty(section, "default_policy_profile", v)?;
    }
    if let Some(v) = raw.network_node_policy_profile {
        opts.network_node_policy_profile = non_empty(section, "network_node_policy_profile", v)?;
    }
    if let Some(v) = raw.default_network_profile {
        opts.default_network_profile = non_empty(section, "default_network_profile", v)?;
    }
    if let Some(v) = raw.poll_duration {
        opts.poll_duration = positive(section, "poll_duration", &v)?;
    }
    if let Some(v) = raw.restrict_policy_profiles {
        opts.restrict_policy_profiles = boolean(section, "restrict_policy_profiles", &v)?;
    }
    if let Some(v) = raw.http_pool_size {
        opts.http_pool_size = positive(section, "http_pool_size", &v)?;
    }
    if let Some(v) = raw.http_timeout {
        opts.http_timeout = positive(section, "http_timeout", &v)?;
    }
    Ok(())
}

/// Log keys a known section does not apply: options of the other known
/// section (already type-checked) and keys nobody recognises.
fn report_extra_keys(section: &ConfigSection, own: &[&str], foreign: &[&str], home: &str) {
    for key in section.options.keys().map(String::as_str) {
        if own.contains(&key) {
            continue;
        }
        if foreign.contains(&key) {
            warn!(
                section = %section.name,
                key,
                expected_section = home,
                "option belongs to another section; ignoring"
            );
        } else {
            debug!(section = %section.name, key, "ignoring unrecognised option");
        }
    }
}

fn resolve_credential(section: &ConfigSection, address: &str) -> Result<SwitchCredential, AppError> {
    let address = switch_address(section, address)?;
    let raw: RawSwitchLogin = raw::shape(section)?;
    let (username, password) = login(raw.username, raw.password, &address)?;
    Ok(SwitchCredential { address, username, password })
}

fn resolve_nexus_switch(section: &ConfigSection, address: &str) -> Result<NexusSwitch, AppError> {
    let address = switch_address(section, address)?;
    let raw: RawSwitchLogin = raw::shape(section)?;
    let (username, password) = login(raw.username, raw.password, &address)?;

    let ssh_port = match raw.ssh_port {
        None => DEFAULT_NEXUS_SSH_PORT,
        Some(v) => positive(&section.name, "ssh_port", &v)?,
    };

    let mut host_ports = BTreeMap::new();
    for (host, port) in &section.options {
        if raw::SWITCH_LOGIN_KEYS.contains(&host.as_str()) {
            continue;
        }
        if port.is_empty() {
            return Err(AppError::invalid(&section.name, host, port));
        }
        host_ports.insert(host.clone(), port.clone());
    }

    Ok(NexusSwitch { address, username, password, ssh_port, host_ports })
}

fn switch_address(section: &ConfigSection, address: &str) -> Result<String, AppError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AppError::InvalidSectionName { name: section.name.clone() });
    }
    Ok(address.to_string())
}

fn login(
    username: Option<String>,
    password: Option<String>,
    address: &str,
) -> Result<(String, Secret), AppError> {
    match (username, password) {
        (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
            Ok((user, Secret::new(pass)))
        }
        _ => Err(AppError::IncompleteCredential { address: address.to_string() }),
    }
}

fn non_empty(section: &str, key: &str, value: String) -> Result<String, AppError> {
    if value.is_empty() {
        return Err(AppError::invalid(section, key, &value));
    }
    Ok(value)
}

fn boolean(section: &str, key: &str, value: &str) -> Result<bool, AppError> {
    parse_bool(value).ok_or_else(|| AppError::invalid(section, key, value))
}

fn positive<T: TryFrom<u64>>(section: &str, key: &str, value: &str) -> Result<T, AppError> {
    parse_positive(value).ok_or_else(|| AppError::invalid(section, key, value))
}

/// Case-insensitive `true/false/yes/no/on/off/1/0`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// A strictly positive integer that fits in `T`.
fn parse_positive<T: TryFrom<u64>>(value: &str) -> Option<T> {
    let n: i64 = value.parse().ok()?;
    if n <= 0 {
        return None;
    }
    T::try_from(n as u64).ok()
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
