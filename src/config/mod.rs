//! Configuration loading for the Cisco plugin.
//!
//! Reads an INI file (`config/cisco_plugins.ini` by default, or the path in
//! `CISCO_PLUGIN_CONFIG`) and resolves it into an immutable [`PluginConfig`].
//!
//! # Module layout
//!
//! - **types** — public structs handed to the plugin runtime
//!   (`PluginOptions`, `SwitchCredential`, `NexusSwitch`, `PluginConfig`).
//! - **raw** — INI text → ordered `ConfigSection`s; no typing.
//! - **load** — `load`, `load_from`, `load_str`, `load_sections`; applies
//!   defaults and validates every value.

mod load;
mod raw;
mod types;

pub use load::{
    CISCO_SECTION, DEFAULT_CONFIG_PATH, N1K_SECTION, N1KV_PREFIX, NEXUS_SWITCH_PREFIX,
    expand_home, load, load_from, load_sections, load_str, parse_bool,
};
pub use raw::{ConfigSection, parse};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_INI: &str = r#"
[cisco]
vlan_name_prefix = vnet-
nexus_l3_enable = True

[cisco_n1k]
poll_duration = 120
http_pool_size = 8

[N1KV:2.2.2.2]
username = admin
password = mySecretPassword
"#;

    fn write_ini(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_sample_config() {
        let f = write_ini(SAMPLE_INI);
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.options.vlan_name_prefix, "vnet-");
        assert!(cfg.options.nexus_l3_enable);
        assert_eq!(cfg.options.poll_duration, 120);
        assert_eq!(cfg.options.http_pool_size, 8);
        assert_eq!(cfg.options.http_timeout, 15);
        assert_eq!(cfg.credentials.len(), 1);
    }

    #[test]
    fn missing_file_errors() {
        let err = load_from(std::path::Path::new("/nonexistent/cisco_plugins.ini")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn shipped_template_loads_to_defaults() {
        let text = include_str!("../../config/cisco_plugins.ini");
        let cfg = load_str(text).unwrap();
        assert_eq!(cfg.options, PluginOptions::default());
        assert!(cfg.credentials.is_empty());
        assert!(cfg.nexus_switches.is_empty());
    }
}
