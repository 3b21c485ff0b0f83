//! Raw INI reading and deserialization shapes.
//!
//! `parse` turns configuration text into an ordered list of
//! [`ConfigSection`]s using `rust-ini`. The `Raw*` structs mirror the
//! fixed-schema sections and keep every value as the verbatim string; the
//! `load` module converts them into the public `types` structs.

use std::collections::BTreeMap;

use ini::{Ini, ParseOption};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A named group of key/value options as it appears in the source.
///
/// Keys are lower-cased and unique; values are trimmed, otherwise verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSection {
    pub name: String,
    pub options: BTreeMap<String, String>,
}

impl ConfigSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), options: BTreeMap::new() }
    }

    /// Builder used by callers that assemble sections in code.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Parse INI text into sections, in source order.
pub fn parse(text: &str) -> Result<Vec<ConfigSection>, AppError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // Passwords may contain quotes and backslashes; keep values verbatim.
    let opt = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, opt).map_err(|e| AppError::Syntax {
        line: e.line,
        message: e.msg.to_string(),
    })?;

    let mut sections: Vec<ConfigSection> = Vec::new();
    for (name, props) in ini.iter() {
        let Some(name) = name else {
            if let Some((key, _)) = props.iter().next() {
                return Err(AppError::OptionOutsideSection { key: key.trim().to_string() });
            }
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidSectionName { name: name.to_string() });
        }
        if sections.iter().any(|s| s.name == name) {
            return Err(AppError::DuplicateSection { name: name.to_string() });
        }

        let mut section = ConfigSection::new(name);
        for (key, value) in props.iter() {
            let key = key.trim().to_ascii_lowercase();
            if section.options.contains_key(&key) {
                return Err(AppError::DuplicateKey { section: section.name.clone(), key });
            }
            section.options.insert(key, value.trim().to_string());
        }
        sections.push(section);
    }

    Ok(sections)
}

/// Deserialize a section's options into one of the `Raw*` shapes.
/// Keys the shape does not name are left out.
pub(super) fn shape<T: DeserializeOwned>(section: &ConfigSection) -> Result<T, AppError> {
    let object: serde_json::Map<String, serde_json::Value> = section
        .options
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| AppError::Schema {
        section: section.name.clone(),
        message: e.to_string(),
    })
}

// ── [cisco] ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawCisco {
    pub vlan_name_prefix: Option<String>,
    pub provider_vlan_name_prefix: Option<String>,
    pub provider_vlan_auto_create: Option<String>,
    pub provider_vlan_auto_trunk: Option<String>,
    pub model_class: Option<String>,
    pub nexus_l3_enable: Option<String>,
    pub svi_round_robin: Option<String>,
}

pub(super) const CISCO_KEYS: &[&str] = &[
    "vlan_name_prefix",
    "provider_vlan_name_prefix",
    "provider_vlan_auto_create",
    "provider_vlan_auto_trunk",
    "model_class",
    "nexus_l3_enable",
    "svi_round_robin",
];

// ── [cisco_n1k] ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawN1k {
    pub integration_bridge: Option<String>,
    pub default_policy_profile: Option<String>,
    pub network_node_policy_profile: Option<String>,
    pub default_network_profile: Option<String>,
    pub poll_duration: Option<String>,
    pub restrict_policy_profiles: Option<String>,
    pub http_pool_size: Option<String>,
    pub http_timeout: Option<String>,
}

pub(super) const N1K_KEYS: &[&str] = &[
    "integration_bridge",
    "default_policy_profile",
    "network_node_policy_profile",
    "default_network_profile",
    "poll_duration",
    "restrict_policy_profiles",
    "http_pool_size",
    "http_timeout",
];

// ── [N1KV:<address>] / [NEXUS_SWITCH:<address>] ─────────────────────────────

/// Fixed keys of a switch section. Nexus sections also carry
/// `<host> = <port>` pairs, read from the section map directly.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawSwitchLogin {
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssh_port: Option<String>,
}

pub(super) const SWITCH_LOGIN_KEYS: &[&str] = &["username", "password", "ssh_port"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_keys_and_comments() {
        let text = "\
# leading comment
[cisco]
vlan_name_prefix = vnet-
nexus_l3_enable=True

; other comment style
[N1KV:2.2.2.2]
username = admin
password = a=b
";
        let sections = parse(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "cisco");
        assert_eq!(sections[0].get("vlan_name_prefix"), Some("vnet-"));
        assert_eq!(sections[0].get("nexus_l3_enable"), Some("True"));
        assert_eq!(sections[1].name, "N1KV:2.2.2.2");
        assert_eq!(sections[1].get("password"), Some("a=b"));
    }

    #[test]
    fn sections_keep_source_order() {
        let sections = parse("[cisco_n1k]\n[N1KV:1.1.1.1]\n[cisco]\n").unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["cisco_n1k", "N1KV:1.1.1.1", "cisco"]);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let sections = parse("[cisco]\nVLAN_Name_Prefix = x-\n").unwrap();
        assert_eq!(sections[0].get("vlan_name_prefix"), Some("x-"));
    }

    #[test]
    fn quotes_and_backslashes_are_verbatim() {
        let sections = parse("[N1KV:1.1.1.1]\npassword = \"p\\w\"\n").unwrap();
        assert_eq!(sections[0].get("password"), Some("\"p\\w\""));
    }

    #[test]
    fn empty_value_is_kept() {
        let sections = parse("[cisco]\nvlan_name_prefix =\n").unwrap();
        assert_eq!(sections[0].get("vlan_name_prefix"), Some(""));
    }

    #[test]
    fn bom_is_skipped() {
        let sections = parse("\u{feff}[cisco]\n").unwrap();
        assert_eq!(sections[0].name, "cisco");
    }

    #[test]
    fn option_before_header_is_rejected() {
        let err = parse("\n\nfoo = bar\n[cisco]\n").unwrap_err();
        assert!(matches!(err, AppError::OptionOutsideSection { ref key } if key == "foo"), "{err}");
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = parse("[cisco]\njust some words\n").unwrap_err();
        assert!(matches!(err, AppError::Syntax { .. }), "{err}");
    }

    #[test]
    fn unterminated_header_is_rejected() {
        let err = parse("[cisco\n").unwrap_err();
        assert!(matches!(err, AppError::Syntax { .. }), "{err}");
    }

    #[test]
    fn empty_header_is_rejected() {
        let err = parse("[  ]\nx = 1\n").unwrap_err();
        assert!(
            matches!(err, AppError::InvalidSectionName { .. } | AppError::Syntax { .. }),
            "{err}"
        );
    }

    #[test]
    fn repeated_section_is_rejected() {
        let err = parse("[N1KV:1.1.1.1]\nusername = a\n[N1KV:1.1.1.1]\nusername = b\n").unwrap_err();
        assert!(
            matches!(err, AppError::DuplicateSection { .. } | AppError::DuplicateKey { .. }),
            "{err}"
        );
    }

    #[test]
    fn duplicate_key_is_rejected_case_insensitively() {
        let err = parse("[cisco]\nsvi_round_robin = true\nSVI_ROUND_ROBIN = false\n").unwrap_err();
        assert!(matches!(
            err,
            AppError::DuplicateKey { ref section, ref key } if section == "cisco" && key == "svi_round_robin"
        ));
    }

    #[test]
    fn shape_picks_named_keys_only() {
        let section = ConfigSection::new("cisco")
            .with("nexus_l3_enable", "yes")
            .with("future_option", "x");
        let raw: RawCisco = shape(&section).unwrap();
        assert_eq!(raw.nexus_l3_enable.as_deref(), Some("yes"));
        assert!(raw.vlan_name_prefix.is_none());
    }

    #[test]
    fn key_lists_match_shapes() {
        let mut cisco = ConfigSection::new("cisco");
        for key in CISCO_KEYS {
            cisco = cisco.with(key, "v");
        }
        let raw: RawCisco = shape(&cisco).unwrap();
        assert!(raw.svi_round_robin.is_some() && raw.model_class.is_some());

        let mut n1k = ConfigSection::new("cisco_n1k");
        for key in N1K_KEYS {
            n1k = n1k.with(key, "v");
        }
        let raw: RawN1k = shape(&n1k).unwrap();
        assert!(raw.http_timeout.is_some() && raw.integration_bridge.is_some());
    }
}
