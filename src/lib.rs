//! Typed configuration for the Cisco network plugin.
//!
//! [`config::load`] turns an INI file into an immutable
//! [`config::PluginConfig`] that is passed by reference to every consumer.

pub mod config;
pub mod error;
pub mod logger;
