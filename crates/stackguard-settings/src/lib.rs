//! Policy configuration parsing and pack resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as
//! strings. Everything untyped stops here; the engine only sees a built `PolicyPack`.

#![forbid(unsafe_code)]

mod error;
mod model;
mod resolve;
mod validate;

pub use error::ConfigError;
pub use model::{StackguardConfigV1, TaxonomyConfig};
pub use resolve::{parse_enforcement_level, resolve_pack, Overrides, DEFAULT_PACK_NAME};
pub use validate::validate_policy_config;

use stackguard_domain::policy::PolicyPack;

/// Parse a JSON policy configuration into the typed envelope.
pub fn parse_config_json(input: &str) -> Result<StackguardConfigV1, ConfigError> {
    let cfg: StackguardConfigV1 = serde_json::from_str(input)?;
    Ok(cfg)
}

/// Parse a TOML policy configuration with the same structure as the JSON form.
pub fn parse_config_toml(input: &str) -> Result<StackguardConfigV1, ConfigError> {
    let cfg: StackguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse, validate and build the pack in one step. Empty input yields the defaults.
pub fn load_pack(input: &str, toml: bool, overrides: &Overrides) -> Result<PolicyPack, ConfigError> {
    let cfg = if input.trim().is_empty() {
        StackguardConfigV1::default()
    } else if toml {
        parse_config_toml(input)?
    } else {
        parse_config_json(input)?
    };
    resolve_pack(&cfg, overrides)
}
