//! Config parsing and profile resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{InfraguardConfigV1, RuleConfig};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `infraguard.toml` into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<InfraguardConfigV1> {
    let cfg: InfraguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profile + CLI overrides + per-rule config).
pub fn resolve_config(
    cfg: InfraguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
