use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub settle: SettleConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Selectors for the host page's accordion markup.
///
/// Only attribute-based selectors belong here; the page's generated class
/// names change between releases.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    /// Transaction toggles. Expanded state is read from `aria-expanded`.
    #[serde(default = "default_control_selector")]
    pub control_selector: String,

    /// Description text inside a toggle.
    #[serde(default = "default_description_selector")]
    pub description_selector: String,

    /// Containers holding one label/value pair each.
    #[serde(default = "default_pair_container_selector")]
    pub pair_container_selector: String,

    /// Text nodes inside a pair container: first is the label, second the value.
    #[serde(default = "default_pair_text_selector")]
    pub pair_text_selector: String,

    /// The transfer message link inside a detail region.
    #[serde(default = "default_message_selector")]
    pub message_selector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleStrategy {
    /// Sleep for `delay_ms` and carry on.
    Fixed,
    /// Poll the page until it stops changing, bounded by `timeout_ms`.
    Stable,
}

/// How long to wait for the page to render newly expanded panels.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettleConfig {
    #[serde(default = "default_strategy")]
    pub strategy: SettleStrategy,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_quiet_polls")]
    pub quiet_polls: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellQuoting {
    /// Every cell quoted, embedded quotes doubled.
    Rfc4180,
    /// Cells written as JSON string literals (backslash escapes).
    Json,
}

/// Output file settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Append `_YYYY-MM-DD_HH-MM-SS` to the prefix.
    #[serde(default = "default_true")]
    pub timestamped: bool,

    #[serde(default = "default_quoting")]
    pub quoting: CellQuoting,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_control_selector() -> String {
    "button[aria-expanded]".to_string()
}
fn default_description_selector() -> String {
    r#"p[data-fs-privacy-rule="unmask"]"#.to_string()
}
fn default_pair_container_selector() -> String {
    "div".to_string()
}
fn default_pair_text_selector() -> String {
    "p".to_string()
}
fn default_message_selector() -> String {
    "a".to_string()
}
fn default_strategy() -> SettleStrategy {
    SettleStrategy::Stable
}
fn default_delay_ms() -> u64 {
    1000
}
fn default_poll_interval_ms() -> u64 {
    250
}
fn default_quiet_polls() -> u32 {
    2
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_prefix() -> String {
    "wealthsimple-transactions".to_string()
}
fn default_true() -> bool {
    true
}
fn default_quoting() -> CellQuoting {
    CellQuoting::Rfc4180
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            control_selector: default_control_selector(),
            description_selector: default_description_selector(),
            pair_container_selector: default_pair_container_selector(),
            pair_text_selector: default_pair_text_selector(),
            message_selector: default_message_selector(),
        }
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            delay_ms: default_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            quiet_polls: default_quiet_polls(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            file_prefix: default_file_prefix(),
            timestamped: true,
            quoting: default_quoting(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_sources(environment())
    }

    fn from_sources(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(env)
            .build()?;

        cfg.try_deserialize().context("Invalid configuration")
    }
}

/// `WSX_SECTION__KEY`, e.g. `WSX_SETTLE__STRATEGY=fixed`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("WSX")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_behaviour() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.settle.delay_ms, 1000);
        assert_eq!(cfg.settle.strategy, SettleStrategy::Stable);
        assert_eq!(cfg.export.file_prefix, "wealthsimple-transactions");
        assert!(cfg.export.timestamped);
        assert_eq!(cfg.page.control_selector, "button[aria-expanded]");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[settle]\nstrategy = \"fixed\"\ndelay_ms = 1500\n\n[export]\nquoting = \"json\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.settle.strategy, SettleStrategy::Fixed);
        assert_eq!(cfg.settle.delay_ms, 1500);
        assert_eq!(cfg.settle.quiet_polls, 2);
        assert_eq!(cfg.export.quoting, CellQuoting::Json);
        assert!(cfg.export.timestamped);
        assert_eq!(cfg.page.message_selector, "a");
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides_use_single_underscore_after_prefix() {
        let cfg = AppConfig::from_sources(env(&[
            ("WSX_SETTLE__STRATEGY", "fixed"),
            ("WSX_SETTLE__DELAY_MS", "1234"),
            ("WSX_EXPORT__TIMESTAMPED", "false"),
        ]))
        .unwrap();

        assert_eq!(cfg.settle.strategy, SettleStrategy::Fixed);
        assert_eq!(cfg.settle.delay_ms, 1234);
        assert!(!cfg.export.timestamped);
        assert_eq!(cfg.export.file_prefix, "wealthsimple-transactions");
    }

    #[test]
    fn test_invalid_value_is_an_error_not_a_reset() {
        let err = AppConfig::from_sources(env(&[
            ("WSX_EXPORT__OUT_DIR", "/my/exports"),
            ("WSX_SETTLE__STRATEGY", "bogus"),
        ]))
        .unwrap_err();

        assert!(format!("{:#}", err).contains("Invalid configuration"));
    }
}
