use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// SPI clock used when nothing is configured
pub const DEFAULT_SPI_HZ: u32 = 27_000_000;
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.0";
/// Waveshare 3.5" HAT wiring (BCM numbering)
pub const DEFAULT_DC_PIN: u64 = 24;
pub const DEFAULT_RST_PIN: u64 = 25;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// panel wiring & orientation
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub spi_device: Option<String>,  // e.g. "/dev/spidev0.0"
    pub spi_hz: Option<u32>,
    pub dc_pin: Option<u64>,         // sysfs GPIO number
    pub rst_pin: Option<u64>,        // omit when reset is hard-wired
    pub rotation: Option<u8>,        // 0..=3
}

impl DisplayConfig {
    pub fn spi_device(&self) -> &str {
        self.spi_device.as_deref().unwrap_or(DEFAULT_SPI_DEVICE)
    }

    pub fn spi_hz(&self) -> u32 {
        self.spi_hz.unwrap_or(DEFAULT_SPI_HZ)
    }

    pub fn dc_pin(&self) -> u64 {
        self.dc_pin.unwrap_or(DEFAULT_DC_PIN)
    }

    pub fn rotation(&self) -> u8 {
        self.rotation.unwrap_or(0)
    }
}

impl Config {
    /// Display section, or an all-defaults one
    pub fn display_or_default(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_else(|| DisplayConfig {
            rst_pin: Some(DEFAULT_RST_PIN),
            ..DisplayConfig::default()
        })
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "ili9486-demo", about = "ILI9486 panel demo", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// SPI device node
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub spi_device: Option<String>,
    #[arg(long)]
    pub spi_hz: Option<u32>,
    #[arg(long)]
    pub dc_pin: Option<u64>,
    #[arg(long)]
    pub rst_pin: Option<u64>,
    /// 0 portrait, 1 landscape, 2 and 3 flipped
    #[arg(long)]
    pub rotation: Option<u8>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = resolve(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Defaults -> YAML -> CLI -> validation
fn resolve(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/ili9486/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/ili9486/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/ili9486.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["ili9486.yaml", "config/ili9486.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.spi_device.is_some()  { dst.spi_device = src.spi_device; }
    if src.spi_hz.is_some()      { dst.spi_hz = src.spi_hz; }
    if src.dc_pin.is_some()      { dst.dc_pin = src.dc_pin; }
    if src.rst_pin.is_some()     { dst.rst_pin = src.rst_pin; }
    if src.rotation.is_some()    { dst.rotation = src.rotation; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    let any_display = cli.spi_device.is_some()
        || cli.spi_hz.is_some()
        || cli.dc_pin.is_some()
        || cli.rst_pin.is_some()
        || cli.rotation.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(cfg.display_or_default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.spi_device.is_some()  { display.spi_device = cli.spi_device.clone(); }
        if cli.spi_hz.is_some()      { display.spi_hz = cli.spi_hz; }
        if cli.dc_pin.is_some()      { display.dc_pin = cli.dc_pin; }
        if cli.rst_pin.is_some()     { display.rst_pin = cli.rst_pin; }
        if cli.rotation.is_some()    { display.rotation = cli.rotation; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        if level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Validation(format!("unknown log_level '{level}'")));
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if display.spi_hz == Some(0) {
            return Err(ConfigError::Validation("display spi_hz must be > 0".into()));
        }
        if let Some(rot) = display.rotation {
            if rot > 3 {
                return Err(ConfigError::Validation("display rotation must be 0|1|2|3".into()));
            }
        }
        if display.rst_pin == Some(display.dc_pin()) {
            return Err(ConfigError::Validation("display dc_pin and rst_pin must differ".into()));
        }
    }
    Ok(())
}
