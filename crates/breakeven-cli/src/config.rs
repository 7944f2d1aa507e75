use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

use breakeven_core::handlers::FormOptions;
use breakeven_core::levels::ProductionLevels;
use breakeven_core::presentation::DisplayOptions;
use breakeven_core::InvalidMarginPolicy;

/// Settings read from a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub levels: Option<Vec<Decimal>>,
    pub currency_symbol: Option<String>,
    pub on_invalid_margin: Option<InvalidMarginPolicy>,
}

/// Values given on the command line; these win over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub levels: Option<Vec<Decimal>>,
    pub currency_symbol: Option<String>,
    pub on_invalid_margin: Option<InvalidMarginPolicy>,
}

pub fn parse_file_config(contents: &str) -> Result<FileConfig, Box<dyn std::error::Error>> {
    Ok(toml::from_str(contents)?)
}

/// Defaults, then the optional file, then command-line overrides.
pub fn resolve(file: FileConfig, cli: Overrides) -> Result<FormOptions, Box<dyn std::error::Error>> {
    let mut options = FormOptions::default();

    if let Some(levels) = cli.levels.or(file.levels) {
        options.levels =
            ProductionLevels::new(levels).ok_or("production levels must not be empty")?;
    }
    if let Some(symbol) = cli.currency_symbol.or(file.currency_symbol) {
        options.display = DisplayOptions {
            currency_symbol: symbol,
        };
    }
    if let Some(policy) = cli.on_invalid_margin.or(file.on_invalid_margin) {
        options.on_invalid_margin = policy;
    }

    tracing::debug!(
        levels = options.levels.len(),
        currency_symbol = %options.display.currency_symbol,
        on_invalid_margin = ?options.on_invalid_margin,
        "configuration resolved"
    );
    Ok(options)
}

pub fn load(path: Option<&str>, cli: Overrides) -> Result<FormOptions, Box<dyn std::error::Error>> {
    let file = match path {
        Some(p) => {
            let contents =
                fs::read_to_string(p).map_err(|e| format!("Failed to read config '{}': {}", p, e))?;
            parse_file_config(&contents).map_err(|e| format!("Invalid config '{}': {}", p, e))?
        }
        None => FileConfig::default(),
    };
    resolve(file, cli)
}
