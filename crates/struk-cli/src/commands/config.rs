//! Config command - manage configuration.

use std::fs;
use std::path::Path;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use struk_core::models::config::StrukConfig;

use super::config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "extraction.anchor")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, explicit_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path(explicit_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(&path, init_args),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<StrukConfig> {
    if path.exists() {
        Ok(StrukConfig::from_file(path)?)
    } else {
        Ok(StrukConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = read_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(path: &Path, args: InitArgs) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    StrukConfig::default().save(path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(path)?)?;
    let value = lookup(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = read_or_default(path)?;

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    assign(&mut json, key, parsed_value.clone())?;

    let config: StrukConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    // Unknown keys are dropped by deserialization; catch typos here.
    if lookup(&serde_json::to_value(&config)?, key).is_err() {
        anyhow::bail!("Unknown configuration key: {}", key);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'struk config init' to create a configuration file.");
    }

    Ok(())
}

/// Follow a dotted key such as `ocr.tesseract.language`.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set the value at a dotted key; every parent must already exist.
///
/// The last segment may be new (unset optional keys are not serialized).
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent_key, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut current = json;
    if let Some(parent_key) = parent_key {
        for part in parent_key.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let Some(obj) = current.as_object_mut() else {
        anyhow::bail!("Cannot set value at non-object path: {}", key);
    };
    obj.insert(last.to_string(), value);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn defaults() -> Value {
        serde_json::to_value(StrukConfig::default()).unwrap()
    }

    #[test]
    fn test_lookup_dotted_key() {
        let json = defaults();
        assert_eq!(lookup(&json, "extraction.anchor").unwrap(), &json!("BCA"));
        assert_eq!(lookup(&json, "ocr.tesseract.language").unwrap(), &json!("ind+eng"));
        assert!(lookup(&json, "extraction.nope").is_err());
    }

    #[test]
    fn test_assign_round_trips_through_config() {
        let mut json = defaults();
        assign(&mut json, "extraction.merchant_strategy", json!("first-line")).unwrap();
        assign(&mut json, "ocr.ocr_space.timeout_secs", json!(15)).unwrap();

        let config: StrukConfig = serde_json::from_value(json).unwrap();
        assert_eq!(
            config.extraction.merchant_strategy,
            struk_core::MerchantStrategy::FirstLine
        );
        assert_eq!(config.ocr.ocr_space.timeout_secs, 15);
    }

    #[test]
    fn test_assign_optional_key() {
        let mut json = defaults();
        assert!(lookup(&json, "ocr.ocr_space.api_key").is_err());
        assign(&mut json, "ocr.ocr_space.api_key", json!("K123")).unwrap();

        let config: StrukConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.ocr.ocr_space.api_key.as_deref(), Some("K123"));
    }

    #[test]
    fn test_assign_bad_path() {
        let mut json = defaults();
        assert!(assign(&mut json, "missing.anchor", json!(1)).is_err());
        assert!(assign(&mut json, "extraction.anchor.deeper", json!(1)).is_err());
    }
}
