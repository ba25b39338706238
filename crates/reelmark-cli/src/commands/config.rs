use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelmark_config::{Config, PathManager};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, paths, output),
        ConfigCommands::Init { api_key, language, force } => init_config(api_key, language, force, paths, output),
    }
}

fn show_config(full: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let exists = config_file.exists();

    // Same view the other commands get: file (or defaults) plus TMDB_* overrides
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;

    let api_key = if full { config.tmdb.api_key.clone() } else { mask_string(&config.tmdb.api_key) };
    let storage_dir = config.storage.dir.clone().unwrap_or_else(|| paths.storage_dir());
    let log_file = config.logging.file.as_ref().map(|p| p.display().to_string());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": exists,
            "tmdb": {
                "api_key": api_key,
                "api_key_configured": config.is_api_key_configured(),
                "api_base_url": config.tmdb.api_base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
            },
            "storage_dir": storage_dir.display().to_string(),
            "toast_ttl_seconds": config.toast.ttl_seconds,
            "logging": {
                "level": config.logging.level,
                "file": log_file,
            },
        }));
        return Ok(());
    }

    if !exists {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Create one with 'reelmark config init --api-key <KEY>'. Showing defaults and environment overrides.");
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display().to_string())]);
    table.add_row(vec![
        Cell::new("API Key"),
        Cell::new(if config.is_api_key_configured() { api_key } else { "<not set>".red().to_string() }),
    ]);
    table.add_row(vec![Cell::new("API Base URL"), Cell::new(&config.tmdb.api_base_url)]);
    table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
    table.add_row(vec![Cell::new("Storage"), Cell::new(storage_dir.display().to_string())]);
    table.add_row(vec![Cell::new("Toast TTL"), Cell::new(format!("{} seconds", config.toast.ttl_seconds))]);
    table.add_row(vec![Cell::new("Log Level"), Cell::new(&config.logging.level)]);
    table.add_row(vec![Cell::new("Log File"), Cell::new(log_file.unwrap_or_else(|| "stderr".to_string()))]);
    output.table(table);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is not usable yet: {}", e));
    }

    Ok(())
}

fn init_config(
    api_key: String,
    language: Option<String>,
    force: bool,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
    }

    let mut config = Config::default();
    config.tmdb.api_key = api_key.trim().to_string();
    if let Some(language) = language {
        config.tmdb.language = language;
    }
    config.validate().map_err(|e| eyre!("{}", e))?;

    paths.ensure_directories().map_err(|e| eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    tracing::info!("Wrote configuration to {}", config_file.display());
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "<not set>".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }
}
