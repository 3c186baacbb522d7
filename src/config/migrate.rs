use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use rusqlite::Connection;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
pub const EXPECTED_KEYS: [&str; 8] = [
    "database",
    "workers",
    "distribution_mode",
    "lunch_windows",
    "chain_mode",
    "worker_names",
    "text_limit",
    "export_dir",
];

/// Keys absent from the YAML document (in canonical order).
pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
    let yaml: Value = serde_yaml::from_str(content)?;
    let Some(map) = yaml.as_mapping() else {
        return Err(AppError::Config("configuration root is not a mapping".into()));
    };

    Ok(EXPECTED_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Merge the default value of every missing key into `content`.
/// Existing values are never touched.
pub fn fill_missing_keys(content: &str) -> AppResult<(String, Vec<&'static str>)> {
    let mut yaml: Value = serde_yaml::from_str(content)?;
    let defaults = serde_yaml::to_value(super::Config::default())?;

    let (Some(map), Some(defaults)) = (yaml.as_mapping_mut(), defaults.as_mapping()) else {
        return Err(AppError::Config("configuration root is not a mapping".into()));
    };

    let added = merge_defaults(map, defaults);
    Ok((serde_yaml::to_string(&yaml)?, added))
}

fn merge_defaults(map: &mut Mapping, defaults: &Mapping) -> Vec<&'static str> {
    let mut added = Vec::new();
    for key in EXPECTED_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k)
            && let Some(v) = defaults.get(&k)
        {
            map.insert(k, v.clone());
            added.push(key);
        }
    }
    added
}

/// Rewrite the config file at `path` with missing keys added, logging the
/// change. Returns the keys that were added.
pub fn migrate_config_file(conn: &Connection, path: &Path) -> AppResult<Vec<&'static str>> {
    if !path.exists() {
        info(format!("No configuration file at {}", path.display()));
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let (updated, added) = fill_missing_keys(&content)?;

    if added.is_empty() {
        info("Configuration is up to date.");
        return Ok(added);
    }

    fs::write(path, updated)?;
    ttlog(
        conn,
        "config_migrate",
        &path.to_string_lossy(),
        &format!("Added missing keys: {}", added.join(", ")),
    )?;
    success(format!("Configuration updated, added: {}", added.join(", ")));

    Ok(added)
}
