use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use larder_core::pattern::UserNotificationPattern;

pub fn larder_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".larder"))
}

pub fn ensure_larder_home() -> Result<PathBuf> {
    let dir = larder_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn inventory_path() -> Result<PathBuf> {
    Ok(ensure_larder_home()?.join("inventory.csv"))
}

pub fn pattern_path() -> Result<PathBuf> {
    Ok(ensure_larder_home()?.join("pattern.json"))
}

/// The adaptive pattern survives restarts but is never required; a missing
/// or unreadable file just starts fresh.
pub fn read_pattern() -> UserNotificationPattern {
    let Ok(p) = pattern_path() else {
        return UserNotificationPattern::default();
    };
    if !p.exists() {
        return UserNotificationPattern::default();
    }
    fs::read_to_string(&p)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_pattern(pattern: &UserNotificationPattern) -> Result<()> {
    let p = pattern_path()?;
    let json = serde_json::to_string_pretty(pattern)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
