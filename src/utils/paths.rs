use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn get_app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".todo-projects"))
}

pub fn get_data_dir() -> Result<PathBuf> {
    let app_dir = get_app_dir()?;
    Ok(app_dir.join("data"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_dir()?;
    Ok(app_dir.join("config.toml"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let app_dir = get_app_dir()?;
    Ok(app_dir.join("logs"))
}
