use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub prompts_dir: PathBuf,
    pub categories_file: PathBuf,
    pub locales_dir: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match non_empty_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT: {raw}"))?,
            None => 3000,
        };

        Ok(Self {
            prompts_dir: path_var("PROMPTS_DIR", "prompts"),
            categories_file: path_var("CATEGORIES_FILE", "config/categories.json"),
            locales_dir: path_var("LOCALES_DIR", "public/locales"),
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_dir: non_empty_var("LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn path_var(key: &str, default: &str) -> PathBuf {
    non_empty_var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
