//! Runtime configuration resolved from flags and environment.
//!
//! # Invariants
//! - `data_dir` is absolute; the logger refuses relative directories.
//! - `today` is fixed once per invocation so every step sees the same date.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "questline.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub today: NaiveDate,
}

impl CliConfig {
    pub fn resolve(
        data_dir: &Path,
        log_level: Option<&str>,
        today: Option<NaiveDate>,
    ) -> anyhow::Result<Self> {
        let data_dir = if data_dir.is_absolute() {
            data_dir.to_path_buf()
        } else {
            std::env::current_dir()
                .context("failed to read current directory")?
                .join(data_dir)
        };

        Ok(Self {
            data_dir,
            log_level: log_level
                .unwrap_or(questline_core::default_log_level())
                .to_string(),
            today: today.unwrap_or_else(|| Local::now().date_naive()),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}
