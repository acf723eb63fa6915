use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use crate::error::AppError;
use crate::models::Match;

/// Games fetched for one account. The service forgets card histories after ten
/// days, so everything ever fetched is kept here.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryCache {
    pub username: String,
    pub last_updated: DateTime<Utc>,
    pub games: Vec<Match>,
}

impl HistoryCache {
    pub fn new(username: &str, now: DateTime<Utc>) -> Self {
        HistoryCache {
            username: username.to_string(),
            last_updated: now,
            games: Vec::new(),
        }
    }

    pub fn get_cache_path(username: &str) -> PathBuf {
        let cache_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mulligan_stats");

        cache_dir.join(format!("{}.json", username.replace(['/', '\\'], "_")))
    }

    pub fn load(username: &str, now: DateTime<Utc>) -> Result<Self, AppError> {
        Self::load_from(&Self::get_cache_path(username), username, now)
    }

    /// Only a missing file yields an empty cache. An unreadable one is an error so
    /// it is never overwritten by the next save.
    pub fn load_from(path: &Path, username: &str, now: DateTime<Utc>) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| {
                    AppError::JsonError(format!("Failed to parse cache: {}", e))
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HistoryCache::new(username, now)),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_cache_path(&self.username))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize cache: {}", e))
        })?;

        fs::write(path, json)?;
        Ok(())
    }

    /// Adds games not cached yet and returns how many were new.
    pub fn merge(&mut self, new_games: Vec<Match>, now: DateTime<Utc>) -> usize {
        let mut known: HashSet<u64> = self.games.iter().map(|g| g.id).collect();
        let before = self.games.len();

        for game in new_games {
            if known.insert(game.id) {
                self.games.push(game);
            }
        }

        // Keep most recent games first
        self.games.sort_by(|a, b| b.added.cmp(&a.added));

        self.last_updated = now;
        self.games.len() - before
    }

    pub fn is_stale(&self, now: DateTime<Utc>, max_age_mins: u64) -> bool {
        let age = now.signed_duration_since(self.last_updated);
        age.num_minutes() > max_age_mins as i64
    }
}
