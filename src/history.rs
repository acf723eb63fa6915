//! The in-memory match collection and the sources it can be built from.

use crate::api::models::GameDto;
use crate::config::Credentials;
use crate::error::AppError;
use crate::models::Match;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only collection of finished games.
#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    matches: Vec<Match>,
}

impl MatchStore {
    pub fn new(matches: Vec<Match>) -> Self {
        MatchStore { matches }
    }

    /// Flattens retrieval pages in order.
    pub fn from_pages(pages: Vec<Vec<Match>>) -> Self {
        Self::new(pages.into_iter().flatten().collect())
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Where the match history comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySource {
    File(PathBuf),
    Account(Credentials),
}

impl HistorySource {
    /// A file wins over account credentials. The file must be a `.json` export.
    pub fn resolve(
        file: Option<PathBuf>,
        credentials: Option<Credentials>,
    ) -> Result<Self, AppError> {
        match (file, credentials) {
            (Some(path), _) => {
                let is_json = path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false);
                if !is_json {
                    return Err(AppError::SourceFormat(format!(
                        "{} is not a .json history export",
                        path.display()
                    )));
                }
                Ok(HistorySource::File(path))
            }
            (None, Some(credentials)) => Ok(HistorySource::Account(credentials)),
            (None, None) => Err(AppError::SourceFormat(
                "supply a .json history export or set TRACKOBOT_USERNAME and TRACKOBOT_TOKEN"
                    .to_string(),
            )),
        }
    }
}

// An export is either the full page object or the bare game list.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Page { history: Vec<GameDto> },
    Games(Vec<GameDto>),
}

pub fn parse_history(content: &str) -> Result<MatchStore, AppError> {
    let file: HistoryFile = serde_json::from_str(content).map_err(|e| {
        AppError::SourceFormat(format!("history is not a valid export: {}", e))
    })?;

    let games = match file {
        HistoryFile::Page { history } => history,
        HistoryFile::Games(games) => games,
    };

    let matches = games
        .into_iter()
        .map(Match::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(games = matches.len(), "parsed history");
    Ok(MatchStore::new(matches))
}

pub fn load_history_file(path: &Path) -> Result<MatchStore, AppError> {
    let content = fs::read_to_string(path)?;
    parse_history(&content)
}
