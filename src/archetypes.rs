use crate::api::models::DeckListDto;
use crate::error::AppError;
use crate::models::ArchetypePair;
use std::fs;
use std::path::PathBuf;

/// Supplies the opponent archetypes to evaluate when none were given.
pub trait ArchetypeSource {
    fn load_archetypes(&self) -> Result<Vec<ArchetypePair>, AppError>;
}

impl ArchetypeSource for Vec<ArchetypePair> {
    fn load_archetypes(&self) -> Result<Vec<ArchetypePair>, AppError> {
        Ok(self.clone())
    }
}

/// A deck list export: `{"decks": [{"name", "hero", "active"}]}`. Inactive decks are skipped.
#[derive(Debug, Clone)]
pub struct ArchetypeFile {
    pub path: PathBuf,
}

impl ArchetypeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ArchetypeFile { path: path.into() }
    }
}

impl ArchetypeSource for ArchetypeFile {
    fn load_archetypes(&self) -> Result<Vec<ArchetypePair>, AppError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            AppError::ConfigError(format!(
                "Failed to read archetype list {}: {}",
                self.path.display(),
                e
            ))
        })?;
        parse_archetypes(&content)
    }
}

pub fn parse_archetypes(content: &str) -> Result<Vec<ArchetypePair>, AppError> {
    let list: DeckListDto = serde_json::from_str(content).map_err(|e| {
        AppError::JsonError(format!("Failed to parse archetype list: {}", e))
    })?;

    Ok(list
        .decks
        .into_iter()
        .filter(|deck| deck.active)
        .map(|deck| ArchetypePair::new(deck.name, deck.hero))
        .collect())
}
