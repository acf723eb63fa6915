use crate::error::AppError;
use crate::models::{Actor, ArchetypePair, CardRef, Match, MatchOutcome, Play};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// History page response
#[derive(Debug, Deserialize)]
pub struct HistoryPageDto {
    pub history: Vec<GameDto>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageMeta {
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameDto {
    pub id: u64,
    pub added: DateTime<Utc>,
    pub hero: String,
    #[serde(default)]
    pub hero_deck: Option<String>,
    pub opponent: String,
    #[serde(default)]
    pub opponent_deck: Option<String>,
    pub result: String,
    #[serde(default)]
    pub card_history: Vec<CardPlayDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardPlayDto {
    pub player: String,
    pub turn: u32,
    pub card: CardDto,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// Archetype list file
#[derive(Debug, Deserialize)]
pub struct DeckListDto {
    pub decks: Vec<DeckDto>,
}

#[derive(Debug, Deserialize)]
pub struct DeckDto {
    pub name: String,
    pub hero: String,
    #[serde(default)]
    pub active: bool,
}

impl TryFrom<GameDto> for Match {
    type Error = AppError;

    fn try_from(game: GameDto) -> Result<Self, Self::Error> {
        let outcome = match game.result.as_str() {
            "win" => MatchOutcome::Win,
            "loss" => MatchOutcome::Loss,
            other => {
                return Err(AppError::SourceFormat(format!(
                    "game {} has unsupported result '{}'",
                    game.id, other
                )))
            }
        };

        let plays = game
            .card_history
            .into_iter()
            .map(|entry| {
                let actor = match entry.player.as_str() {
                    "me" => Actor::Me,
                    "opponent" => Actor::Opponent,
                    other => {
                        return Err(AppError::SourceFormat(format!(
                            "game {} has a play by unknown player '{}'",
                            game.id, other
                        )))
                    }
                };
                if entry.turn == 0 {
                    return Err(AppError::SourceFormat(format!(
                        "game {} has a play on turn 0",
                        game.id
                    )));
                }
                Ok(Play {
                    actor,
                    turn: entry.turn,
                    card: CardRef {
                        id: entry.card.id,
                        name: entry.card.name,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Match {
            id: game.id,
            added: game.added,
            own: ArchetypePair::new(game.hero_deck.unwrap_or_default(), game.hero),
            opponent: ArchetypePair::new(game.opponent_deck.unwrap_or_default(), game.opponent),
            outcome,
            plays,
        })
    }
}
