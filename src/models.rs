use crate::analysis::turn_window::TurnWindow;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A deck identity: the play style (e.g. "Midrange") plus the hero class.
/// An empty style stands for decks the tracker could not classify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypePair {
    pub style: String,
    pub hero: String,
}

impl ArchetypePair {
    pub fn new(style: impl Into<String>, hero: impl Into<String>) -> Self {
        ArchetypePair {
            style: style.into(),
            hero: hero.into(),
        }
    }

    /// Style name for display, "Other" for unclassified decks.
    pub fn readable_style(&self) -> &str {
        if self.style.is_empty() {
            "Other"
        } else {
            &self.style
        }
    }
}

impl fmt::Display for ArchetypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.readable_style(), self.hero)
    }
}

/// Parses `Style:Hero`. The style may be empty (`:Warrior`), the hero may not.
impl FromStr for ArchetypePair {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (style, hero) = s.rsplit_once(':').ok_or_else(|| {
            AppError::InvalidInput(format!("Expected Style:Hero, got '{}'", s))
        })?;

        let hero = hero.trim();
        if hero.is_empty() {
            return Err(AppError::InvalidInput(format!("Missing hero class in '{}'", s)));
        }

        Ok(ArchetypePair::new(style.trim(), hero))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Me,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
}

/// Card reference inside a play. Either field may be used to identify the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub id: String,
    pub name: String,
}

impl CardRef {
    pub fn matches(&self, card: &str) -> bool {
        self.name == card || self.id == card
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub actor: Actor,
    pub turn: u32,
    pub card: CardRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: u64,
    pub added: DateTime<Utc>,
    pub own: ArchetypePair,
    pub opponent: ArchetypePair,
    pub outcome: MatchOutcome,
    pub plays: Vec<Play>,
}

impl Match {
    pub fn is_win(&self) -> bool {
        self.outcome == MatchOutcome::Win
    }

    /// Number of times the tracked player played `card` inside the turn window.
    pub fn eligible_plays(&self, card: &str, window: &TurnWindow) -> usize {
        self.plays
            .iter()
            .filter(|play| {
                play.actor == Actor::Me && play.card.matches(card) && window.eligible(play)
            })
            .count()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_archetype_pair() {
        let pair: ArchetypePair = "Midrange:Shaman".parse().unwrap();
        assert_eq!(pair, ArchetypePair::new("Midrange", "Shaman"));

        let other: ArchetypePair = ":Warrior".parse().unwrap();
        assert_eq!(other.style, "");
        assert_eq!(other.to_string(), "Other Warrior");

        assert!("Shaman".parse::<ArchetypePair>().is_err());
        assert!("Midrange:".parse::<ArchetypePair>().is_err());
    }

    #[test]
    fn test_card_ref_matches_id_or_name() {
        let card = CardRef {
            id: "GAME_005".to_string(),
            name: "The Coin".to_string(),
        };
        assert!(card.matches("The Coin"));
        assert!(card.matches("GAME_005"));
        assert!(!card.matches("Coin"));
    }

    #[test]
    fn test_eligible_plays_ignore_opponent_and_late_turns() {
        let m = game(
            1,
            ("Midrange", "Shaman"),
            ("Aggro", "Warrior"),
            MatchOutcome::Win,
            vec![
                play(Actor::Me, 1, "Coin"),
                play(Actor::Opponent, 1, "Coin"),
                play(Actor::Me, 3, "Coin"),
                play(Actor::Me, 7, "Coin"),
            ],
        );

        assert_eq!(m.eligible_plays("Coin", &TurnWindow::unrestricted()), 3);
        assert_eq!(m.eligible_plays("Coin", &TurnWindow::new(3)), 2);
        assert_eq!(m.eligible_plays("Coin", &TurnWindow::new(1)), 1);
        assert_eq!(m.eligible_plays("Coin", &TurnWindow::new(0)), 0);
        assert_eq!(m.eligible_plays("Backstab", &TurnWindow::unrestricted()), 0);
    }
}
