use super::turn_window::TurnWindow;
use crate::error::AppError;
use crate::models::Match;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStat {
    pub card: String,
    pub times_played: usize, // every eligible play, several per game possible
    pub games_with_card: usize,
    pub wins_with_card: usize,
}

impl CardStat {
    pub fn new(card: String) -> Self {
        CardStat {
            card,
            times_played: 0,
            games_with_card: 0,
            wins_with_card: 0,
        }
    }

    pub fn losses_with_card(&self) -> usize {
        self.games_with_card - self.wins_with_card
    }

    /// Win rate in games where the card was played, `None` when it never was.
    pub fn win_rate(&self) -> Option<f64> {
        if self.games_with_card == 0 {
            None
        } else {
            Some(self.wins_with_card as f64 / self.games_with_card as f64)
        }
    }
}

/// Computes one `CardStat` per entry of `cards`, in order. Duplicate names are
/// evaluated independently.
pub fn evaluate_cards(
    cards: &[String],
    matches: &[&Match],
    window: &TurnWindow,
) -> Result<Vec<CardStat>, AppError> {
    if cards.is_empty() {
        return Err(AppError::InvalidInput(
            "Please supply at least one card to evaluate".to_string(),
        ));
    }

    Ok(card_stats(cards, matches, window))
}

/// Stats for an already validated card list.
pub(super) fn card_stats(
    cards: &[String],
    matches: &[&Match],
    window: &TurnWindow,
) -> Vec<CardStat> {
    cards
        .iter()
        .map(|card| evaluate_card(card, matches, window))
        .collect()
}

fn evaluate_card(card: &str, matches: &[&Match], window: &TurnWindow) -> CardStat {
    let mut stat = CardStat::new(card.to_string());

    for game in matches {
        let plays = game.eligible_plays(card, window);
        if plays == 0 {
            continue;
        }

        stat.times_played += plays;
        stat.games_with_card += 1;
        if game.is_win() {
            stat.wins_with_card += 1;
        }
    }

    debug!(
        card,
        games = matches.len(),
        times_played = stat.times_played,
        games_with_card = stat.games_with_card,
        "evaluated card"
    );

    stat
}
