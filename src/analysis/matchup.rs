use super::card_stats::{card_stats, CardStat};
use super::selector::{count_wins, select_opponent_deck, select_own_deck};
use super::turn_window::TurnWindow;
use crate::archetypes::ArchetypeSource;
use crate::error::AppError;
use crate::history::MatchStore;
use crate::models::{ArchetypePair, Match};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchupResult {
    pub opponent: ArchetypePair,
    pub games: usize,
    pub wins: usize,
    pub cards: Vec<CardStat>,
}

impl MatchupResult {
    pub fn losses(&self) -> usize {
        self.games - self.wins
    }

    /// `None` when no game against this opponent was recorded.
    pub fn win_rate(&self) -> Option<f64> {
        if self.games == 0 {
            None
        } else {
            Some(self.wins as f64 / self.games as f64)
        }
    }

    pub fn has_games(&self) -> bool {
        self.games > 0
    }
}

/// One result per entry of `opponents`, in order. Repeated opponents produce
/// repeated results.
pub fn evaluate(
    tracked_deck: &ArchetypePair,
    opponents: &[ArchetypePair],
    cards: &[String],
    matches: &[Match],
    window: &TurnWindow,
) -> Result<Vec<MatchupResult>, AppError> {
    validate_cards(cards)?;
    Ok(matchups(tracked_deck, opponents, cards, matches, window))
}

fn validate_cards(cards: &[String]) -> Result<(), AppError> {
    if cards.is_empty() {
        return Err(AppError::InvalidInput(
            "Please supply at least one card to evaluate, e.g. 'The Coin'".to_string(),
        ));
    }
    Ok(())
}

fn matchups(
    tracked_deck: &ArchetypePair,
    opponents: &[ArchetypePair],
    cards: &[String],
    matches: &[Match],
    window: &TurnWindow,
) -> Vec<MatchupResult> {
    let own_games = select_own_deck(matches, tracked_deck);
    debug!(deck = %tracked_deck, games = own_games.len(), "selected own deck games");

    opponents
        .iter()
        .map(|opponent| {
            let bucket = select_opponent_deck(&own_games, opponent);
            MatchupResult {
                opponent: opponent.clone(),
                games: bucket.len(),
                wins: count_wins(&bucket),
                cards: card_stats(cards, &bucket, window),
            }
        })
        .collect()
}

/// A configured evaluation run: the tracked deck, the opponents to split by,
/// the cards to follow and the turn ceiling.
#[derive(Debug, Clone)]
pub struct MulliganAnalyzer {
    tracked_deck: ArchetypePair,
    opponents: Vec<ArchetypePair>,
    cards: Vec<String>,
    window: TurnWindow,
}

impl MulliganAnalyzer {
    /// Falls back to `archetypes` when `opponents` is empty.
    pub fn new(
        tracked_deck: ArchetypePair,
        opponents: Vec<ArchetypePair>,
        cards: Vec<String>,
        archetypes: &dyn ArchetypeSource,
    ) -> Result<Self, AppError> {
        validate_cards(&cards)?;

        let opponents = if opponents.is_empty() {
            info!("No match-ups given, loading the archetype list");
            archetypes.load_archetypes()?
        } else {
            opponents
        };

        Ok(MulliganAnalyzer {
            tracked_deck,
            opponents,
            cards,
            window: TurnWindow::default(),
        })
    }

    pub fn set_max_turn(&mut self, max_turn: i64) -> Result<(), AppError> {
        self.window.set_max_turn(max_turn)
    }

    pub fn tracked_deck(&self) -> &ArchetypePair {
        &self.tracked_deck
    }

    pub fn opponents(&self) -> &[ArchetypePair] {
        &self.opponents
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    pub fn window(&self) -> TurnWindow {
        self.window
    }

    pub fn evaluate(&self, store: &MatchStore) -> Vec<MatchupResult> {
        info!(
            deck = %self.tracked_deck,
            matches = store.len(),
            opponents = self.opponents.len(),
            cards = self.cards.len(),
            max_turn = self.window.max_turn(),
            "evaluating match-ups"
        );

        matchups(
            &self.tracked_deck,
            &self.opponents,
            &self.cards,
            store.matches(),
            &self.window,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{game, play};
    use crate::models::{Actor, MatchOutcome};

    fn store() -> MatchStore {
        MatchStore::new(vec![
            game(
                1,
                ("Midrange", "Shaman"),
                ("Aggro", "Warrior"),
                MatchOutcome::Win,
                vec![play(Actor::Me, 1, "Coin"), play(Actor::Me, 6, "Thunder Bluff Valiant")],
            ),
            game(
                2,
                ("Midrange", "Shaman"),
                ("Aggro", "Warrior"),
                MatchOutcome::Loss,
                vec![play(Actor::Me, 4, "Thunder Bluff Valiant")],
            ),
            game(
                3,
                ("Midrange", "Shaman"),
                ("Reno", "Warlock"),
                MatchOutcome::Win,
                vec![play(Actor::Me, 2, "Coin")],
            ),
            game(
                4,
                ("Aggro", "Shaman"),
                ("Aggro", "Warrior"),
                MatchOutcome::Win,
                vec![play(Actor::Me, 1, "Coin")],
            ),
        ])
    }

    fn analyzer(opponents: Vec<ArchetypePair>, cards: &[&str]) -> MulliganAnalyzer {
        MulliganAnalyzer::new(
            ArchetypePair::new("Midrange", "Shaman"),
            opponents,
            cards.iter().map(|c| c.to_string()).collect(),
            &Vec::<ArchetypePair>::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_matchup_counts() {
        let analyzer = analyzer(vec![ArchetypePair::new("Aggro", "Warrior")], &["Coin"]);
        let results = analyzer.evaluate(&store());

        assert_eq!(results.len(), 1);
        let warrior = &results[0];
        assert_eq!((warrior.games, warrior.wins, warrior.losses()), (2, 1, 1));
        assert_eq!(warrior.win_rate(), Some(0.5));
        assert_eq!(warrior.cards[0].games_with_card, 1);
        assert_eq!(warrior.cards[0].wins_with_card, 1);
    }

    #[test]
    fn test_turn_window_applies_to_every_matchup() {
        let mut analyzer = analyzer(
            vec![
                ArchetypePair::new("Aggro", "Warrior"),
                ArchetypePair::new("Reno", "Warlock"),
            ],
            &["Thunder Bluff Valiant", "Coin"],
        );
        analyzer.set_max_turn(5).unwrap();

        let results = analyzer.evaluate(&store());

        let valiant = &results[0].cards[0];
        assert_eq!(valiant.times_played, 1);
        assert_eq!(valiant.wins_with_card, 0);
        assert_eq!(results[1].cards[1].times_played, 1);
        assert_eq!(results[1].cards[0].win_rate(), None);
    }

    #[test]
    fn test_duplicate_opponents_produce_identical_results() {
        let aggro = ArchetypePair::new("Aggro", "Warrior");
        let analyzer = analyzer(vec![aggro.clone(), aggro], &["Coin"]);

        let results = analyzer.evaluate(&store());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], results[1]);
    }

    #[test]
    fn test_zero_game_matchup_is_reported() {
        let analyzer = analyzer(vec![ArchetypePair::new("Pirate", "Warrior")], &["Coin"]);
        let results = analyzer.evaluate(&store());

        assert!(!results[0].has_games());
        assert_eq!(results[0].win_rate(), None);
        assert_eq!(results[0].cards[0].times_played, 0);
    }

    #[test]
    fn test_empty_opponents_use_archetype_source() {
        let fallback = vec![ArchetypePair::new("Reno", "Warlock")];
        let analyzer = MulliganAnalyzer::new(
            ArchetypePair::new("Midrange", "Shaman"),
            vec![],
            vec!["Coin".to_string()],
            &fallback,
        )
        .unwrap();

        assert_eq!(analyzer.opponents(), fallback.as_slice());
        let results = analyzer.evaluate(&store());
        assert_eq!((results[0].games, results[0].wins), (1, 1));
    }

    #[test]
    fn test_empty_card_list_rejected_at_construction() {
        let result = MulliganAnalyzer::new(
            ArchetypePair::new("Midrange", "Shaman"),
            vec![ArchetypePair::new("Aggro", "Warrior")],
            vec![],
            &Vec::<ArchetypePair>::new(),
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_analyzer_matches_free_evaluate() {
        let opponents = vec![
            ArchetypePair::new("Aggro", "Warrior"),
            ArchetypePair::new("Reno", "Warlock"),
        ];
        let cards = ["Coin", "Thunder Bluff Valiant"];
        let mut analyzer = analyzer(opponents.clone(), &cards);
        analyzer.set_max_turn(4).unwrap();

        let store = store();
        let expected = evaluate(
            analyzer.tracked_deck(),
            &opponents,
            analyzer.cards(),
            store.matches(),
            &analyzer.window(),
        )
        .unwrap();

        assert_eq!(analyzer.evaluate(&store), expected);
        assert_eq!(expected[0].cards.len(), 2);
    }

    #[test]
    fn test_free_evaluate_rejects_empty_card_list() {
        let store = store();
        let result = evaluate(
            &ArchetypePair::new("Midrange", "Shaman"),
            &[ArchetypePair::new("Aggro", "Warrior")],
            &[],
            store.matches(),
            &TurnWindow::unrestricted(),
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_max_turn_keeps_previous_window() {
        let mut analyzer = analyzer(vec![ArchetypePair::new("Aggro", "Warrior")], &["Coin"]);
        analyzer.set_max_turn(3).unwrap();

        assert!(matches!(
            analyzer.set_max_turn(0),
            Err(AppError::InvalidConfiguration(_))
        ));
        assert_eq!(analyzer.window().max_turn(), 3);
    }
}
