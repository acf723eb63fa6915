pub mod card_stats;
pub mod matchup;
pub mod selector;
pub mod turn_window;

pub use card_stats::{evaluate_cards, CardStat};
pub use matchup::{evaluate, MatchupResult, MulliganAnalyzer};
pub use selector::{count_wins, select_opponent_deck, select_own_deck};
pub use turn_window::{TurnWindow, UNRESTRICTED_TURN};
