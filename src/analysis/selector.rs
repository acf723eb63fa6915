use crate::models::{ArchetypePair, Match};

/// Games where the tracked player used `deck`. Input order is preserved.
pub fn select_own_deck<'a>(matches: &'a [Match], deck: &ArchetypePair) -> Vec<&'a Match> {
    matches.iter().filter(|m| m.own == *deck).collect()
}

/// Narrows already selected games down to one opponent archetype.
pub fn select_opponent_deck<'a>(matches: &[&'a Match], deck: &ArchetypePair) -> Vec<&'a Match> {
    matches
        .iter()
        .copied()
        .filter(|m| m.opponent == *deck)
        .collect()
}

pub fn count_wins(matches: &[&Match]) -> usize {
    matches.iter().filter(|m| m.is_win()).count()
}
