use super::{format_rate, EmptyMatchups};
use crate::analysis::{MatchupResult, TurnWindow};
use crate::models::ArchetypePair;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct CardRow {
    card: String,
    #[tabled(rename = "times played")]
    times_played: String,
    #[tabled(rename = "games with card")]
    games_with_card: String,
    #[tabled(rename = "wins with card")]
    wins_with_card: String,
    #[tabled(rename = "win %")]
    win_rate: String,
}

fn card_rows(result: &MatchupResult) -> Vec<CardRow> {
    result
        .cards
        .iter()
        .map(|stat| CardRow {
            card: stat.card.clone(),
            times_played: stat.times_played.to_string(),
            games_with_card: stat.games_with_card.to_string(),
            wins_with_card: stat.wins_with_card.to_string(),
            win_rate: format_rate(stat.win_rate()),
        })
        .collect()
}

/// Renders the card table for one match-up.
pub fn card_table(result: &MatchupResult) -> String {
    let mut table = Table::new(card_rows(result));
    table.with(Style::rounded());
    table.to_string()
}

pub fn display_matchups(
    deck: &ArchetypePair,
    window: TurnWindow,
    results: &[MatchupResult],
    empty: EmptyMatchups,
) {
    println!(
        "\n{}",
        format!("🃏 Mulligan report for {}", deck).bold().cyan()
    );
    if !window.is_unrestricted() {
        println!("{}", format!("Cards counted up to turn {}", window.max_turn()).dimmed());
    }
    println!("{}\n", "=".repeat(60).cyan());

    for result in results {
        if !result.has_games() {
            if empty == EmptyMatchups::Mark {
                println!("{}", format!("No games against {}", result.opponent).yellow());
                println!("{}", "-".repeat(60).dimmed());
            }
            continue;
        }

        println!("{}", format!("Result for {}", result.opponent).bold());
        println!(
            "{} {} W / {} L ({} WR, {} games)",
            "📈".bold(),
            result.wins.to_string().green(),
            result.losses().to_string().red(),
            format_rate(result.win_rate()),
            result.games
        );
        println!("{}", card_table(result));
        println!("{}", "-".repeat(60).dimmed());
    }

    println!();
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CardStat;

    #[test]
    fn test_card_table_marks_undefined_rate() {
        let result = MatchupResult {
            opponent: ArchetypePair::new("Aggro", "Warrior"),
            games: 2,
            wins: 1,
            cards: vec![
                CardStat {
                    card: "Coin".to_string(),
                    times_played: 3,
                    games_with_card: 2,
                    wins_with_card: 1,
                },
                CardStat::new("Hex".to_string()),
            ],
        };

        let table = card_table(&result);
        assert!(table.contains("Coin"));
        assert!(table.contains("50.00%"));
        assert!(table.contains("N/A"));
    }
}
