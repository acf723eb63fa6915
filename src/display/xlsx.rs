use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use super::EmptyMatchups;
use crate::analysis::MatchupResult;
use crate::models::ArchetypePair;

const HEADER: [&str; 10] = [
    "Opponent Hero",
    "Opponent Deck",
    "Wins",
    "Losses",
    "Win %",
    "Card",
    "Times played",
    "Wins with card",
    "Losses with card",
    "Win % with card played",
];

pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

/// Lays the results out as sheet rows: one row per match-up followed by one per card.
pub fn matchup_rows(results: &[MatchupResult], empty: EmptyMatchups) -> Vec<Vec<Cell>> {
    let mut rows = vec![HEADER.iter().map(|h| Cell::Text(h.to_string())).collect()];

    for result in results {
        let opponent = [
            Cell::Text(result.opponent.hero.clone()),
            Cell::Text(result.opponent.readable_style().to_string()),
        ];

        let Some(win_rate) = result.win_rate() else {
            if empty == EmptyMatchups::Mark {
                let [hero, deck] = opponent;
                rows.push(vec![
                    hero,
                    deck,
                    Cell::Number(0.0),
                    Cell::Number(0.0),
                    Cell::Text("no games".to_string()),
                ]);
            }
            continue;
        };

        let [hero, deck] = opponent;
        rows.push(vec![
            hero,
            deck,
            Cell::Number(result.wins as f64),
            Cell::Number(result.losses() as f64),
            Cell::Number(win_rate * 100.0),
        ]);

        for stat in &result.cards {
            let rate = match stat.win_rate() {
                Some(rate) => Cell::Number(rate * 100.0),
                None => Cell::Text("N/A".to_string()),
            };
            rows.push(vec![
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Text(stat.card.clone()),
                Cell::Number(stat.times_played as f64),
                Cell::Number(stat.wins_with_card as f64),
                Cell::Number(stat.losses_with_card() as f64),
                rate,
            ]);
        }
    }

    rows
}

pub fn export_matchups(
    path: &Path,
    deck: &ArchetypePair,
    results: &[MatchupResult],
    empty: EmptyMatchups,
) -> Result<usize> {
    let rows = matchup_rows(results, empty);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(format!("{} {}", deck.hero, deck.readable_style()))?;
        write_rows(sheet, &rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(rows.len().saturating_sub(1))
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (row_idx, col_idx) = (row_idx as u32, col_idx as u16);
            match value {
                Cell::Text(text) => {
                    worksheet.write_string(row_idx, col_idx, text)?;
                }
                Cell::Number(number) => {
                    worksheet.write_number(row_idx, col_idx, *number)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CardStat;

    fn results() -> Vec<MatchupResult> {
        vec![
            MatchupResult {
                opponent: ArchetypePair::new("", "Warrior"),
                games: 4,
                wins: 3,
                cards: vec![
                    CardStat {
                        card: "Coin".to_string(),
                        times_played: 2,
                        games_with_card: 2,
                        wins_with_card: 1,
                    },
                    CardStat::new("Hex".to_string()),
                ],
            },
            MatchupResult {
                opponent: ArchetypePair::new("Reno", "Warlock"),
                games: 0,
                wins: 0,
                cards: vec![CardStat::new("Coin".to_string())],
            },
        ]
    }

    fn text(cell: &Cell) -> Option<&str> {
        match cell {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    #[test]
    fn test_rows_mark_empty_matchups() {
        let rows = matchup_rows(&results(), EmptyMatchups::Mark);

        // header, matchup, two cards, empty matchup
        assert_eq!(rows.len(), 5);
        assert_eq!(text(&rows[1][1]), Some("Other"));
        assert!(matches!(rows[1][4], Cell::Number(rate) if (rate - 75.0).abs() < 1e-9));
        assert_eq!(text(&rows[3][9]), Some("N/A"));
        assert_eq!(text(&rows[4][4]), Some("no games"));
    }

    #[test]
    fn test_rows_skip_empty_matchups() {
        let rows = matchup_rows(&results(), EmptyMatchups::Skip);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");

        let written = export_matchups(
            &path,
            &ArchetypePair::new("Midrange", "Shaman"),
            &results(),
            EmptyMatchups::Mark,
        )
        .unwrap();

        assert_eq!(written, 4);
        assert!(path.exists());
    }
}
