pub mod output;
pub mod xlsx;

/// How renderers treat match-ups without any recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyMatchups {
    Skip,
    #[default]
    Mark,
}

/// Formats an optional rate as a percentage, `N/A` when undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.5)), "50.00%");
        assert_eq!(format_rate(Some(2.0 / 3.0)), "66.67%");
        assert_eq!(format_rate(None), "N/A");
    }
}
