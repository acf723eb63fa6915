use crate::error::AppError;
use crate::models::Play;

/// Turn ceiling used when no cutoff is configured. Fatigue ends every game long
/// before this turn is reached.
pub const UNRESTRICTED_TURN: u32 = 9999;

/// Restricts card statistics to plays made up to and including `max_turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnWindow {
    max_turn: u32,
}

impl Default for TurnWindow {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl TurnWindow {
    pub const fn new(max_turn: u32) -> Self {
        TurnWindow { max_turn }
    }

    pub const fn unrestricted() -> Self {
        Self::new(UNRESTRICTED_TURN)
    }

    pub fn max_turn(&self) -> u32 {
        self.max_turn
    }

    pub fn is_unrestricted(&self) -> bool {
        self.max_turn >= UNRESTRICTED_TURN
    }

    /// Sets the ceiling from user input. Only positive turn numbers are accepted.
    pub fn set_max_turn(&mut self, max_turn: i64) -> Result<(), AppError> {
        if max_turn <= 0 {
            return Err(AppError::InvalidConfiguration(format!(
                "The maximum turn must be a positive integer, got {}",
                max_turn
            )));
        }

        self.max_turn = u32::try_from(max_turn).unwrap_or(u32::MAX);
        Ok(())
    }

    pub fn eligible(&self, play: &Play) -> bool {
        play.turn <= self.max_turn
    }
}
