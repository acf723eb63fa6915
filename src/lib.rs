//! Win-rate statistics for a tracked deck, split by opponent archetype, with
//! per-card play and win counts restricted to an early-turn window.

pub mod analysis;
pub mod api;
pub mod archetypes;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
