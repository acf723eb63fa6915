use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mulligan_stats::analysis::MulliganAnalyzer;
use mulligan_stats::api::client::{
    retention_window, TrackobotClient, CARD_HISTORY_RETENTION_DAYS,
};
use mulligan_stats::archetypes::ArchetypeFile;
use mulligan_stats::cache::HistoryCache;
use mulligan_stats::config::{Config, Credentials};
use mulligan_stats::display::output::{
    display_error, display_info, display_matchups, display_success,
};
use mulligan_stats::display::xlsx::export_matchups;
use mulligan_stats::display::EmptyMatchups;
use mulligan_stats::history::{load_history_file, HistorySource, MatchStore};
use mulligan_stats::models::ArchetypePair;

/// Cached games younger than this are used without asking the service again.
const CACHE_FRESH_MINUTES: u64 = 15;

#[derive(Parser, Debug)]
#[command(name = "mulligan-stats")]
#[command(about = "Card and match-up win rates for your deck from your game history")]
#[command(long_about = None)]
#[command(version)]
struct Args {
    /// History export (.json). Without it the account from TRACKOBOT_USERNAME and
    /// TRACKOBOT_TOKEN is used
    #[arg(long)]
    history: Option<PathBuf>,

    /// Your deck as Style:Hero, e.g. Midrange:Shaman
    #[arg(short, long)]
    deck: ArchetypePair,

    /// Opponent archetype as Style:Hero (repeatable). Defaults to the archetype list
    #[arg(short, long)]
    opponent: Vec<ArchetypePair>,

    /// Archetype list used when no opponent is given
    #[arg(long)]
    archetypes: Option<PathBuf>,

    /// Card to evaluate (repeatable, at least one)
    #[arg(short, long, required = true)]
    card: Vec<String>,

    /// Ignore cards played after this turn
    #[arg(short = 't', long, allow_hyphen_values = true)]
    max_turn: Option<i64>,

    /// Only fetch games added during the last N days
    #[arg(long, default_value_t = CARD_HISTORY_RETENTION_DAYS)]
    days: i64,

    /// Use cached games only, no network access
    #[arg(long)]
    offline: bool,

    /// Fetch from the service even if the cache is fresh
    #[arg(long)]
    refresh: bool,

    /// Also write the results to this spreadsheet
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Leave out match-ups without games instead of marking them
    #[arg(long)]
    skip_empty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_env();
    let now = Utc::now();

    let archetypes = ArchetypeFile::new(
        args.archetypes
            .clone()
            .unwrap_or_else(|| config.archetypes_file.clone()),
    );
    if args.opponent.is_empty() {
        display_info(&format!(
            "No match-ups given, loading archetypes from {}",
            archetypes.path.display()
        ));
    }

    let mut analyzer = MulliganAnalyzer::new(
        args.deck.clone(),
        args.opponent.clone(),
        args.card.clone(),
        &archetypes,
    )?;
    if let Some(max_turn) = args.max_turn {
        analyzer.set_max_turn(max_turn)?;
    }
    let max_age = retention_window(args.days)?;

    let source = HistorySource::resolve(args.history.clone(), config.credentials.clone())?;
    let store = match source {
        HistorySource::File(path) => {
            display_info(&format!("Reading history from {}", path.display()));
            load_history_file(&path)
                .with_context(|| format!("failed loading {}", path.display()))?
        }
        HistorySource::Account(credentials) => {
            load_account(&args, &config, credentials, now, max_age)?
        }
    };
    display_success(&format!("Loaded {} games", store.len()));

    let results = analyzer.evaluate(&store);
    let empty = if args.skip_empty {
        EmptyMatchups::Skip
    } else {
        EmptyMatchups::Mark
    };

    display_matchups(analyzer.tracked_deck(), analyzer.window(), &results, empty);

    if let Some(path) = &args.xlsx {
        let rows = export_matchups(path, analyzer.tracked_deck(), &results, empty)?;
        display_success(&format!("Wrote {} rows to {}", rows, path.display()));
    }

    Ok(())
}

fn load_account(
    args: &Args,
    config: &Config,
    credentials: Credentials,
    now: DateTime<Utc>,
    max_age: Duration,
) -> Result<MatchStore> {
    let mut cache = HistoryCache::load(&credentials.username, now)?;

    let outdated = cache.is_stale(now, CACHE_FRESH_MINUTES) || cache.games.is_empty();
    let fetch = !args.offline && (args.refresh || outdated);
    if fetch {
        display_info(&format!(
            "Fetching games of the last {} days for {}",
            args.days, credentials.username
        ));

        let client = TrackobotClient::new(config, credentials);
        let pb = ProgressBar::new(1);
        pb.set_message("Fetching history pages");
        let pages = client.fetch_recent(now, max_age, |page, total| {
            pb.set_length(total as u64);
            pb.set_position(page as u64);
        })?;
        pb.finish_with_message("✓ History fetched");

        let fetched = MatchStore::from_pages(pages);
        let added = cache.merge(fetched.into_matches(), now);
        display_success(&format!("{} new games", added));

        if let Err(e) = cache.save() {
            tracing::warn!("could not save history cache: {}", e);
        }
    } else {
        display_info(&format!(
            "Using {} cached games (updated {})",
            cache.games.len(),
            cache.last_updated.format("%Y-%m-%d %H:%M")
        ));
    }

    Ok(MatchStore::new(cache.games))
}
