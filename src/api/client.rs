use crate::config::{Config, Credentials};
use crate::error::AppError;
use crate::models::Match;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use governor::{Quota, RateLimiter, state::{InMemoryState, NotKeyed}, clock::DefaultClock};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints::history_url;
use super::models::*;

/// The service keeps card histories for this many days.
pub const CARD_HISTORY_RETENTION_DAYS: i64 = 10;

const REQUESTS_PER_SECOND: u32 = 5;
const MAX_RETRIES: u32 = 3;

pub struct TrackobotClient {
    base_url: String,
    credentials: Credentials,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl TrackobotClient {
    pub fn new(config: &Config, credentials: Credentials) -> Self {
        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second);
        TrackobotClient {
            base_url: config.base_url.clone(),
            credentials,
            rate_limiter: RateLimiter::direct(quota),
        }
    }

    fn execute_request(&self, url: &str) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            while self.rate_limiter.check().is_err() {
                thread::sleep(Duration::from_millis(50));
            }

            let response = ureq::get(url)
                .set("User-Agent", concat!("mulligan_stats/", env!("CARGO_PKG_VERSION")))
                .call();

            match response {
                Ok(resp) => {
                    return resp.into_string().map_err(|e| {
                        AppError::HttpError(e.to_string())
                    });
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    warn!(wait_ms, "rate limited by history service, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(401, _)) | Err(ureq::Error::Status(403, _)) => {
                    return Err(AppError::SourceFormat(format!(
                        "account '{}' was rejected by the history service",
                        self.credentials.username
                    )));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    pub fn history_page(&self, page: u32) -> Result<HistoryPageDto, AppError> {
        let url = history_url(
            &self.base_url,
            &self.credentials.username,
            &self.credentials.token,
            page,
        );

        let body = self.execute_request(&url)?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::JsonError(e.to_string())
        })
    }

    /// Fetches the games added after `now - max_age`, one `Vec` per history page.
    pub fn fetch_recent(
        &self,
        now: DateTime<Utc>,
        max_age: ChronoDuration,
        on_page: impl FnMut(u32, u32),
    ) -> Result<Vec<Vec<Match>>, AppError> {
        let cutoff = now.checked_sub_signed(max_age).ok_or_else(|| {
            AppError::InvalidConfiguration(format!(
                "retrieval window of {} days reaches before any representable date",
                max_age.num_days()
            ))
        })?;

        walk_pages(cutoff, |page| self.history_page(page), on_page)
    }
}

/// Converts a retrieval window given in days. Only positive windows are accepted.
pub fn retention_window(days: i64) -> Result<ChronoDuration, AppError> {
    if days <= 0 {
        return Err(AppError::InvalidConfiguration(format!(
            "The retrieval window must be a positive number of days, got {}",
            days
        )));
    }

    ChronoDuration::try_days(days).ok_or_else(|| {
        AppError::InvalidConfiguration(format!("A retrieval window of {} days is too large", days))
    })
}

/// Walks history pages from the first one, keeping games added after `cutoff`.
/// Stops at the first page without such a game or after the last page. A page
/// without paging info counts as the last one.
pub fn walk_pages(
    cutoff: DateTime<Utc>,
    mut fetch_page: impl FnMut(u32) -> Result<HistoryPageDto, AppError>,
    mut on_page: impl FnMut(u32, u32),
) -> Result<Vec<Vec<Match>>, AppError> {
    let mut pages = Vec::new();
    let mut page_number = 1;

    loop {
        let page = fetch_page(page_number)?;
        let total_pages = page.meta.total_pages.max(page_number);
        on_page(page_number, total_pages);

        let recent = games_added_after(page.history, cutoff)?;
        if recent.is_empty() {
            debug!(page = page_number, %cutoff, "page older than retention window");
            break;
        }
        pages.push(recent);

        if page_number >= total_pages {
            break;
        }
        page_number += 1;
    }

    Ok(pages)
}

pub fn games_added_after(
    games: Vec<GameDto>,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Match>, AppError> {
    games
        .into_iter()
        .filter(|game| game.added > cutoff)
        .map(Match::try_from)
        .collect()
}
