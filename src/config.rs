use crate::api::endpoints::DEFAULT_BASE_URL;
use std::env;
use std::path::PathBuf;

const DEFAULT_ARCHETYPES_FILE: &str = "archetypes.json";

/// Account credentials for the history service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub archetypes_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Credentials are only kept when both
    /// the username and the token are present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("TRACKOBOT_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let credentials = match (lookup("TRACKOBOT_USERNAME"), lookup("TRACKOBOT_TOKEN")) {
            (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => {
                Some(Credentials { username, token })
            }
            _ => None,
        };

        let archetypes_file = lookup("MULLIGAN_ARCHETYPES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHETYPES_FILE));

        Config {
            base_url,
            credentials,
            archetypes_file,
        }
    }
}
