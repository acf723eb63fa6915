// History service endpoints and URL builders

pub const DEFAULT_BASE_URL: &str = "https://trackobot.com";
pub const HISTORY_PATH: &str = "/profile/history.json";

pub fn history_url(base_url: &str, username: &str, token: &str, page: u32) -> String {
    format!(
        "{}{}?page={}&username={}&token={}",
        base_url, HISTORY_PATH, page, username, token
    )
}
