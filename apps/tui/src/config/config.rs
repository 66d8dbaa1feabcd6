use dotenv::dotenv;
use std::env;
use std::time::Duration;

/// Production API Gateway stage serving the alerts and upload routes.
pub const DEFAULT_BASE_URL: &str = "https://q6js4x6jy5.execute-api.ap-south-1.amazonaws.com/prod";

const DEFAULT_POLL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub debug: bool,
}

/// Initializes the application configuration from the environment,
/// loading a `.env` file first when one is present.
pub fn init_app_config() -> AppConfig {
    dotenv().ok();

    let base_url = normalize_base_url(
        &env::var("CRIMEWATCH_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
    );
    let poll_interval = parse_poll_interval(env::var("CRIMEWATCH_POLL_SECS").ok().as_deref());
    let debug = env::var("DEBUG").is_ok();

    AppConfig {
        base_url,
        poll_interval,
        debug,
    }
}

/// Endpoint paths are joined with a single slash, so a trailing one on
/// the base would produce `//alerts`.
fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_poll_interval(raw: Option<&str>) -> Duration {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(Duration::from_secs(DEFAULT_POLL_SECS), Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::{normalize_base_url, parse_poll_interval, DEFAULT_BASE_URL};
    use std::time::Duration;

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(
            normalize_base_url("https://api.example.com/prod/"),
            "https://api.example.com/prod"
        );
        assert_eq!(normalize_base_url(DEFAULT_BASE_URL), DEFAULT_BASE_URL);
    }

    #[test]
    fn poll_interval_falls_back_on_bad_input() {
        assert_eq!(parse_poll_interval(None), Duration::from_secs(5));
        assert_eq!(parse_poll_interval(Some("abc")), Duration::from_secs(5));
        assert_eq!(parse_poll_interval(Some("0")), Duration::from_secs(5));
        assert_eq!(parse_poll_interval(Some("12")), Duration::from_secs(12));
    }
}
