use std::{env, str::FromStr, time::Duration};

use dotenvy::dotenv;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Upper bound on workers for list reads; single-post reads always use 1.
    pub comment_fetch_workers: usize,
    /// Bound on each comment/reply listing call made by the fetcher.
    pub comment_fetch_timeout: Duration,
    /// Bound on each websocket write during a broadcast.
    pub ws_write_timeout: Duration,
    pub default_page_limit: u64,
    pub recent_window: Duration,
    /// When set, an admin with this name is created at startup.
    pub bootstrap_admin_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            comment_fetch_workers: 8,
            comment_fetch_timeout: Duration::from_secs(20),
            ws_write_timeout: Duration::from_millis(5_000),
            default_page_limit: 10,
            recent_window: Duration::from_secs(48 * 3600),
            bootstrap_admin_name: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let port: u16 = parse_var("PORT", "3001")?;
        let comment_fetch_workers: usize = parse_var("COMMENT_FETCH_WORKERS", "8")?;
        let comment_fetch_timeout_secs: u64 = parse_var("COMMENT_FETCH_TIMEOUT_SECS", "20")?;
        let ws_write_timeout_ms: u64 = parse_var("WS_WRITE_TIMEOUT_MS", "5000")?;
        let default_page_limit: u64 = parse_var("DEFAULT_PAGE_LIMIT", "10")?;
        let recent_window_hours: u64 = parse_var("RECENT_WINDOW_HOURS", "48")?;

        if comment_fetch_workers == 0 {
            return Err(AppError::Validation(
                "COMMENT_FETCH_WORKERS must be at least 1".into(),
            ));
        }
        if default_page_limit == 0 {
            return Err(AppError::Validation(
                "DEFAULT_PAGE_LIMIT must be at least 1".into(),
            ));
        }

        let bootstrap_admin_name = env::var("BOOTSTRAP_ADMIN_NAME")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Self {
            port,
            comment_fetch_workers,
            comment_fetch_timeout: Duration::from_secs(comment_fetch_timeout_secs),
            ws_write_timeout: Duration::from_millis(ws_write_timeout_ms),
            default_page_limit,
            recent_window: hours(recent_window_hours, "RECENT_WINDOW_HOURS")?,
            bootstrap_admin_name,
        })
    }
}

fn hours(value: u64, name: &str) -> Result<Duration, AppError> {
    value
        .checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::Validation(format!("invalid {name}: {value} hours is out of range")))
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|err| AppError::Validation(format!("invalid {name}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_hours_convert_to_seconds() {
        assert_eq!(
            hours(48, "RECENT_WINDOW_HOURS").unwrap(),
            Duration::from_secs(48 * 3600)
        );
    }

    #[test]
    fn huge_window_is_rejected_instead_of_overflowing() {
        let err = hours(u64::MAX, "RECENT_WINDOW_HOURS").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(hours(u64::MAX / 3600 + 1, "RECENT_WINDOW_HOURS").is_err());
        assert!(hours(u64::MAX / 3600, "RECENT_WINDOW_HOURS").is_ok());
    }
}
