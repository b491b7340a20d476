use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration, loaded from the environment (plus an optional
/// `.env` file that never overrides existing variables).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,

    // E-ticket API endpoints (overridable for testing against a stub).
    pub stations_api: String,
    pub trains_api: String,

    // Optional session headers for the e-ticket API.
    pub eticket_xsrf: Option<String>,
    pub eticket_cookie: Option<String>,

    /// Interval between scheduled availability ticks.
    pub check_interval: Duration,
    /// Timeout for a single outbound e-ticket query.
    pub request_timeout: Duration,
}

const DEFAULT_STATIONS_API: &str = "https://eticket.railway.uz/api/v1/handbook/stations/list";
const DEFAULT_TRAINS_API: &str = "https://eticket.railway.uz/api/v3/handbook/trains/list";

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let stations_api =
            env_str("STATIONS_API").unwrap_or_else(|| DEFAULT_STATIONS_API.to_string());
        let trains_api = env_str("TRAINS_API").unwrap_or_else(|| DEFAULT_TRAINS_API.to_string());

        let eticket_xsrf = env_str("ETICKET_XSRF").and_then(non_empty);
        let eticket_cookie = env_str("ETICKET_COOKIE").and_then(non_empty);

        let check_interval = Duration::from_secs(env_u64("CHECK_INTERVAL_SECS").unwrap_or(300));
        let request_timeout = Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS").unwrap_or(15));

        Ok(Self {
            telegram_bot_token,
            stations_api,
            trains_api,
            eticket_xsrf,
            eticket_cookie,
            check_interval,
            request_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
