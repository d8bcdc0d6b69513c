use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub database_url: String,
    pub bind_addr: String,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub lp_win_gain: i32,
    pub lp_loss_penalty: i32,
    pub match_fetch_cap: u32,
    pub detail_fetch_concurrency: usize,
    pub dashboard_role_sample: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_LP_PER_GAME: i32 = 20;
        const DEFAULT_MATCH_FETCH_CAP: u32 = 50;
        const DEFAULT_DETAIL_FETCH_CONCURRENCY: usize = 4;
        const DEFAULT_DASHBOARD_ROLE_SAMPLE: u32 = 20;
        // Match-v5 refuses larger pages.
        const RIOT_MAX_MATCH_IDS: u32 = 100;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:lptrail.db".into());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

        let riot_rate_limit_per_second = env_parse::<u32>("RIOT_RATE_LIMIT_PER_SECOND")
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let lp_win_gain = positive_or("LP_WIN_GAIN", DEFAULT_LP_PER_GAME)?;
        let lp_loss_penalty = positive_or("LP_LOSS_PENALTY", DEFAULT_LP_PER_GAME)?;

        let match_fetch_cap = env_parse::<u32>("MATCH_FETCH_CAP")
            .unwrap_or(DEFAULT_MATCH_FETCH_CAP)
            .clamp(1, RIOT_MAX_MATCH_IDS);

        let detail_fetch_concurrency = env_parse::<usize>("DETAIL_FETCH_CONCURRENCY")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DETAIL_FETCH_CONCURRENCY);

        let dashboard_role_sample = env_parse::<u32>("DASHBOARD_ROLE_SAMPLE")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DASHBOARD_ROLE_SAMPLE);

        Ok(Self {
            riot_api_key,
            database_url,
            bind_addr,
            riot_rate_limit_per_second,
            lp_win_gain,
            lp_loss_penalty,
            match_fetch_cap,
            detail_fetch_concurrency,
            dashboard_role_sample,
        })
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn positive_or(key: &str, default: i32) -> Result<i32, AppError> {
    match env_parse::<i32>(key) {
        None => Ok(default),
        Some(v) if v > 0 => Ok(v),
        Some(v) => Err(AppError::Config(format!("{key} must be positive, got {v}"))),
    }
}
