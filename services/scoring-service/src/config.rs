use std::time::Duration;

use anyhow::{bail, Context, Result};
use calibration::CalibrationConfig;

const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,

    pub narrative_url: Option<String>,
    pub narrative_model: String,
    pub narrative_timeout: Duration,

    pub calibration: CalibrationConfig,
    /// `None` disables the scheduled loop.
    pub calibration_interval: Option<Duration>,

    pub seed_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("SCORING_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let narrative_url = lookup("NARRATIVE_URL").filter(|v| !v.is_empty());
        let narrative_model = lookup("NARRATIVE_MODEL").unwrap_or_else(|| "local-model".to_string());
        let narrative_timeout = Duration::from_millis(parse(&lookup, "NARRATIVE_TIMEOUT_MS", 10_000u64)?);

        let defaults = CalibrationConfig::default();
        let calibration = CalibrationConfig {
            lookback_days: parse(&lookup, "CALIBRATION_LOOKBACK_DAYS", defaults.lookback_days)?,
            min_sample_size: parse(&lookup, "CALIBRATION_MIN_SAMPLES", defaults.min_sample_size)?,
            learning_rate: parse(&lookup, "CALIBRATION_LEARNING_RATE", defaults.learning_rate)?,
            ..defaults
        };
        let interval_secs: u64 = parse(&lookup, "CALIBRATION_INTERVAL_SECS", 0)?;
        let calibration_interval = (interval_secs > 0).then(|| Duration::from_secs(interval_secs));

        let seed_path = lookup("SEED_PATH").filter(|v| !v.is_empty());

        if let Some(url) = &narrative_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("NARRATIVE_URL must start with http:// or https://");
            }
        }
        if calibration.lookback_days <= 0 || calibration.lookback_days > MAX_LOOKBACK_DAYS {
            bail!("CALIBRATION_LOOKBACK_DAYS must be between 1 and {MAX_LOOKBACK_DAYS}");
        }
        if calibration.learning_rate.is_nan() || calibration.learning_rate <= 0.0 {
            bail!("CALIBRATION_LEARNING_RATE must be positive");
        }

        Ok(Self {
            bind_addr,
            narrative_url,
            narrative_model,
            narrative_timeout,
            calibration,
            calibration_interval,
            seed_path,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for env var {key}: {raw}")),
        _ => Ok(default),
    }
}
