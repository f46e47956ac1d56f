use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Feedback window ending at the run time.
    pub lookback_days: i64,
    /// Below this many entries no weight is adjusted.
    pub min_sample_size: usize,
    /// Rows a dimension needs before it is considered.
    pub min_dimension_samples: usize,
    /// Mean signed gaps smaller than this are left alone.
    pub min_gap: f64,
    pub learning_rate: f64,
    /// Adjustments below this confidence are reported but held back.
    pub apply_confidence: f64,
    /// Sample count at which confidence reaches 1.0.
    pub full_confidence_samples: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            min_sample_size: 10,
            min_dimension_samples: 3,
            min_gap: 5.0,
            learning_rate: 0.05,
            apply_confidence: 0.5,
            full_confidence_samples: 20,
        }
    }
}

impl CalibrationConfig {
    /// `(start, end)` of the feedback window that ends at `now`.
    ///
    /// A lookback reaching past the representable range starts the window at
    /// [`DateTime::MIN_UTC`].
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Duration::try_days(self.lookback_days)
            .and_then(|d| now.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        (start, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_ends_at_now() {
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let (start, end) = CalibrationConfig::default().window(now);
        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn huge_lookback_saturates() {
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        for lookback_days in [100_000_000, i64::MAX] {
            let config = CalibrationConfig { lookback_days, ..CalibrationConfig::default() };
            assert_eq!(config.window(now), (DateTime::<Utc>::MIN_UTC, now));
        }
    }
}
