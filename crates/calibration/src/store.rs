use std::sync::RwLock;

use chrono::{DateTime, Utc};
use scoring::WeightSet;
use tracing::debug;

use crate::{CalibrationError, FeedbackEntry, Result};

/// Source of reviewer feedback and keeper of the current dimension weights.
pub trait FeedbackStore: Send + Sync {
    /// Entries with `start <= created_at <= end`.
    fn get_feedback(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<FeedbackEntry>>;
    fn get_current_weights(&self) -> Result<WeightSet>;
    /// Makes `weights` current. Earlier sets stay in the history.
    fn set_weights(&self, weights: WeightSet) -> Result<()>;
}

struct Inner {
    entries: Vec<FeedbackEntry>,
    weights: Vec<WeightSet>,
}

/// Process-local feedback store with an append-only weight history.
pub struct InMemoryFeedbackStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::with_weights(WeightSet::new())
    }

    pub fn with_weights(initial: WeightSet) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                weights: vec![initial],
            }),
        }
    }

    pub fn add_feedback(&self, entry: FeedbackEntry) -> Result<()> {
        entry.validate()?;
        let mut inner = self
            .inner
            .write()
            .map_err(|e| CalibrationError::Store(e.to_string()))?;
        debug!(application_id = %entry.application_id, report_id = %entry.report_id, "feedback recorded");
        inner.entries.push(entry);
        Ok(())
    }

    /// Every weight set ever made current, oldest first.
    pub fn weight_history(&self) -> Result<Vec<WeightSet>> {
        Ok(self
            .inner
            .read()
            .map_err(|e| CalibrationError::Store(e.to_string()))?
            .weights
            .clone())
    }
}

impl FeedbackStore for InMemoryFeedbackStore {
    fn get_feedback(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<FeedbackEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CalibrationError::Store(e.to_string()))?;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.created_at >= start && e.created_at <= end)
            .cloned()
            .collect())
    }

    fn get_current_weights(&self) -> Result<WeightSet> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CalibrationError::Store(e.to_string()))?;
        Ok(inner.weights.last().cloned().unwrap_or_default())
    }

    fn set_weights(&self, weights: WeightSet) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| CalibrationError::Store(e.to_string()))?;
        debug!(version = weights.version(), "weights replaced");
        inner.weights.push(weights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Agreement, DimensionFeedback};
    use chrono::TimeZone;

    fn entry(day: u32) -> FeedbackEntry {
        FeedbackEntry {
            application_id: format!("app-{day}"),
            report_id: format!("r-{day}"),
            dimension_feedback: vec![DimensionFeedback::new("founder", 70.0, 60.0)],
            overall_agreement: Agreement::Agree,
            outcome_data: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn window_is_inclusive() {
        let store = InMemoryFeedbackStore::new();
        for day in 1..=5 {
            store.add_feedback(entry(day)).unwrap();
        }
        let start = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 4, 0, 0, 0).unwrap();
        let got = store.get_feedback(start, end).unwrap();
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn invalid_feedback_is_rejected() {
        let store = InMemoryFeedbackStore::new();
        let mut bad = entry(1);
        bad.dimension_feedback[0].partner_score = -3.0;
        assert!(store.add_feedback(bad).is_err());
        assert!(store.get_feedback(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC).unwrap().is_empty());
    }

    #[test]
    fn weights_history_is_retained() {
        let store = InMemoryFeedbackStore::new();
        let next = store
            .get_current_weights()
            .unwrap()
            .with_updates([("founder".to_string(), 1.2)])
            .unwrap();
        store.set_weights(next.clone()).unwrap();

        assert_eq!(store.get_current_weights().unwrap(), next);
        let history = store.weight_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version(), 0);
        assert_eq!(history[1].version(), 1);
    }
}
