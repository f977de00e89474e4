//! Per-entry haiku annotation.

use chrono::{DateTime, NaiveDate};

use crate::haiku::detector::HaikuDetector;
use crate::haiku::types::{DetectorError, Haiku};
use crate::observability::metrics;
use crate::timeline::types::Entry;

/// Run the detector over every entry, keeping only the first match per entry.
///
/// Output order follows the input order. Detector failures propagate as-is.
pub fn annotate(
    detector: &dyn HaikuDetector,
    entries: &[Entry],
) -> Result<Vec<Haiku>, DetectorError> {
    let mut haikus = Vec::new();

    for entry in entries {
        let matches = detector.find_haikus(&entry.text)?;
        if let Some(lines) = matches.into_iter().next() {
            haikus.push(Haiku {
                lines,
                entry: entry.clone(),
                date: entry.timestamp.and_then(date_from_timestamp),
            });
        }
    }

    metrics::record_haikus_detected(haikus.len());
    Ok(haikus)
}

/// UTC calendar date of an epoch-seconds timestamp.
pub fn date_from_timestamp(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}
