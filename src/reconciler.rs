//! Snapshot diff and history append.
//!
//! The reconciler is stateless: every cycle it takes the freshly captured
//! observations plus the previous snapshot rows, fills in the derived
//! fields, and produces the record appended to the historical log. All
//! state lives in the stores, loaded fresh each cycle.
//!
//! Ordering contract: [`append_history`] runs on the *pre-diff* batch, so
//! the first observation's `latest_change` still holds the capture time and
//! becomes the batch timestamp.

use crate::error::ReconcileError;
use crate::models::{HistoricalRecord, Observation, QuotedPrice};

/// Merge freshly captured observations against the previous snapshot.
///
/// For each new observation the previous snapshot is searched for a row
/// with an equal `name` (exact match, O(n·m) over the two lists):
///
/// - no match: first sighting; `price_change` stays at the sentinel and
///   `latest_change` stays at the capture time;
/// - match with a differing price: `price_change` becomes the rounded
///   percentage delta and `latest_change` stays at the capture time;
/// - match with an equal price: `latest_change` is carried over from the
///   previous snapshot, not reset to now.
///
/// The percentage is rounded half-away-from-zero. A leading `+` is applied
/// only when the absolute price rose by more than one unit — sub-unit
/// increases are positive but unprefixed. That threshold is long-standing
/// observable behavior and is kept as-is.
pub fn diff(
    new_observations: Vec<Observation>,
    previous_snapshot: &[Observation],
) -> Result<Vec<Observation>, ReconcileError> {
    let mut updated = new_observations;

    for obs in &mut updated {
        let Some(prev) = previous_snapshot.iter().find(|p| p.name == obs.name) else {
            continue;
        };

        if prev.price == obs.price {
            obs.latest_change = prev.latest_change.clone();
            continue;
        }

        if prev.price == 0.0 {
            return Err(ReconcileError::ZeroBaseline {
                name: obs.name.clone(),
            });
        }

        let delta = obs.price - prev.price;
        let percent = (delta / prev.price * 100.0).round() as i64;
        let sign = if delta > 1.0 { "+" } else { "" };
        obs.price_change = format!("{}{}%", sign, percent);
    }

    Ok(updated)
}

/// Append one record holding `(name, price)` for every observation in the
/// batch. The batch timestamp is taken from the first observation's
/// `latest_change` — one capture cycle, one timestamp. Prior records are
/// untouched.
pub fn append_history(
    new_observations: &[Observation],
    mut records: Vec<HistoricalRecord>,
) -> Result<Vec<HistoricalRecord>, ReconcileError> {
    let first = new_observations.first().ok_or(ReconcileError::EmptyBatch)?;

    records.push(HistoricalRecord {
        timestamp: first.latest_change.clone(),
        data: new_observations
            .iter()
            .map(|obs| QuotedPrice {
                name: obs.name.clone(),
                price: obs.price,
            })
            .collect(),
    });

    Ok(records)
}
