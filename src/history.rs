//! Calculation history.
//!
//! Every successful equals press records one [`HistoryItem`]. The log lives
//! only as long as the session and is never written to disk.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One completed calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    /// Unique identifier for this item.
    pub id: String,
    /// The calculation as typed, e.g. `5 + 3 =`.
    pub expression: String,
    /// The formatted result, e.g. `8`.
    pub result: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl HistoryItem {
    /// Create an item stamped with the current time.
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        let timestamp = now_millis();
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self {
            id: format!("{:x}-{:x}", timestamp, sequence),
            expression: expression.into(),
            result: result.into(),
            timestamp,
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(millis)
        .unwrap_or(0)
}

/// Saturates at `i64::MAX`.
fn millis(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}

/// Append-only list of history items, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: HistoryItem) {
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in insertion order.
    pub fn list(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Items most recent first, the order the history panel shows them in.
    pub fn latest_first(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    /// The `position`-th most recent item, counting from 1.
    pub fn get_latest(&self, position: usize) -> Option<&HistoryItem> {
        position
            .checked_sub(1)
            .and_then(|offset| self.latest_first().nth(offset))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
