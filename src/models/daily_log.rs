use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub calories: u64,
    /// Local wall-clock time of the entry, "HH:MM".
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<FixedOffset>>,
}

impl LogEntry {
    pub fn new(name: impl Into<String>, calories: u64, at: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            calories,
            time: at.format("%H:%M").to_string(),
            recorded_at: Some(at),
        }
    }
}

/// Running log for a single local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub eaten: u64,
    #[serde(default)]
    pub items: Vec<LogEntry>,
}

impl DailyLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            eaten: 0,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.eaten = self.eaten.saturating_add(entry.calories);
        self.items.push(entry);
    }

    pub fn items_total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.calories))
    }

    /// Re-derives `eaten` from `items`. Returns true if it had drifted.
    pub fn reconcile(&mut self) -> bool {
        let total = self.items_total();
        if total != self.eaten {
            self.eaten = total;
            return true;
        }
        false
    }

    /// Entries newest first, for log views.
    pub fn recent_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.items.iter().rev()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub target: i64,
    pub eaten: u64,
    /// Negative when over target.
    pub remaining: i64,
    /// Unclamped `eaten / target * 100`.
    pub percentage: f64,
    /// `percentage` clamped to [0, 100] for progress indicators.
    pub display_percentage: f64,
}

/// Pure read model over a profile and a day. `None` when the target is zero.
pub fn projection(profile: &Profile, log: &DailyLog) -> Option<Projection> {
    let target = profile.target_calories;
    if target == 0 {
        return None;
    }

    let eaten = log.eaten;
    let eaten_signed = i64::try_from(eaten).unwrap_or(i64::MAX);
    let percentage = eaten as f64 / target as f64 * 100.0;

    Some(Projection {
        target,
        eaten,
        remaining: target.saturating_sub(eaten_signed),
        percentage,
        display_percentage: percentage.clamp(0.0, 100.0),
    })
}
