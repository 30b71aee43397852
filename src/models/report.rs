use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The fixed set of leaderboard statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StatKind {
    #[serde(rename = "Fastest time")]
    FastestTime,
    #[serde(rename = "Fastest overall average")]
    FastestAverage,
    #[serde(rename = "Fastest average of 5")]
    FastestAverageOfFive,
    #[serde(rename = "Longest streak")]
    LongestStreak,
}

impl StatKind {
    /// Display label used as the report key
    pub fn label(&self) -> &'static str {
        match self {
            StatKind::FastestTime => "Fastest time",
            StatKind::FastestAverage => "Fastest overall average",
            StatKind::FastestAverageOfFive => "Fastest average of 5",
            StatKind::LongestStreak => "Longest streak",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistic-specific payload of a report entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatDetail {
    /// Single best time and the day it was set
    Time { time: u32, day: u32 },
    /// Mean over every submission
    Average { average: f64 },
    /// Best rolling mean and the last day of its window
    RollingAverage { average: f64, day: u32 },
    /// Run length and the day the run started
    Streak { streak: usize, day: u32 },
}

/// Winner of one statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    #[serde(rename = "person")]
    pub participant: String,
    #[serde(flatten)]
    pub detail: StatDetail,
}

/// Leaderboard statistics computed from one matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatisticsReport {
    entries: BTreeMap<StatKind, StatEntry>,
}

impl StatisticsReport {
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (StatKind, StatEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: StatKind) -> Option<&StatEntry> {
        self.entries.get(&kind)
    }

    /// Entries in fixed statistic order
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &StatEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_by_label() {
        let report = StatisticsReport::from_entries([
            (
                StatKind::LongestStreak,
                StatEntry {
                    participant: "Ann".to_string(),
                    detail: StatDetail::Streak { streak: 3, day: 2 },
                },
            ),
            (
                StatKind::FastestTime,
                StatEntry {
                    participant: "Ben".to_string(),
                    detail: StatDetail::Time { time: 65, day: 1 },
                },
            ),
        ]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["Fastest time"]["person"], "Ben");
        assert!(value["Fastest time"].get("participant").is_none());
        assert_eq!(value["Fastest time"]["time"], 65);
        assert_eq!(value["Longest streak"]["streak"], 3);
        assert_eq!(value["Longest streak"]["day"], 2);

        let kinds: Vec<_> = report.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![StatKind::FastestTime, StatKind::LongestStreak]);
    }
}
