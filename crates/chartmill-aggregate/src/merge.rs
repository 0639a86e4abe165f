//! Realtime merging of single points into an ordered series.

use chartmill_types::Timestamped;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What merging a point did to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    /// The point was newer than the last one and was appended.
    Appended,
    /// The point had the same time as the last one and replaced it.
    Replaced,
    /// The point was older than the last one and was dropped.
    Rejected,
}

impl MergeOutcome {
    /// Returns true if the series changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Returns the outcome as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Appended => "appended",
            Self::Replaced => "replaced",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Merges one point into a series kept strictly increasing in time.
///
/// The point is compared against the last element only: an older point is
/// rejected, an equal time overwrites the still-forming last point, and a
/// newer point is appended.
pub fn merge_point<T: Timestamped>(series: &mut Vec<T>, point: T) -> MergeOutcome {
    let Some(last) = series.last_mut() else {
        series.push(point);
        return MergeOutcome::Appended;
    };

    let (last_time, time) = (last.time(), point.time());
    if time < last_time {
        debug!(time, last_time, "dropping stale realtime update");
        MergeOutcome::Rejected
    } else if time == last_time {
        *last = point;
        MergeOutcome::Replaced
    } else {
        series.push(point);
        MergeOutcome::Appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chartmill_types::Bar;

    fn bar(time: i64, close: f64) -> Bar {
        Bar::new(time, close, close, close, close, 0)
    }

    #[test]
    fn test_merge_into_empty() {
        let mut series = Vec::new();
        assert_eq!(merge_point(&mut series, bar(10, 1.0)), MergeOutcome::Appended);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_merge_same_time_replaces() {
        let mut series = vec![bar(10, 1.0), bar(20, 2.0)];
        assert_eq!(merge_point(&mut series, bar(20, 2.5)), MergeOutcome::Replaced);
        assert_eq!(series.len(), 2);
        assert_relative_eq!(series[1].close, 2.5);
    }

    #[test]
    fn test_merge_newer_appends() {
        let mut series = vec![bar(10, 1.0)];
        assert_eq!(merge_point(&mut series, bar(11, 3.0)), MergeOutcome::Appended);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_merge_stale_rejected() {
        let mut series = vec![bar(10, 1.0), bar(20, 2.0)];
        let before = series.clone();
        assert_eq!(merge_point(&mut series, bar(15, 9.0)), MergeOutcome::Rejected);
        assert_eq!(series, before);
        assert!(!MergeOutcome::Rejected.is_applied());
    }

    #[test]
    fn test_merge_keeps_strict_order() {
        let mut series = Vec::new();
        for time in [5, 5, 7, 6, 7, 9, 1, 10] {
            merge_point(&mut series, bar(time, time as f64));
        }
        let times: Vec<_> = series.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![5, 7, 9, 10]);
    }
}
