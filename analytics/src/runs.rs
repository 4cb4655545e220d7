use chrono::NaiveDate;
use std::collections::BTreeSet;

/// A maximal sequence of strictly consecutive calendar days, inclusive on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRun {
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Find every maximal run of consecutive calendar days of length at least
/// `min_len` in `days`.
///
/// Days are deduplicated first: five flights on one day cover that day
/// once. A single ascending scan extends the current run while the next
/// day is exactly one later, closing it on any gap or at end of input.
/// Maximality is by construction: a run only closes when neither end can
/// be extended. Zero or one covered days yield no runs under the default
/// minimum of 2.
pub fn consecutive_runs(days: impl IntoIterator<Item = NaiveDate>, min_len: usize) -> Vec<DayRun> {
    let days: BTreeSet<NaiveDate> = days.into_iter().collect();

    let mut runs = Vec::new();
    let mut current: Option<DayRun> = None;
    for day in days {
        current = Some(match current {
            Some(run) if run.end.succ_opt() == Some(day) => DayRun {
                start: run.start,
                end: day,
            },
            Some(run) => {
                if run.len_days() >= min_len {
                    runs.push(run);
                }
                DayRun {
                    start: day,
                    end: day,
                }
            }
            None => DayRun {
                start: day,
                end: day,
            },
        });
    }
    if let Some(run) = current {
        if run.len_days() >= min_len {
            runs.push(run);
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn detects_single_run_and_ignores_isolated_day() {
        // Jan 1-3 consecutive, Jan 5 isolated
        let runs = consecutive_runs([day(1), day(2), day(3), day(5)], 2);
        assert_eq!(
            runs,
            vec![DayRun {
                start: day(1),
                end: day(3)
            }]
        );
        assert_eq!(runs[0].len_days(), 3);
    }

    #[test]
    fn reports_all_maximal_runs() {
        let runs = consecutive_runs([day(1), day(2), day(10), day(11), day(12), day(20)], 2);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], DayRun { start: day(1), end: day(2) });
        assert_eq!(runs[1], DayRun { start: day(10), end: day(12) });
    }

    #[test]
    fn deduplicates_days_before_scanning() {
        let runs = consecutive_runs([day(1), day(1), day(1), day(2)], 2);
        assert_eq!(runs, vec![DayRun { start: day(1), end: day(2) }]);
    }

    #[test]
    fn unsorted_input_is_handled() {
        let runs = consecutive_runs([day(3), day(1), day(2)], 2);
        assert_eq!(runs, vec![DayRun { start: day(1), end: day(3) }]);
    }

    #[test]
    fn zero_or_one_days_yield_no_runs() {
        assert!(consecutive_runs([], 2).is_empty());
        assert!(consecutive_runs([day(1)], 2).is_empty());
    }

    #[test]
    fn min_len_one_reports_isolated_days() {
        let runs = consecutive_runs([day(1), day(5)], 1);
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn runs_span_month_boundaries() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let feb1 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let runs = consecutive_runs([jan31, feb1], 2);
        assert_eq!(runs, vec![DayRun { start: jan31, end: feb1 }]);
    }
}
