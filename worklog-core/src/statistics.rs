use crate::records::Day;
use chrono::NaiveDate;

/// Totals over a set of days.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_days: usize,
    pub total_entries: usize,
    pub total_epics: usize,
    pub avg_entries: f64,
    pub first_entry: NaiveDate,
    pub last_entry: NaiveDate,
}

impl Statistics {
    /// With no days, both boundary dates are `today` and every count is zero.
    pub fn calculate(days: &[Day], today: NaiveDate) -> Self {
        let total_days = days.len();
        let total_entries = days.iter().map(Day::len).sum();
        let total_epics = days
            .iter()
            .flat_map(Day::entries)
            .filter(|e| e.epic)
            .count();
        let avg_entries = if total_days == 0 {
            0.0
        } else {
            total_entries as f64 / total_days as f64
        };
        Self {
            total_days,
            total_entries,
            total_epics,
            avg_entries,
            first_entry: days.iter().map(|d| d.date).min().unwrap_or(today),
            last_entry: days.iter().map(|d| d.date).max().unwrap_or(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{date, entry_at};

    #[test]
    fn empty_log_reports_today() {
        let today = date(2024, 3, 5);
        let stats = Statistics::calculate(&[], today);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.avg_entries, 0.0);
        assert_eq!((stats.first_entry, stats.last_entry), (today, today));
    }

    #[test]
    fn counts_entries_and_epics() {
        let days = vec![
            Day::with_entries(
                date(2024, 3, 3),
                vec![
                    entry_at("Planning", "2024-03-03T09:00:00+00:00").with_epic(true),
                    entry_at("Review", "2024-03-03T10:00:00+00:00"),
                    entry_at("Deploy", "2024-03-03T11:00:00+00:00"),
                ],
            )
            .unwrap(),
            Day::with_entries(
                date(2024, 3, 1),
                vec![entry_at("Kickoff", "2024-03-01T09:00:00+00:00")],
            )
            .unwrap(),
        ];
        let stats = Statistics::calculate(&days, date(2024, 3, 5));
        assert_eq!(stats.total_days, 2);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.total_epics, 1);
        assert_eq!(stats.avg_entries, 2.0);
        assert_eq!(stats.first_entry, date(2024, 3, 1));
        assert_eq!(stats.last_entry, date(2024, 3, 3));
    }
}
