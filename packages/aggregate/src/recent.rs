//! Recency ranking for the detail panel.

use citizen_map_report_models::Report;

/// The `limit` newest reports, newest first.
///
/// Reports with equal timestamps keep their input order.
#[must_use]
pub fn recent_reports<'a>(
    reports: impl IntoIterator<Item = &'a Report>,
    limit: usize,
) -> Vec<&'a Report> {
    let mut sorted: Vec<&Report> = reports.into_iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::air_report;

    #[test]
    fn newest_first_and_truncated() {
        let reports: Vec<Report> = (0..15)
            .map(|i| air_report(&format!("r{i}"), 10.0, 106.0, None, i))
            .collect();
        let recent = recent_reports(&reports, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, "r14");
        assert_eq!(recent[9].id, "r5");
    }

    #[test]
    fn ties_keep_input_order() {
        let reports = vec![
            air_report("first", 10.0, 106.0, None, 5),
            air_report("second", 10.0, 106.0, None, 5),
        ];
        let ids: Vec<&str> = recent_reports(&reports, 10)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn zero_limit_is_empty() {
        let reports = vec![air_report("a", 10.0, 106.0, None, 0)];
        assert!(recent_reports(&reports, 0).is_empty());
    }
}
