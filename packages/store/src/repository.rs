//! Report repository backed by a vector and a lazily built R-tree.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use citizen_map_aggregate::{VoteChange, apply_vote, revert_vote};
use citizen_map_report_models::{BoundingBox, GeoPoint, Report, ReportType, VoteDirection, VoteTally};
use citizen_map_spatial::PointIndex;

use crate::StoreError;

/// Holds reports in insertion order and answers viewport and
/// neighborhood queries.
#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: Vec<Report>,
    positions: BTreeMap<String, usize>,
    index: OnceCell<PointIndex>,
}

impl InMemoryReportRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `reports`.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Self::insert`] would return.
    pub fn with_reports(reports: impl IntoIterator<Item = Report>) -> Result<Self, StoreError> {
        let mut repo = Self::new();
        for report in reports {
            repo.insert(report)?;
        }
        log::debug!("Loaded {} reports into repository", repo.len());
        Ok(repo)
    }

    /// Adds a report.
    ///
    /// # Errors
    ///
    /// * [`StoreError::DuplicateId`] if a report with the same ID exists
    /// * [`StoreError::InvalidLocation`] if the coordinates are not finite
    ///   or out of WGS84 range
    pub fn insert(&mut self, report: Report) -> Result<(), StoreError> {
        if self.positions.contains_key(&report.id) {
            return Err(StoreError::DuplicateId { id: report.id });
        }
        if !is_valid_location(report.lat, report.lng) {
            return Err(StoreError::InvalidLocation {
                id: report.id,
                lat: report.lat,
                lng: report.lng,
            });
        }

        self.positions.insert(report.id.clone(), self.reports.len());
        self.reports.push(report);
        self.index = OnceCell::new();
        Ok(())
    }

    /// Removes and returns a report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no report has the ID.
    pub fn remove(&mut self, id: &str) -> Result<Report, StoreError> {
        let position = self.position(id)?;
        let report = self.reports.remove(position);
        self.positions = self
            .reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        self.index = OnceCell::new();
        Ok(report)
    }

    /// Looks up a report by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Report> {
        self.positions.get(id).map(|&i| &self.reports[i])
    }

    /// All reports in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Report] {
        &self.reports
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Reports by one user, for reputation statistics.
    pub fn by_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Report> + 'a {
        self.reports.iter().filter(move |r| r.user_id == user_id)
    }

    /// Reports inside `bbox` grown by `padding` degrees.
    ///
    /// A malformed box yields no reports.
    #[must_use]
    pub fn in_viewport(&self, bbox: &BoundingBox, padding: f64) -> Vec<&Report> {
        self.spatial_index()
            .within(&bbox.padded(padding))
            .into_iter()
            .map(|i| &self.reports[i])
            .collect()
    }

    /// Reports strictly within `tolerance` degrees of `center`, optionally
    /// limited to one type.
    #[must_use]
    pub fn near(
        &self,
        center: GeoPoint,
        tolerance: f64,
        report_type: Option<ReportType>,
    ) -> Vec<&Report> {
        self.spatial_index()
            .near(center, tolerance)
            .into_iter()
            .map(|i| &self.reports[i])
            .filter(|r| report_type.is_none_or(|t| r.report_type() == t))
            .collect()
    }

    /// Toggles the current user's vote on a report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no report has the ID.
    pub fn vote(&mut self, id: &str, direction: VoteDirection) -> Result<VoteChange, StoreError> {
        let position = self.position(id)?;
        Ok(apply_vote(&mut self.reports[position], direction))
    }

    /// Rolls back a vote the server rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no report has the ID.
    pub fn revert_vote(&mut self, id: &str, change: &VoteChange) -> Result<(), StoreError> {
        let position = self.position(id)?;
        revert_vote(&mut self.reports[position], change);
        Ok(())
    }

    /// Replaces a report's counters with the server-confirmed tally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no report has the ID.
    pub fn confirm_vote(&mut self, id: &str, tally: VoteTally) -> Result<(), StoreError> {
        let position = self.position(id)?;
        self.reports[position].confirm_tally(tally);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn spatial_index(&self) -> &PointIndex {
        self.index
            .get_or_init(|| PointIndex::new(self.reports.iter().map(Report::location)))
    }
}

fn is_valid_location(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, user: &str, kind: &str, lat: f64, lng: f64) -> Report {
        let level = if kind == "air" {
            r#""airQuality": "moderate""#
        } else {
            r#""noiseLevel": "loud""#
        };
        serde_json::from_str(&format!(
            r#"{{
                "id": "{id}", "userId": "{user}", "userName": "{user}",
                "lat": {lat}, "lng": {lng}, "type": "{kind}", {level},
                "timestamp": "2025-03-01T08:00:00Z"
            }}"#
        ))
        .unwrap()
    }

    fn seeded() -> InMemoryReportRepository {
        InMemoryReportRepository::with_reports([
            report("a", "u1", "air", 10.777, 106.701),
            report("b", "u2", "noise", 10.778, 106.702),
            report("c", "u1", "air", 10.95, 106.9),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut repo = seeded();
        let err = repo
            .insert(report("a", "u3", "air", 10.0, 106.0))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateId { id: "a".into() });
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn rejects_out_of_range_locations() {
        let mut repo = InMemoryReportRepository::new();
        let err = repo.insert(report("x", "u1", "air", 95.0, 106.0)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidLocation { .. }));
        assert!(repo.is_empty());
    }

    #[test]
    fn viewport_query_sees_new_reports() {
        let mut repo = seeded();
        let bbox = BoundingBox::from_extents(10.7, 106.6, 10.8, 106.8);
        assert_eq!(repo.in_viewport(&bbox, 0.0).len(), 2);

        repo.insert(report("d", "u3", "air", 10.79, 106.79)).unwrap();
        let ids: Vec<&str> = repo
            .in_viewport(&bbox, 0.0)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
    }

    #[test]
    fn near_filters_by_type() {
        let repo = seeded();
        let center = GeoPoint::new(10.7775, 106.7015);
        assert_eq!(repo.near(center, 0.01, None).len(), 2);
        let air = repo.near(center, 0.01, Some(ReportType::Air));
        assert_eq!(air.len(), 1);
        assert_eq!(air[0].id, "a");
    }

    #[test]
    fn vote_toggles_and_confirms() {
        let mut repo = seeded();
        let change = repo.vote("a", VoteDirection::Up).unwrap();
        assert_eq!(change.current_tally.upvotes, 1);
        assert_eq!(repo.get("a").unwrap().user_vote, Some(VoteDirection::Up));

        repo.confirm_vote(
            "a",
            VoteTally {
                upvotes: 7,
                downvotes: 2,
            },
        )
        .unwrap();
        assert_eq!(repo.get("a").unwrap().upvotes, 7);

        let change = repo.vote("a", VoteDirection::Up).unwrap();
        assert_eq!(change.current_vote, None);
        repo.revert_vote("a", &change).unwrap();
        assert_eq!(repo.get("a").unwrap().upvotes, 7);
        assert_eq!(repo.get("a").unwrap().user_vote, Some(VoteDirection::Up));
    }

    #[test]
    fn vote_on_missing_report_fails() {
        let mut repo = seeded();
        let err = repo.vote("zzz", VoteDirection::Down).unwrap_err();
        assert_eq!(err.to_string(), "Report not found: zzz");
    }

    #[test]
    fn remove_keeps_lookups_consistent() {
        let mut repo = seeded();
        let removed = repo.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(repo.get("a").is_none());
        assert_eq!(repo.get("c").unwrap().id, "c");
        assert!(repo.remove("a").is_err());
    }

    #[test]
    fn by_user_selects_reporter() {
        let repo = seeded();
        assert_eq!(repo.by_user("u1").count(), 2);
    }
}
