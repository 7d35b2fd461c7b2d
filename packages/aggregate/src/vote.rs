//! Optimistic vote toggling and vote-derived statistics.
//!
//! Voting the same direction twice removes the vote. Voting the other
//! direction moves the vote, so a user is never counted on both sides.

use citizen_map_report_models::{Report, VoteDirection, VoteTally};
use serde::Serialize;

/// Record of a local vote change, enough to roll it back if the server
/// rejects the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteChange {
    /// The user's vote before the change.
    pub previous_vote: Option<VoteDirection>,
    /// Counters before the change.
    pub previous_tally: VoteTally,
    /// The user's vote after the change.
    pub current_vote: Option<VoteDirection>,
    /// Counters after the change.
    pub current_tally: VoteTally,
}

const fn counter(report: &mut Report, direction: VoteDirection) -> &mut u32 {
    match direction {
        VoteDirection::Up => &mut report.upvotes,
        VoteDirection::Down => &mut report.downvotes,
    }
}

/// Applies a vote in `direction` to `report` as a toggle.
///
/// * Same direction as the existing vote: the vote is removed.
/// * Opposite direction: the old vote is removed and the new one added.
/// * No existing vote: the new vote is added.
pub fn apply_vote(report: &mut Report, direction: VoteDirection) -> VoteChange {
    let previous_vote = report.user_vote;
    let previous_tally = report.tally();

    if previous_vote == Some(direction) {
        let count = counter(report, direction);
        *count = count.saturating_sub(1);
        report.user_vote = None;
    } else {
        if let Some(existing) = previous_vote {
            let count = counter(report, existing);
            *count = count.saturating_sub(1);
        }
        let count = counter(report, direction);
        *count = count.saturating_add(1);
        report.user_vote = Some(direction);
    }

    log::debug!(
        "Vote {direction} on report {}: {previous_vote:?} -> {:?}",
        report.id,
        report.user_vote
    );

    VoteChange {
        previous_vote,
        previous_tally,
        current_vote: report.user_vote,
        current_tally: report.tally(),
    }
}

/// Restores the state recorded in `change`.
pub const fn revert_vote(report: &mut Report, change: &VoteChange) {
    report.user_vote = change.previous_vote;
    report.confirm_tally(change.previous_tally);
}

/// Share of upvotes on a report, in percent.
///
/// Returns `None` when the report has no votes.
#[must_use]
pub fn approval_ratio(report: &Report) -> Option<f64> {
    upvote_share(u64::from(report.upvotes), u64::from(report.downvotes))
}

/// Share of upvotes across all of a reporter's reports, in percent.
///
/// Returns `None` when none of the reports has votes.
#[must_use]
pub fn accuracy_rate<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Option<f64> {
    let (up, down) = reports.into_iter().fold((0_u64, 0_u64), |(up, down), r| {
        (up + u64::from(r.upvotes), down + u64::from(r.downvotes))
    });
    upvote_share(up, down)
}

#[allow(clippy::cast_precision_loss)]
fn upvote_share(up: u64, down: u64) -> Option<f64> {
    let total = up + down;
    (total > 0).then(|| up as f64 / total as f64 * 100.0)
}
