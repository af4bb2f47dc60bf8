//! # Query Layer
//!
//! Derived views over complaint sets. Recomputed on every read.

use serde::{Deserialize, Serialize};

use crate::models::{Complaint, ComplaintStatus};

/// Dashboard tallies. `total` always equals the sum of the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ComplaintStatus) -> usize {
        match status {
            ComplaintStatus::Open => self.open,
            ComplaintStatus::InProgress => self.in_progress,
            ComplaintStatus::Resolved => self.resolved,
        }
    }
}

/// Single pass tally over any set of complaints.
pub fn status_counts<'a, I>(complaints: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Complaint>,
{
    complaints
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, complaint| {
            counts.total += 1;
            match complaint.status {
                ComplaintStatus::Open => counts.open += 1,
                ComplaintStatus::InProgress => counts.in_progress += 1,
                ComplaintStatus::Resolved => counts.resolved += 1,
            }
            counts
        })
}
