//! Per-category evaluation result.

use serde::Serialize;

use super::Status;

/// Status, one-line summary and supporting issues for a single category.
///
/// Evaluators build one of these starting from `PASS`, raising the status
/// as findings accumulate. Status never decreases once raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    pub status: Status,
    pub summary: String,
    pub issues: Vec<String>,
}

impl CategoryResult {
    /// A `PASS` result with the given summary and no issues.
    pub fn pass(summary: impl Into<String>) -> Self {
        Self {
            status: Status::Pass,
            summary: summary.into(),
            issues: Vec::new(),
        }
    }

    /// A result with an explicit status and a single issue.
    pub fn with_issue(status: Status, summary: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            status,
            summary: summary.into(),
            issues: vec![issue.into()],
        }
    }

    /// Raise the status to `candidate` if it is more severe.
    pub fn raise(&mut self, candidate: Status) {
        self.status = self.status.combine(candidate);
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
    }

    pub fn push_issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// Push an issue unless an identical one is already present.
    pub fn push_unique(&mut self, issue: impl Into<String>) {
        let issue = issue.into();
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }
}
