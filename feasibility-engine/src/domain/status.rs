//! Severity scale shared by every evaluator.
//!
//! Statuses form a total order `PASS < INFO < CAUTION < FAIL`. Evaluators
//! start at `PASS` and only ever move up the scale via [`Status::combine`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome severity of a feasibility check.
///
/// `Info` sits above `Pass` so that informational findings stay visible
/// on a category, but below `Caution` so they never read as urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Pass,
    Info,
    Caution,
    Fail,
}

impl Status {
    /// Numeric priority on the severity scale.
    pub fn priority(self) -> u8 {
        match self {
            Status::Pass => 0,
            Status::Info => 1,
            Status::Caution => 2,
            Status::Fail => 3,
        }
    }

    /// Returns `candidate` if it is strictly more severe, otherwise `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use feasibility_engine::domain::Status;
    ///
    /// assert_eq!(Status::Pass.combine(Status::Caution), Status::Caution);
    /// assert_eq!(Status::Fail.combine(Status::Pass), Status::Fail);
    /// assert_eq!(Status::Info.combine(Status::Info), Status::Info);
    /// ```
    #[must_use]
    pub fn combine(self, candidate: Status) -> Status {
        if candidate.priority() > self.priority() {
            candidate
        } else {
            self
        }
    }

    /// Folds `Info` down to `Pass`.
    ///
    /// Used only by cross-category aggregation, so informational leg detail
    /// never masks or mimics a real finding.
    #[must_use]
    pub fn fold_info(self) -> Status {
        match self {
            Status::Info => Status::Pass,
            other => other,
        }
    }

    /// True for `Caution` and `Fail`.
    pub fn is_actionable(self) -> bool {
        self >= Status::Caution
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Info => "INFO",
            Status::Caution => "CAUTION",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most severe status in `statuses`, or `Pass` when empty.
pub fn worst<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    statuses.into_iter().fold(Status::Pass, Status::combine)
}
