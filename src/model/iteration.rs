use chrono::{Days, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Iteration {
    pub id: String,
    pub title: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    /// Length in days.
    #[serde(default)]
    pub duration: u32,
}

impl Iteration {
    pub fn contains(&self, day: NaiveDate) -> bool {
        let end = self
            .start_date
            .checked_add_days(Days::new(u64::from(self.duration)))
            .unwrap_or(NaiveDate::MAX);
        self.start_date <= day && day < end
    }
}

/// The project field holding sprint assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationField {
    pub id: String,
    pub name: String,
    /// Active and upcoming iterations in API order.
    pub iterations: Vec<Iteration>,
}

/// Picks which iteration counts as "current".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IterationPolicy {
    /// Trust GitHub's ordering: the first listed iteration is the active one.
    #[default]
    First,
    /// The iteration whose date window contains today.
    DateRange,
}

impl IterationPolicy {
    pub fn select_current<'a>(
        &self,
        iterations: &'a [Iteration],
        today: NaiveDate,
    ) -> Option<&'a Iteration> {
        match self {
            IterationPolicy::First => iterations.first(),
            IterationPolicy::DateRange => iterations.iter().find(|it| it.contains(today)),
        }
    }
}

/// Result of a best-effort change to an item's iteration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationUpdate {
    Applied { iteration: String },
    Cleared,
    Failed(UpdateFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateFailure {
    NoIterationField,
    NoIterations,
    NoCurrentIteration,
    Remote(String),
}

impl std::fmt::Display for UpdateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateFailure::NoIterationField => write!(f, "project has no iteration field"),
            UpdateFailure::NoIterations => write!(f, "iteration field has no iterations"),
            UpdateFailure::NoCurrentIteration => write!(f, "no iteration covers today"),
            UpdateFailure::Remote(msg) => write!(f, "{msg}"),
        }
    }
}
