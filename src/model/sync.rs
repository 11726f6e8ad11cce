use super::iteration::UpdateFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintAction {
    Add,
    Remove,
}

/// What happened to one build label's project during a sprint sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    Updated,
    ProjectNotFound,
    NotInProject,
    IterationFailed(UpdateFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub action: SprintAction,
    pub outcomes: Vec<(String, LabelOutcome)>,
}

impl SyncReport {
    pub fn new(action: SprintAction) -> Self {
        Self {
            action,
            outcomes: Vec::new(),
        }
    }

    /// Number of projects whose iteration value was set or cleared.
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == LabelOutcome::Updated)
            .count()
    }

    /// An issue without build labels has nothing to update, which is not a
    /// failure for either action. Otherwise at least one project must update.
    pub fn succeeded(&self) -> bool {
        self.outcomes.is_empty() || self.updated() > 0
    }
}
