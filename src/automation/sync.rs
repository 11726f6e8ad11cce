use tracing::{debug, info, warn};

use super::ProjectAutomationClient;
use crate::error::RemoteCallError;
use crate::github::GitHubApi;
use crate::model::iteration::IterationUpdate;
use crate::model::project::Membership;
use crate::model::sync::{LabelOutcome, SprintAction, SyncReport};

impl<A: GitHubApi> ProjectAutomationClient<A> {
    /// Set or clear the sprint on every build project the issue is labelled for.
    ///
    /// Labels are handled one at a time and independently; a missing project
    /// or a failed field update only affects that label's outcome. Remote
    /// errors outside the best-effort field update abort the run.
    pub async fn sync_sprint_for_all_build_labels(
        &self,
        repository: &str,
        issue_number: u64,
        org: &str,
        action: SprintAction,
    ) -> Result<SyncReport, RemoteCallError> {
        let issue_id = self.resolve_issue_id(repository, issue_number).await?;
        let labels = self
            .list_labels_with_prefix(repository, issue_number, &self.settings.build_label_prefix)
            .await?;

        let mut report = SyncReport::new(action);

        if labels.is_empty() {
            if action == SprintAction::Add {
                warn!(
                    repository,
                    issue_number,
                    prefix = %self.settings.build_label_prefix,
                    "issue has no build labels"
                );
            }
            return Ok(report);
        }

        info!(repository, issue_number, labels = ?labels, "found build labels");

        for label in labels {
            let outcome = self.sync_label(org, &issue_id, &label, action).await?;
            report.outcomes.push((label, outcome));
        }

        info!(
            updated = report.updated(),
            total = report.outcomes.len(),
            "sprint sync finished"
        );
        Ok(report)
    }

    async fn sync_label(
        &self,
        org: &str,
        issue_id: &str,
        label: &str,
        action: SprintAction,
    ) -> Result<LabelOutcome, RemoteCallError> {
        let Some(project) = self.find_project_by_title(org, label).await? else {
            warn!(org, label, "no project titled after build label, skipping");
            return Ok(LabelOutcome::ProjectNotFound);
        };

        let update = match action {
            SprintAction::Add => {
                let membership = self.ensure_membership(&project.id, issue_id).await?;
                if let Membership::Added(_) = membership {
                    info!(
                        project = %project.title,
                        number = project.number,
                        "added issue to project"
                    );
                }
                self.set_current_iteration(&project.id, membership.item_id())
                    .await
            }
            SprintAction::Remove => {
                let Some(item_id) = self.find_membership(&project.id, issue_id).await? else {
                    info!(project = %project.title, "issue is not on project, nothing to clear");
                    return Ok(LabelOutcome::NotInProject);
                };
                self.clear_iteration(&project.id, &item_id).await
            }
        };

        Ok(match update {
            IterationUpdate::Failed(failure) => LabelOutcome::IterationFailed(failure),
            IterationUpdate::Applied { iteration } => {
                debug!(label, %iteration, "label synced");
                LabelOutcome::Updated
            }
            IterationUpdate::Cleared => LabelOutcome::Updated,
        })
    }

    /// Put the issue on the project titled `label`. `None` when no such project exists.
    pub async fn add_issue_to_build_project(
        &self,
        repository: &str,
        issue_number: u64,
        org: &str,
        label: &str,
    ) -> Result<Option<Membership>, RemoteCallError> {
        let issue_id = self.resolve_issue_id(repository, issue_number).await?;

        let Some(project) = self.find_project_by_title(org, label).await? else {
            warn!(org, label, "no project with this title");
            return Ok(None);
        };

        let membership = self.ensure_membership(&project.id, &issue_id).await?;
        match &membership {
            Membership::Existing(item) => {
                info!(project = %project.title, item = %item, "issue already on project")
            }
            Membership::Added(item) => {
                info!(project = %project.title, item = %item, "added issue to project")
            }
        }
        Ok(Some(membership))
    }
}
