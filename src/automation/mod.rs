//! Moves issues onto build project boards and sets or clears their sprint.
//!
//! Every operation is a short sequence of remote calls through [`GitHubApi`].
//! Nothing is cached between calls, and membership is check-then-add, so two
//! concurrent runs against the same issue can race.

mod sync;


use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::RemoteCallError;
use crate::github::queries::{self, FIELD_PAGE_SIZE, ITEM_PAGE_SIZE, PROJECT_PAGE_SIZE};
use crate::github::{GitHubApi, Variable};
use crate::model::issue::Issue;
use crate::model::iteration::{IterationField, IterationPolicy, IterationUpdate, UpdateFailure};
use crate::model::project::{Membership, Project};

#[derive(Debug, Clone)]
pub struct AutomationSettings {
    pub build_label_prefix: String,
    pub iteration_fields: Vec<String>,
    pub iteration_policy: IterationPolicy,
    /// Date used by date-based iteration policies.
    pub today: NaiveDate,
}

impl AutomationSettings {
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            build_label_prefix: config.build_label_prefix.clone(),
            iteration_fields: config.iteration_fields.clone(),
            iteration_policy: config.iteration_policy,
            today,
        }
    }
}

pub struct ProjectAutomationClient<A> {
    api: A,
    settings: AutomationSettings,
}

fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, RemoteCallError> {
    serde_json::from_value(value).map_err(|e| RemoteCallError::malformed(context, e))
}

impl<A: GitHubApi> ProjectAutomationClient<A> {
    pub fn new(api: A, settings: AutomationSettings) -> Self {
        Self { api, settings }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    async fn fetch_issue(
        &self,
        repository: &str,
        issue_number: u64,
    ) -> Result<Issue, RemoteCallError> {
        let endpoint = format!("repos/{repository}/issues/{issue_number}");
        let value = self.api.rest(&endpoint).await?;
        decode(value, &endpoint)
    }

    pub async fn resolve_issue_id(
        &self,
        repository: &str,
        issue_number: u64,
    ) -> Result<String, RemoteCallError> {
        let issue = self.fetch_issue(repository, issue_number).await?;
        debug!(repository, number = issue.number, node_id = %issue.node_id, "resolved issue");
        Ok(issue.node_id)
    }

    pub async fn list_labels_with_prefix(
        &self,
        repository: &str,
        issue_number: u64,
        prefix: &str,
    ) -> Result<Vec<String>, RemoteCallError> {
        let issue = self.fetch_issue(repository, issue_number).await?;
        Ok(issue.labels_with_prefix(prefix))
    }

    /// Exact, case-sensitive title match among the organization's first page of projects.
    pub async fn find_project_by_title(
        &self,
        org: &str,
        title: &str,
    ) -> Result<Option<Project>, RemoteCallError> {
        let data = self
            .api
            .graphql(
                queries::ORG_PROJECTS,
                &[("org", org.into()), ("first", PROJECT_PAGE_SIZE.into())],
            )
            .await?;
        let data: queries::OrgProjectsData = decode(data, "organization projects")?;

        Ok(data
            .organization
            .and_then(|o| o.projects.nodes.into_iter().find(|p| p.title == title)))
    }

    pub async fn find_membership(
        &self,
        project_id: &str,
        issue_id: &str,
    ) -> Result<Option<String>, RemoteCallError> {
        let data = self
            .api
            .graphql(
                queries::PROJECT_ITEMS,
                &[("project", project_id.into()), ("first", ITEM_PAGE_SIZE.into())],
            )
            .await?;
        let data: queries::ProjectItemsData = decode(data, "project items")?;

        let items = data.node.and_then(|n| n.items).map(|c| c.nodes).unwrap_or_default();
        Ok(items
            .into_iter()
            .find(|item| {
                item.content
                    .as_ref()
                    .and_then(|c| c.id.as_deref())
                    .is_some_and(|id| id == issue_id)
            })
            .map(|item| item.id))
    }

    pub async fn add_membership(
        &self,
        project_id: &str,
        issue_id: &str,
    ) -> Result<String, RemoteCallError> {
        let data = self
            .api
            .graphql(
                queries::ADD_ITEM,
                &[("project", project_id.into()), ("content", issue_id.into())],
            )
            .await?;
        let data: queries::AddItemData = decode(data, "addProjectV2ItemById")?;
        Ok(data.add_item.item.id)
    }

    pub async fn ensure_membership(
        &self,
        project_id: &str,
        issue_id: &str,
    ) -> Result<Membership, RemoteCallError> {
        if let Some(item_id) = self.find_membership(project_id, issue_id).await? {
            return Ok(Membership::Existing(item_id));
        }
        let item_id = self.add_membership(project_id, issue_id).await?;
        Ok(Membership::Added(item_id))
    }

    /// First field, in board order, whose name is one of the configured iteration field names.
    pub async fn fetch_iteration_field(
        &self,
        project_id: &str,
    ) -> Result<Option<IterationField>, RemoteCallError> {
        let data = self
            .api
            .graphql(
                queries::PROJECT_FIELDS,
                &[("project", project_id.into()), ("first", FIELD_PAGE_SIZE.into())],
            )
            .await?;
        let data: queries::ProjectFieldsData = decode(data, "project fields")?;

        let fields = data.node.and_then(|n| n.fields).map(|c| c.nodes).unwrap_or_default();
        for field in fields {
            let (Some(id), Some(name)) = (field.id, field.name) else {
                continue;
            };
            if self.settings.iteration_fields.iter().any(|n| *n == name) {
                return Ok(Some(IterationField {
                    id,
                    name,
                    iterations: field.configuration.map(|c| c.iterations).unwrap_or_default(),
                }));
            }
        }
        Ok(None)
    }

    /// Looks up the iteration field, reporting absence as a failure outcome.
    async fn iteration_field_or_failure(
        &self,
        project_id: &str,
    ) -> Result<IterationField, UpdateFailure> {
        match self.fetch_iteration_field(project_id).await {
            Ok(Some(field)) => Ok(field),
            Ok(None) => {
                warn!(
                    project_id,
                    expected = ?self.settings.iteration_fields,
                    "project has no iteration field"
                );
                Err(UpdateFailure::NoIterationField)
            }
            Err(e) => {
                warn!(project_id, error = %e, "could not read project fields");
                Err(UpdateFailure::Remote(e.to_string()))
            }
        }
    }

    pub async fn set_current_iteration(&self, project_id: &str, item_id: &str) -> IterationUpdate {
        let field = match self.iteration_field_or_failure(project_id).await {
            Ok(field) => field,
            Err(failure) => return IterationUpdate::Failed(failure),
        };

        if field.iterations.is_empty() {
            warn!(project_id, field = %field.name, "iteration field has no iterations");
            return IterationUpdate::Failed(UpdateFailure::NoIterations);
        }

        let Some(current) = self
            .settings
            .iteration_policy
            .select_current(&field.iterations, self.settings.today)
        else {
            warn!(project_id, today = %self.settings.today, "no iteration covers today");
            return IterationUpdate::Failed(UpdateFailure::NoCurrentIteration);
        };

        let result = self
            .api
            .graphql(
                queries::SET_ITERATION,
                &[
                    ("project", project_id.into()),
                    ("item", item_id.into()),
                    ("field", Variable::from(field.id.as_str())),
                    ("iteration", Variable::from(current.id.as_str())),
                ],
            )
            .await;

        match result {
            Ok(_) => {
                info!(project_id, item_id, iteration = %current.title, "set iteration");
                IterationUpdate::Applied {
                    iteration: current.title.clone(),
                }
            }
            Err(e) => {
                warn!(project_id, item_id, error = %e, "failed to set iteration");
                IterationUpdate::Failed(UpdateFailure::Remote(e.to_string()))
            }
        }
    }

    pub async fn clear_iteration(&self, project_id: &str, item_id: &str) -> IterationUpdate {
        let field = match self.iteration_field_or_failure(project_id).await {
            Ok(field) => field,
            Err(failure) => return IterationUpdate::Failed(failure),
        };

        let result = self
            .api
            .graphql(
                queries::CLEAR_ITERATION,
                &[
                    ("project", project_id.into()),
                    ("item", item_id.into()),
                    ("field", Variable::from(field.id.as_str())),
                ],
            )
            .await;

        match result {
            Ok(_) => {
                info!(project_id, item_id, field = %field.name, "cleared iteration");
                IterationUpdate::Cleared
            }
            Err(e) => {
                warn!(project_id, item_id, error = %e, "failed to clear iteration");
                IterationUpdate::Failed(UpdateFailure::Remote(e.to_string()))
            }
        }
    }
}
