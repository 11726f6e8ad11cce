//! In-memory GitHub used by the automation tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::queries;
use super::{GitHubApi, Variable};
use crate::error::RemoteCallError;

#[derive(Default)]
struct State {
    issues: HashMap<String, Value>,
    projects: HashMap<String, Vec<Value>>,
    items: HashMap<String, Vec<(String, Option<String>)>>,
    fields: HashMap<String, Vec<Value>>,
    iteration_values: HashMap<(String, String), String>,
    mutations: Vec<&'static str>,
    next_item: usize,
    fail_mutations: bool,
}

#[derive(Default)]
pub struct FakeGitHub {
    state: Mutex<State>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&mut self) -> &mut State {
        self.state.get_mut().unwrap()
    }

    pub fn with_issue(
        mut self,
        repo: &str,
        number: u64,
        node_id: &str,
        labels: &[&str],
    ) -> Self {
        let labels: Vec<Value> = labels.iter().map(|l| json!({ "name": l })).collect();
        self.state().issues.insert(
            format!("repos/{repo}/issues/{number}"),
            json!({ "number": number, "node_id": node_id, "labels": labels }),
        );
        self
    }

    pub fn with_project(mut self, org: &str, id: &str, number: u64, title: &str) -> Self {
        self.state()
            .projects
            .entry(org.to_string())
            .or_default()
            .push(json!({ "id": id, "number": number, "title": title }));
        self
    }

    /// An item whose content is `content_id`; `None` models a draft issue.
    pub fn with_item(mut self, project: &str, item_id: &str, content_id: Option<&str>) -> Self {
        self.state()
            .items
            .entry(project.to_string())
            .or_default()
            .push((item_id.to_string(), content_id.map(String::from)));
        self
    }

    /// `iterations` are `(id, start date)` pairs in API order.
    pub fn with_iteration_field(
        mut self,
        project: &str,
        field_id: &str,
        name: &str,
        iterations: &[(&str, &str)],
    ) -> Self {
        let iterations: Vec<Value> = iterations
            .iter()
            .map(|(id, start)| {
                json!({
                    "id": id,
                    "title": format!("Sprint {id}"),
                    "startDate": start,
                    "duration": 14,
                })
            })
            .collect();
        let fields = self.state().fields.entry(project.to_string()).or_default();
        fields.push(json!({
            "id": field_id,
            "name": name,
            "configuration": { "iterations": iterations },
        }));
        self
    }

    /// A field of another type, which the fields query returns as `{}`.
    pub fn with_other_field(mut self, project: &str) -> Self {
        self.state()
            .fields
            .entry(project.to_string())
            .or_default()
            .push(json!({}));
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.state().fail_mutations = true;
        self
    }

    pub fn mutations(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn items_for(&self, project: &str, content_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .items
            .get(project)
            .map(|items| {
                items
                    .iter()
                    .filter(|(_, c)| c.as_deref() == Some(content_id))
                    .map(|(id, _)| id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn iteration_value(&self, project: &str, item: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .iteration_values
            .get(&(project.to_string(), item.to_string()))
            .cloned()
    }
}

fn var<'a>(variables: &'a [(&str, Variable)], name: &str) -> &'a Variable {
    &variables
        .iter()
        .find(|(n, _)| *n == name)
        .unwrap_or_else(|| panic!("missing variable {name}"))
        .1
}

fn str_var(variables: &[(&str, Variable)], name: &str) -> String {
    match var(variables, name) {
        Variable::Str(s) => s.clone(),
        other => panic!("{name} should be a string, got {other:?}"),
    }
}

fn page(variables: &[(&str, Variable)]) -> usize {
    match var(variables, "first") {
        Variable::Int(n) => *n as usize,
        other => panic!("first should be an int, got {other:?}"),
    }
}

fn mutation_failure() -> RemoteCallError {
    RemoteCallError::NonZeroExit {
        command: "gh api graphql".into(),
        code: Some(1),
        stderr: "gh: Resource not accessible by integration".into(),
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn rest(&self, endpoint: &str) -> Result<Value, RemoteCallError> {
        let state = self.state.lock().unwrap();
        state
            .issues
            .get(endpoint)
            .cloned()
            .ok_or_else(|| RemoteCallError::NonZeroExit {
                command: format!("gh api {endpoint}"),
                code: Some(1),
                stderr: "gh: Not Found (HTTP 404)".into(),
            })
    }

    async fn graphql(
        &self,
        document: &str,
        variables: &[(&str, Variable)],
    ) -> Result<Value, RemoteCallError> {
        let mut state = self.state.lock().unwrap();

        if document == queries::ORG_PROJECTS {
            let org = str_var(variables, "org");
            let nodes: Vec<Value> = state
                .projects
                .get(&org)
                .map(|p| p.iter().take(page(variables)).cloned().collect())
                .unwrap_or_default();
            return Ok(json!({ "organization": { "projectsV2": { "nodes": nodes } } }));
        }

        if document == queries::PROJECT_ITEMS {
            let project = str_var(variables, "project");
            let nodes: Vec<Value> = state
                .items
                .get(&project)
                .map(|items| {
                    items
                        .iter()
                        .take(page(variables))
                        .map(|(id, content)| match content {
                            Some(c) => json!({ "id": id, "content": { "id": c } }),
                            None => json!({ "id": id, "content": {} }),
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Ok(json!({ "node": { "items": { "nodes": nodes } } }));
        }

        if document == queries::PROJECT_FIELDS {
            let project = str_var(variables, "project");
            let nodes: Vec<Value> = state
                .fields
                .get(&project)
                .map(|f| f.iter().take(page(variables)).cloned().collect())
                .unwrap_or_default();
            return Ok(json!({ "node": { "fields": { "nodes": nodes } } }));
        }

        if document == queries::ADD_ITEM {
            state.mutations.push("addProjectV2ItemById");
            if state.fail_mutations {
                return Err(mutation_failure());
            }
            let project = str_var(variables, "project");
            let content = str_var(variables, "content");
            state.next_item += 1;
            let id = format!("PVTI_new{}", state.next_item);
            state
                .items
                .entry(project)
                .or_default()
                .push((id.clone(), Some(content)));
            return Ok(json!({ "addProjectV2ItemById": { "item": { "id": id } } }));
        }

        if document == queries::SET_ITERATION {
            state.mutations.push("updateProjectV2ItemFieldValue");
            if state.fail_mutations {
                return Err(mutation_failure());
            }
            let key = (str_var(variables, "project"), str_var(variables, "item"));
            let item = key.1.clone();
            state
                .iteration_values
                .insert(key, str_var(variables, "iteration"));
            return Ok(json!({
                "updateProjectV2ItemFieldValue": { "projectV2Item": { "id": item } }
            }));
        }

        if document == queries::CLEAR_ITERATION {
            state.mutations.push("clearProjectV2ItemFieldValue");
            if state.fail_mutations {
                return Err(mutation_failure());
            }
            let key = (str_var(variables, "project"), str_var(variables, "item"));
            let item = key.1.clone();
            state.iteration_values.remove(&key);
            return Ok(json!({
                "clearProjectV2ItemFieldValue": { "projectV2Item": { "id": item } }
            }));
        }

        panic!("unexpected GraphQL document: {document}");
    }
}
