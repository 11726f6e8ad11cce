//! GraphQL documents for Projects v2 and the shapes of their `data` payloads.
//!
//! Listings are single pages. Projects past [`PROJECT_PAGE_SIZE`], items past
//! [`ITEM_PAGE_SIZE`] and fields past [`FIELD_PAGE_SIZE`] are never seen.

use serde::Deserialize;

use crate::model::iteration::Iteration;
use crate::model::project::Project;

pub const PROJECT_PAGE_SIZE: i64 = 100;
pub const ITEM_PAGE_SIZE: i64 = 100;
pub const FIELD_PAGE_SIZE: i64 = 20;

pub const ORG_PROJECTS: &str = r#"query($org: String!, $first: Int!) {
  organization(login: $org) {
    projectsV2(first: $first) {
      nodes { id number title }
    }
  }
}"#;

pub const PROJECT_ITEMS: &str = r#"query($project: ID!, $first: Int!) {
  node(id: $project) {
    ... on ProjectV2 {
      items(first: $first) {
        nodes {
          id
          content { ... on Issue { id } }
        }
      }
    }
  }
}"#;

pub const ADD_ITEM: &str = r#"mutation($project: ID!, $content: ID!) {
  addProjectV2ItemById(input: { projectId: $project, contentId: $content }) {
    item { id }
  }
}"#;

pub const PROJECT_FIELDS: &str = r#"query($project: ID!, $first: Int!) {
  node(id: $project) {
    ... on ProjectV2 {
      fields(first: $first) {
        nodes {
          ... on ProjectV2IterationField {
            id
            name
            configuration {
              iterations { id title startDate duration }
            }
          }
        }
      }
    }
  }
}"#;

pub const SET_ITERATION: &str = r#"mutation(
  $project: ID!, $item: ID!, $field: ID!, $iteration: String!
) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $project, itemId: $item, fieldId: $field,
      value: { iterationId: $iteration }
    }
  ) {
    projectV2Item { id }
  }
}"#;

pub const CLEAR_ITERATION: &str = r#"mutation($project: ID!, $item: ID!, $field: ID!) {
  clearProjectV2ItemFieldValue(
    input: { projectId: $project, itemId: $item, fieldId: $field }
  ) {
    projectV2Item { id }
  }
}"#;

#[derive(Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Deserialize)]
pub struct OrgProjectsData {
    pub organization: Option<Organization>,
}

#[derive(Deserialize)]
pub struct Organization {
    #[serde(rename = "projectsV2")]
    pub projects: Connection<Project>,
}

#[derive(Deserialize)]
pub struct ProjectItemsData {
    pub node: Option<ItemsNode>,
}

#[derive(Deserialize)]
pub struct ItemsNode {
    pub items: Option<Connection<ItemNode>>,
}

#[derive(Deserialize)]
pub struct ItemNode {
    pub id: String,
    /// Empty object for draft issues and pull requests.
    pub content: Option<ContentNode>,
}

#[derive(Deserialize)]
pub struct ContentNode {
    pub id: Option<String>,
}

#[derive(Deserialize)]
pub struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    pub add_item: AddItemPayload,
}

#[derive(Deserialize)]
pub struct AddItemPayload {
    pub item: ItemRef,
}

#[derive(Deserialize)]
pub struct ItemRef {
    pub id: String,
}

#[derive(Deserialize)]
pub struct ProjectFieldsData {
    pub node: Option<FieldsNode>,
}

#[derive(Deserialize)]
pub struct FieldsNode {
    pub fields: Option<Connection<FieldNode>>,
}

/// Non-iteration fields come back as `{}`.
#[derive(Deserialize)]
pub struct FieldNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub configuration: Option<IterationConfiguration>,
}

#[derive(Deserialize)]
pub struct IterationConfiguration {
    #[serde(default)]
    pub iterations: Vec<Iteration>,
}
