//! The remote collaborator: REST and GraphQL calls against GitHub.
//!
//! Everything above this module talks to [`GitHubApi`]; only [`gh_cli`]
//! knows that calls go through the `gh` binary.

pub mod gh_cli;
pub mod queries;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RemoteCallError;

/// A named GraphQL variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    Str(String),
    Int(i64),
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Variable::Str(s.to_string())
    }
}

impl From<i64> for Variable {
    fn from(n: i64) -> Self {
        Variable::Int(n)
    }
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// GET a REST endpoint such as `repos/acme/app/issues/7`.
    async fn rest(&self, endpoint: &str) -> Result<Value, RemoteCallError>;

    /// Run a query or mutation and return its `data` object.
    async fn graphql(
        &self,
        document: &str,
        variables: &[(&str, Variable)],
    ) -> Result<Value, RemoteCallError>;
}
