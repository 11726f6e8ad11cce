use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{GitHubApi, Variable};
use crate::error::RemoteCallError;

/// Talks to GitHub by running `gh api`. Authentication is whatever `gh` has stored.
pub struct GhCli {
    program: String,
}

impl GhCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>, RemoteCallError> {
        let command = summarize(&self.program, args);
        debug!(%command, "calling gh");

        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RemoteCallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RemoteCallError::NonZeroExit {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl GitHubApi for GhCli {
    async fn rest(&self, endpoint: &str) -> Result<Value, RemoteCallError> {
        let stdout = self.run(&["api".to_string(), endpoint.to_string()]).await?;
        serde_json::from_slice(&stdout).map_err(|e| RemoteCallError::malformed(endpoint, e))
    }

    async fn graphql(
        &self,
        document: &str,
        variables: &[(&str, Variable)],
    ) -> Result<Value, RemoteCallError> {
        let stdout = self.run(&graphql_args(document, variables)).await?;
        parse_graphql_response(&stdout)
    }
}

/// Strings go through `-f` so gh never reinterprets them; integers need `-F`.
pub fn graphql_args(document: &str, variables: &[(&str, Variable)]) -> Vec<String> {
    let mut args = vec![
        "api".to_string(),
        "graphql".to_string(),
        "-f".to_string(),
        format!("query={document}"),
    ];
    for (name, value) in variables {
        match value {
            Variable::Str(s) => {
                args.push("-f".to_string());
                args.push(format!("{name}={s}"));
            }
            Variable::Int(n) => {
                args.push("-F".to_string());
                args.push(format!("{name}={n}"));
            }
        }
    }
    args
}

#[derive(Deserialize)]
struct GqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

pub fn parse_graphql_response(stdout: &[u8]) -> Result<Value, RemoteCallError> {
    let resp: GqlResponse = serde_json::from_slice(stdout)
        .map_err(|e| RemoteCallError::malformed("gh api graphql", e))?;

    if !resp.errors.is_empty() {
        let messages: Vec<String> = resp.errors.into_iter().map(|e| e.message).collect();
        return Err(RemoteCallError::GraphQl(messages.join("; ")));
    }

    Ok(resp.data.unwrap_or(Value::Null))
}

// The query document is long and multi-line; keep log lines readable.
fn summarize(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.starts_with("query=") {
            parts.push("query=<document>".to_string());
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}
