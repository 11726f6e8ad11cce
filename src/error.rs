use thiserror::Error;

/// Failure talking to GitHub through the `gh` client.
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {}: {stderr}", describe_exit(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("malformed response from {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or("a signal".to_string(), |c| format!("status {c}"))
}

impl RemoteCallError {
    pub fn malformed(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            context: context.into(),
            source,
        }
    }
}
