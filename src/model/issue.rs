use serde::Deserialize;

/// Issue as returned by `GET /repos/{owner}/{repo}/issues/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub node_id: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Issue {
    /// Label names starting with `prefix`, in the order GitHub returned them.
    pub fn labels_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.labels
            .iter()
            .filter(|l| l.name.starts_with(prefix))
            .map(|l| l.name.clone())
            .collect()
    }
}
