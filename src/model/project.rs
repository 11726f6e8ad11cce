use serde::Deserialize;

/// A Projects v2 board owned by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: String,
    pub number: u64,
    pub title: String,
}

/// How an issue ended up on a project board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// The issue was already on the board.
    Existing(String),
    /// A new item was created for the issue.
    Added(String),
}

impl Membership {
    pub fn item_id(&self) -> &str {
        match self {
            Membership::Existing(id) | Membership::Added(id) => id,
        }
    }
}
