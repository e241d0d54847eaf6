use serde::{Deserialize, Serialize};

/// A comment as returned by the Pushshift comment search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            author: author.into(),
        }
    }
}

/// Body of a comment search response: `{"data": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListing {
    #[serde(default)]
    pub data: Vec<Comment>,
}
