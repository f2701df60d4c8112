use serde::Deserialize;

/// Body for creating a comment.
#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: Option<String>,
}
