use serde::Deserialize;

/// Body for creating or replacing a post; presence is validated in the
/// handler so a missing field yields a 400, not a decode error.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
