use serde::{Deserialize, Serialize};

pub type PostId = String;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Post {
    #[serde(rename = "_id", alias = "id")]
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for create and update.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
}

#[derive(thiserror::Error, Debug)]
pub enum PostError {
    #[error("title is required")]
    TitleRequired,
    #[error("post not found: {0}")]
    NotFound(PostId),
    #[error("invalid server url: {0}")]
    InvalidServer(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl PostError {
    /// True for failures of the request itself, as opposed to local validation.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            PostError::Http(_) | PostError::Status { .. } | PostError::Decode(_)
        )
    }
}

impl Post {
    pub fn new(
        id: impl Into<PostId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Post {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

impl PostDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        PostDraft {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Client-side view of the post list and the inputs bound to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub items: Vec<Post>,
    pub title_input: String,
    pub description_input: String,
    pub selected_id: Option<PostId>,
    pub search_query: String,
}

impl ViewState {
    pub fn find(&self, id: &str) -> Option<&Post> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn is_editing(&self) -> bool {
        self.selected_id.is_some()
    }

    pub fn clear_inputs(&mut self) {
        self.title_input.clear();
        self.description_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_server_id_field() {
        let post: Post = serde_json::from_value(json!({
            "_id": "65f0a1",
            "title": "Hello",
            "description": "first",
            "__v": 0
        }))
        .unwrap();
        assert_eq!(post, Post::new("65f0a1", "Hello", "first"));
    }

    #[test]
    fn accepts_plain_id_and_missing_description() {
        let post: Post = serde_json::from_value(json!({ "id": "7", "title": "t" })).unwrap();
        assert_eq!(post.id, "7");
        assert_eq!(post.description, "");
    }

    #[test]
    fn draft_serializes_title_and_description_only() {
        let value = serde_json::to_value(PostDraft::new("a", "")).unwrap();
        assert_eq!(value, json!({ "title": "a", "description": "" }));
    }

    #[test]
    fn find_scans_items_by_id() {
        let state = ViewState {
            items: vec![Post::new("1", "A", "d"), Post::new("2", "B", "e")],
            ..ViewState::default()
        };
        assert_eq!(state.find("2").map(|p| p.title.as_str()), Some("B"));
        assert!(state.find("3").is_none());
    }

    #[test]
    fn validation_errors_are_not_request_failures() {
        assert!(!PostError::TitleRequired.is_request_failure());
        assert!(PostError::Status {
            code: 500,
            body: String::new()
        }
        .is_request_failure());
    }
}
