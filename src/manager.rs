//! Client-side state for the post list and the actions that drive it.
//!
//! Every action talks to the server first and only touches [`ViewState`] once
//! the request has succeeded. Mutations are followed by a full refetch; the
//! mutation response itself is only logged.

use crate::api::PostApi;
use crate::model::{Post, PostDraft, PostError, ViewState};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

pub struct PostManager<A> {
    api: A,
    state: ViewState,
    synced_at: Option<DateTime<Utc>>,
}

impl<A: PostApi> PostManager<A> {
    pub fn new(api: A) -> Self {
        PostManager {
            api,
            state: ViewState::default(),
            synced_at: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn items(&self) -> &[Post] {
        &self.state.items
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    pub fn set_title_input(&mut self, value: impl Into<String>) {
        self.state.title_input = value.into();
    }

    pub fn set_description_input(&mut self, value: impl Into<String>) {
        self.state.description_input = value.into();
    }

    pub fn set_search_query(&mut self, value: impl Into<String>) {
        self.state.search_query = value.into();
    }

    pub fn fetch_all(&mut self) -> Result<(), PostError> {
        let posts = self
            .api
            .list()
            .inspect_err(|err| error!(error = %err, "error fetching posts"))?;
        self.replace_items(posts);
        Ok(())
    }

    pub fn create(&mut self, title: &str, description: &str) -> Result<Post, PostError> {
        if title.trim().is_empty() {
            warn!("refusing to create a post without a title");
            return Err(PostError::TitleRequired);
        }
        let created = self
            .api
            .create(&PostDraft::new(title, description))
            .inspect_err(|err| error!(error = %err, "error creating post"))?;
        info!(post = ?created, "post created");
        self.state.clear_inputs();
        self.refresh();
        Ok(created)
    }

    pub fn update(&mut self, id: &str, title: &str, description: &str) -> Result<Post, PostError> {
        let updated = self
            .api
            .update(id, &PostDraft::new(title, description))
            .inspect_err(|err| error!(error = %err, id, "error updating post"))?;
        info!(post = ?updated, "post updated");
        self.state.clear_inputs();
        self.state.selected_id = None;
        self.refresh();
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), PostError> {
        let response = self
            .api
            .delete(id)
            .inspect_err(|err| error!(error = %err, id, "error deleting post"))?;
        info!(id, response = %response, "post deleted");
        self.refresh();
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &str) -> Result<(), PostError> {
        let post = self.state.find(id).cloned().ok_or_else(|| {
            error!(id, "cannot edit a post that is not in the list");
            PostError::NotFound(id.to_string())
        })?;
        self.state.title_input = post.title;
        self.state.description_input = post.description;
        self.state.selected_id = Some(post.id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.clear_inputs();
        self.state.selected_id = None;
    }

    pub fn search(&mut self, query: &str) -> Result<(), PostError> {
        let posts = self
            .api
            .search(query)
            .inspect_err(|err| error!(error = %err, query, "error searching posts"))?;
        self.state.search_query = query.to_string();
        self.replace_items(posts);
        Ok(())
    }

    /// Submit the bound inputs: update the selected post in edit mode, create otherwise.
    pub fn submit(&mut self) -> Result<Post, PostError> {
        let title = self.state.title_input.clone();
        let description = self.state.description_input.clone();
        match self.state.selected_id.clone() {
            Some(id) => self.update(&id, &title, &description),
            None => self.create(&title, &description),
        }
    }

    // Dependent read after a mutation. Its failure is already logged and
    // must not turn a completed mutation into an error.
    fn refresh(&mut self) {
        let _ = self.fetch_all();
    }

    fn replace_items(&mut self, posts: Vec<Post>) {
        self.state.items = posts;
        self.synced_at = Some(Utc::now());
    }
}
