use crate::model::{Post, PostDraft, PostError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Remote operations on the post collection.
pub trait PostApi {
    fn list(&self) -> Result<Vec<Post>, PostError>;
    fn create(&self, draft: &PostDraft) -> Result<Post, PostError>;
    fn update(&self, id: &str, draft: &PostDraft) -> Result<Post, PostError>;
    fn delete(&self, id: &str) -> Result<String, PostError>;
    fn search(&self, title: &str) -> Result<Vec<Post>, PostError>;
}

#[derive(Clone, Debug)]
pub struct HttpPostApi {
    client: Client,
    base: Url,
}

impl HttpPostApi {
    pub fn new(server: &str) -> Result<Self, PostError> {
        let base = Url::parse(server).map_err(|_| PostError::InvalidServer(server.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(PostError::InvalidServer(server.to_string()));
        }
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(HttpPostApi { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("postmgr/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PostError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| PostError::InvalidServer(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, PostError> {
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(PostError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, PostError> {
        let bytes = resp.bytes()?;
        serde_json::from_slice(&bytes).map_err(|e| PostError::Decode(e.to_string()))
    }
}

impl PostApi for HttpPostApi {
    fn list(&self) -> Result<Vec<Post>, PostError> {
        let url = self.endpoint(&["get"])?;
        debug!(%url, "fetching posts");
        let resp = self.send(self.client.get(url))?;
        Self::decode(resp)
    }

    fn create(&self, draft: &PostDraft) -> Result<Post, PostError> {
        let url = self.endpoint(&["post"])?;
        debug!(%url, title = %draft.title, "creating post");
        let resp = self.send(self.client.post(url).json(draft))?;
        Self::decode(resp)
    }

    fn update(&self, id: &str, draft: &PostDraft) -> Result<Post, PostError> {
        let url = self.endpoint(&["update", id])?;
        debug!(%url, "updating post");
        let resp = self.send(self.client.patch(url).json(draft))?;
        Self::decode(resp)
    }

    fn delete(&self, id: &str) -> Result<String, PostError> {
        let url = self.endpoint(&["delete", id])?;
        debug!(%url, "deleting post");
        let resp = self.send(self.client.delete(url))?;
        Ok(resp.text()?)
    }

    fn search(&self, title: &str) -> Result<Vec<Post>, PostError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut().append_pair("title", title);
        debug!(%url, "searching posts");
        let resp = self.send(self.client.get(url))?;
        Self::decode(resp)
    }
}
