use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DeskError, DeskResult};
use crate::models::{new_id, PostKind, StaffComment, StaffPost};
use crate::session::Session;

/// Shared staff bulletin board of ideas and work orders.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StaffBoard {
    #[serde(default)]
    pub posts: Vec<StaffPost>,
}

impl StaffBoard {
    pub fn new(posts: Vec<StaffPost>) -> StaffBoard {
        StaffBoard { posts }
    }

    /// Publishes a post authored by the session user; newest posts come first.
    pub fn add_post(&mut self, kind: PostKind, title: &str, content: &str, session: &Session) -> DeskResult<&StaffPost> {
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() || content.is_empty() {
            return Err(DeskError::validation("post title and content must not be empty"));
        }
        let post = StaffPost {
            id: new_id(),
            author: session.name().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            kind,
            likes: 0,
            created_at: Local::now().to_rfc3339(),
            comments: Vec::new(),
        };
        info!(id = %post.id, kind = kind.label(), "staff post added");
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    pub fn like(&mut self, post_id: &str) -> DeskResult<u32> {
        let post = self.post_mut(post_id)?;
        post.likes += 1;
        Ok(post.likes)
    }

    pub fn comment(&mut self, post_id: &str, text: &str, session: &Session) -> DeskResult<&StaffComment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DeskError::validation("comment must not be empty"));
        }
        let author = session.name().to_string();
        let post = self.post_mut(post_id)?;
        post.comments.push(StaffComment {
            id: new_id(),
            author,
            text: text.to_string(),
            created_at: Local::now().to_rfc3339(),
        });
        info!(post = post_id, "comment added");
        Ok(&post.comments[post.comments.len() - 1])
    }

    pub fn filtered(&self, kind: Option<PostKind>) -> Vec<&StaffPost> {
        self.posts
            .iter()
            .filter(|p| kind.map_or(true, |k| p.kind == k))
            .collect()
    }

    fn post_mut(&mut self, post_id: &str) -> DeskResult<&mut StaffPost> {
        self.posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| DeskError::not_found("Post", post_id))
    }
}
