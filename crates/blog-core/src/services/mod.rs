//! Application flows over the repository ports.

mod authoring;
mod context;
mod listing;

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Group, Post};
use crate::ports::{GroupRepository, PostRepository, UserRepository};

pub use authoring::EditablePost;
pub use context::RequestContext;
pub use listing::{GroupListing, ProfileListing};

/// A post joined with the records it references, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub post: Post,
    /// `None` only if the author row vanished between queries.
    pub author: Option<String>,
    pub group: Option<Group>,
}

/// Entry point for every post flow: listings, detail, create and edit.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
        }
    }
}
