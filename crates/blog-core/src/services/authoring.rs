//! Write-side flows: creating a post and editing one's own post.
//!
//! Edit follows `fetch -> authorize -> validate -> apply`; a non-author is
//! refused with `Unauthorized` before any validation happens.

use uuid::Uuid;

use super::{BlogService, RequestContext};
use crate::domain::{Group, Post};
use crate::error::DomainError;
use crate::validation::{PostDraft, PostForm};

/// A post its author may edit, with the group choices for the form.
#[derive(Debug, Clone)]
pub struct EditablePost {
    pub post: Post,
    pub groups: Vec<Group>,
}

impl BlogService {
    /// Groups a post may be assigned to, ordered by title.
    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.find_all().await?)
    }

    /// Data for an empty create form. Requires a viewer.
    pub async fn new_post_form(&self, ctx: &RequestContext) -> Result<Vec<Group>, DomainError> {
        ctx.require_viewer()?;
        self.group_choices().await
    }

    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let viewer = ctx.require_viewer()?;
        let draft = self.clean(&form).await?;

        let post = Post::new(viewer.user_id, draft.text, draft.group_id);
        let post = self.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, author = %viewer.username, "Post created");
        Ok(post)
    }

    /// Data for the edit form of a post the viewer owns.
    pub async fn edit_post_form(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<EditablePost, DomainError> {
        let post = self.authorize_edit(ctx, id).await?;
        let groups = self.group_choices().await?;
        Ok(EditablePost { post, groups })
    }

    pub async fn edit_post(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let mut post = self.authorize_edit(ctx, id).await?;
        let draft = self.clean(&form).await?;

        post.revise(draft.text, draft.group_id);
        let post = self.posts.update(post).await?;

        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    async fn authorize_edit(&self, ctx: &RequestContext, id: Uuid) -> Result<Post, DomainError> {
        let viewer = ctx.require_viewer()?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        if !post.is_authored_by(viewer.user_id) {
            tracing::debug!(post_id = %id, requester = %viewer.username, "Edit refused: not the author");
            return Err(DomainError::Unauthorized);
        }

        Ok(post)
    }

    async fn clean(&self, form: &PostForm) -> Result<PostDraft, DomainError> {
        let groups = if form.group_choice().is_some() {
            self.group_choices().await?
        } else {
            Vec::new()
        };
        form.clean(&groups).map_err(DomainError::Validation)
    }
}
