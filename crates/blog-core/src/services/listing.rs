//! Read-side flows: index, group and profile listings, and post detail.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::{BlogService, PostEntry};
use crate::domain::{Group, Post};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::PostFilter;

/// A page of posts belonging to one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupListing {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// A page of posts by one author.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub author: String,
    /// Every post by the author, not just those on this page.
    pub post_count: u64,
    pub page: Page<PostEntry>,
}

impl BlogService {
    /// All posts, newest first.
    pub async fn index(&self, request: PageRequest) -> Result<Page<PostEntry>, DomainError> {
        let page = self.find_posts(PostFilter::All, request).await?;
        self.hydrate(page).await
    }

    pub async fn group_listing(
        &self,
        slug: &str,
        request: PageRequest,
    ) -> Result<GroupListing, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        let page = self.find_posts_by_group(group.id, request).await?;
        let page = self.hydrate(page).await?;

        Ok(GroupListing { group, page })
    }

    pub async fn profile_listing(
        &self,
        username: &str,
        request: PageRequest,
    ) -> Result<ProfileListing, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let page = self.find_posts_by_author(author.id, request).await?;
        let post_count = page.total_items;
        let page = self.hydrate(page).await?;

        Ok(ProfileListing {
            author: author.username,
            post_count,
            page,
        })
    }

    pub async fn post_detail(&self, id: Uuid) -> Result<PostEntry, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let references = self.references(std::slice::from_ref(&post)).await?;
        Ok(references.entry(post))
    }

    pub async fn find_posts_by_group(
        &self,
        group_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.find_posts(PostFilter::Group(group_id), request).await
    }

    pub async fn find_posts_by_author(
        &self,
        author_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.find_posts(PostFilter::Author(author_id), request).await
    }

    async fn find_posts(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let total = self.posts.count(filter).await?;
        let window = request.window();
        if window.offset >= total {
            return Ok(Page::from_window(Vec::new(), total, request));
        }

        let items = self.posts.find_window(filter, window).await?;
        Ok(Page::from_window(items, total, request))
    }

    async fn hydrate(&self, page: Page<Post>) -> Result<Page<PostEntry>, DomainError> {
        let references = self.references(&page.items).await?;
        Ok(page.map(|post| references.entry(post)))
    }

    /// Load the authors and groups referenced by `posts` in two lookups.
    async fn references(&self, posts: &[Post]) -> Result<References, DomainError> {
        let author_ids = unique(posts.iter().map(|post| post.author_id));
        let group_ids = unique(posts.iter().filter_map(|post| post.group_id));

        let authors = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&author_ids)
                .await?
                .into_iter()
                .map(|user| (user.id, user.username))
                .collect()
        };

        let groups = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|group| (group.id, group))
                .collect()
        };

        Ok(References { authors, groups })
    }
}

struct References {
    authors: HashMap<Uuid, String>,
    groups: HashMap<Uuid, Group>,
}

impl References {
    fn entry(&self, post: Post) -> PostEntry {
        PostEntry {
            author: self.authors.get(&post.author_id).cloned(),
            group: post.group_id.and_then(|id| self.groups.get(&id).cloned()),
            post,
        }
    }
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
