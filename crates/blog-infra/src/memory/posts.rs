use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::Post;
use blog_core::error::RepoError;
use blog_core::pagination::Window;
use blog_core::ports::{BaseRepository, PostFilter, PostRepository};

/// Post store backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_window(&self, filter: PostFilter, window: Window) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;

        let mut matching: Vec<&Post> = store.values().filter(|post| filter.matches(post)).collect();
        matching.sort_by_key(|post| Reverse((post.created_at, post.id)));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|post| filter.matches(post)).count() as u64)
    }

    async fn insert_many(&self, posts: Vec<Post>) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        if let Some(dup) = posts.iter().find(|post| store.contains_key(&post.id)) {
            return Err(RepoError::Constraint(format!("post {} already exists", dup.id)));
        }
        store.extend(posts.into_iter().map(|post| (post.id, post)));
        Ok(())
    }
}
