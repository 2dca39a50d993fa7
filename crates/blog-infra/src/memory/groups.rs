use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::Group;
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, GroupRepository};

/// Group store keyed by id; slugs are kept unique on write.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    store: RwLock<HashMap<Uuid, Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(store: &HashMap<Uuid, Group>, group: &Group) -> bool {
    store
        .values()
        .any(|existing| existing.slug == group.slug && existing.id != group.id)
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&group.id) || slug_taken(&store, &group) {
            return Err(RepoError::Constraint(format!("group slug '{}' already exists", group.slug)));
        }
        store.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&group.id) {
            return Err(RepoError::NotFound);
        }
        if slug_taken(&store, &group) {
            return Err(RepoError::Constraint(format!("group slug '{}' already exists", group.slug)));
        }
        store.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|group| group.slug == slug).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        let store = self.store.read().await;
        let mut groups: Vec<Group> = store.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}
