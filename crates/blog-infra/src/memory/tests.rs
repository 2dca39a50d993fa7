//! Flow tests for `BlogService` running against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use blog_core::domain::{Group, Post, User, Viewer};
use blog_core::error::DomainError;
use blog_core::pagination::{POSTS_PER_PAGE, PageRequest};
use blog_core::ports::{BaseRepository, GroupRepository, PostFilter, PostRepository};
use blog_core::validation::PostForm;
use blog_core::{BlogService, RequestContext};

use super::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository};

struct Fixture {
    posts: Arc<InMemoryPostRepository>,
    groups: Arc<InMemoryGroupRepository>,
    users: Arc<InMemoryUserRepository>,
    service: BlogService,
}

impl Fixture {
    fn new() -> Self {
        let posts = Arc::new(InMemoryPostRepository::new());
        let groups = Arc::new(InMemoryGroupRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = BlogService::new(posts.clone(), groups.clone(), users.clone());
        Self {
            posts,
            groups,
            users,
            service,
        }
    }

    async fn user(&self, username: &str) -> User {
        self.users
            .insert(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    async fn group(&self, slug: &str) -> Group {
        self.groups
            .insert(Group::new(format!("Group {slug}"), slug, "description"))
            .await
            .unwrap()
    }

    /// Insert `count` posts with strictly increasing timestamps.
    async fn seed_posts(&self, author: &User, group: Option<&Group>, count: usize) -> Vec<Post> {
        let base = Utc::now() - Duration::hours(1);
        let posts: Vec<Post> = (0..count)
            .map(|i| {
                let mut post = Post::new(author.id, format!("post {i}"), group.map(|g| g.id));
                post.created_at = base + Duration::seconds(i as i64);
                post
            })
            .collect();
        self.posts.insert_many(posts.clone()).await.unwrap();
        posts
    }

    async fn total_posts(&self) -> u64 {
        self.posts.count(PostFilter::All).await.unwrap()
    }
}

fn ctx(user: &User) -> RequestContext {
    RequestContext::authenticated(Viewer::from(user))
}

fn page(number: u64) -> PageRequest {
    PageRequest::new(number, POSTS_PER_PAGE)
}

#[tokio::test]
async fn test_index_paginates_thirteen_posts() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    fx.seed_posts(&author, None, 13).await;

    assert_eq!(fx.service.index(page(1)).await.unwrap().items.len(), 10);
    assert_eq!(fx.service.index(page(2)).await.unwrap().items.len(), 3);
    assert!(fx.service.index(page(3)).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn test_index_is_newest_first_with_author_and_group() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let group = fx.group("test-slug").await;
    let posts = fx.seed_posts(&author, Some(&group), 3).await;

    let listing = fx.service.index(page(1)).await.unwrap();

    let ids: Vec<_> = listing.items.iter().map(|e| e.post.id).collect();
    assert_eq!(ids, vec![posts[2].id, posts[1].id, posts[0].id]);
    assert_eq!(listing.items[0].author.as_deref(), Some("NameTest"));
    assert_eq!(listing.items[0].group.as_ref().map(|g| g.slug.as_str()), Some("test-slug"));
}

#[tokio::test]
async fn test_group_listing_excludes_other_groups() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let group_a = fx.group("group-a").await;
    let group_b = fx.group("group-b").await;
    let in_a = fx.seed_posts(&author, Some(&group_a), 1).await;

    let listing_b = fx.service.group_listing("group-b", page(1)).await.unwrap();
    assert_eq!(listing_b.group.id, group_b.id);
    assert!(listing_b.page.items.iter().all(|e| e.post.id != in_a[0].id));
    assert!(listing_b.page.items.is_empty());

    let listing_a = fx.service.group_listing("group-a", page(1)).await.unwrap();
    assert_eq!(listing_a.page.items.len(), 1);
}

#[tokio::test]
async fn test_group_listing_unknown_slug_is_not_found() {
    let fx = Fixture::new();

    let err = fx.service.group_listing("missing", page(1)).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Group", .. }));
}

#[tokio::test]
async fn test_profile_count_is_independent_of_page() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let other = fx.user("Other").await;
    fx.seed_posts(&author, None, 13).await;
    fx.seed_posts(&other, None, 2).await;

    let second = fx.service.profile_listing("NameTest", page(2)).await.unwrap();

    assert_eq!(second.author, "NameTest");
    assert_eq!(second.post_count, 13);
    assert_eq!(second.page.items.len(), 3);
    assert!(second.page.items.iter().all(|e| e.post.author_id == author.id));
}

#[tokio::test]
async fn test_profile_unknown_username_is_not_found() {
    let fx = Fixture::new();

    let err = fx.service.profile_listing("nobody", page(1)).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));
}

#[tokio::test]
async fn test_post_detail_is_repeatable() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let post = fx.seed_posts(&author, None, 1).await.remove(0);

    let first = fx.service.post_detail(post.id).await.unwrap();
    let second = fx.service.post_detail(post.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.post, post);
}

#[tokio::test]
async fn test_post_detail_unknown_id_is_not_found() {
    let fx = Fixture::new();

    let err = fx.service.post_detail(uuid::Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_create_post_binds_author() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let group = fx.group("test-slug").await;

    let form = PostForm::new("Test entry", Some(group.id.to_string()));
    let post = fx.service.create_post(&ctx(&author), form).await.unwrap();

    assert_eq!(fx.total_posts().await, 1);
    let stored = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.author_id, author.id);
    assert_eq!(stored.text, "Test entry");
    assert_eq!(stored.group_id, Some(group.id));
}

#[tokio::test]
async fn test_create_post_rejects_blank_text() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;

    for text in ["", "   ", "\n\t"] {
        let err = fx
            .service
            .create_post(&ctx(&author), PostForm::new(text, None))
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => assert!(errors.field("text").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn test_create_post_requires_viewer() {
    let fx = Fixture::new();

    let err = fx
        .service
        .create_post(&RequestContext::anonymous(), PostForm::new("hello", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Unauthenticated));
    assert_eq!(fx.total_posts().await, 0);
}

#[tokio::test]
async fn test_edit_by_author_updates_in_place() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let group = fx.group("test-slug").await;
    let original = fx.seed_posts(&author, None, 1).await.remove(0);

    let form = PostForm::new("Edited text", Some(group.id.to_string()));
    let edited = fx.service.edit_post(&ctx(&author), original.id, form).await.unwrap();

    assert_eq!(fx.total_posts().await, 1);
    assert_eq!(edited.id, original.id);
    assert_eq!(edited.author_id, original.author_id);
    assert_eq!(edited.created_at, original.created_at);
    assert_eq!(edited.text, "Edited text");
    assert_eq!(edited.group_id, Some(group.id));
}

#[tokio::test]
async fn test_edit_by_non_author_is_refused() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let intruder = fx.user("Intruder").await;
    let original = fx.seed_posts(&author, None, 1).await.remove(0);

    let err = fx
        .service
        .edit_post(&ctx(&intruder), original.id, PostForm::new("hijacked", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));

    let form_err = fx.service.edit_post_form(&ctx(&intruder), original.id).await.unwrap_err();
    assert!(matches!(form_err, DomainError::Unauthorized));

    let stored = fx.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
}

#[tokio::test]
async fn test_edit_with_blank_text_changes_nothing() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    let original = fx.seed_posts(&author, None, 1).await.remove(0);

    let err = fx
        .service
        .edit_post(&ctx(&author), original.id, PostForm::new("  ", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(fx.posts.find_by_id(original.id).await.unwrap().unwrap(), original);
}

#[tokio::test]
async fn test_edit_unknown_post_is_not_found() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;

    let err = fx
        .service
        .edit_post(&ctx(&author), uuid::Uuid::new_v4(), PostForm::new("text", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_edit_form_lists_group_choices_by_title() {
    let fx = Fixture::new();
    let author = fx.user("NameTest").await;
    fx.group("zeta").await;
    fx.group("alpha").await;
    let post = fx.seed_posts(&author, None, 1).await.remove(0);

    let editable = fx.service.edit_post_form(&ctx(&author), post.id).await.unwrap();

    let slugs: Vec<_> = editable.groups.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "zeta"]);
    assert_eq!(editable.post, post);
}

#[tokio::test]
async fn test_duplicate_group_slug_is_rejected() {
    let fx = Fixture::new();
    fx.group("test-slug").await;

    let result = fx.groups.insert(Group::new("Another", "test-slug", "")).await;

    assert!(result.is_err());
    assert_eq!(fx.groups.find_all().await.unwrap().len(), 1);
}
