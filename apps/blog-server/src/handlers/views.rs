//! Conversions from flow results into the page views sent to clients.

use std::collections::BTreeMap;

use blog_core::domain::Group;
use blog_core::pagination::Page;
use blog_core::services::{GroupListing, PostEntry, ProfileListing};
use blog_core::validation::FormErrors;
use blog_shared::dto::{
    GroupDetail, GroupLink, GroupOption, GroupPageView, IndexView, PageView, PostDetailView,
    PostView, ProfileView,
};

pub fn post_view(entry: PostEntry) -> PostView {
    PostView {
        id: entry.post.id.to_string(),
        text: entry.post.text,
        created_at: entry.post.created_at.to_rfc3339(),
        author: entry.author,
        group: entry.group.map(|group| GroupLink {
            slug: group.slug,
            title: group.title,
        }),
    }
}

pub fn page_view(page: Page<PostEntry>) -> PageView<PostView> {
    PageView {
        number: page.number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        has_next: page.has_next,
        has_previous: page.has_previous,
        items: page.items.into_iter().map(post_view).collect(),
    }
}

pub fn index_view(page: Page<PostEntry>) -> IndexView {
    IndexView {
        page: page_view(page),
    }
}

pub fn group_page_view(listing: GroupListing) -> GroupPageView {
    GroupPageView {
        group: GroupDetail {
            title: listing.group.title,
            slug: listing.group.slug,
            description: listing.group.description,
        },
        page: page_view(listing.page),
    }
}

pub fn profile_view(listing: ProfileListing) -> ProfileView {
    ProfileView {
        author: listing.author,
        post_count: listing.post_count,
        page: page_view(listing.page),
    }
}

pub fn post_detail_view(entry: PostEntry) -> PostDetailView {
    PostDetailView {
        post: post_view(entry),
    }
}

pub fn group_options(groups: &[Group]) -> Vec<GroupOption> {
    groups
        .iter()
        .map(|group| GroupOption {
            id: group.id.to_string(),
            title: group.to_string(),
        })
        .collect()
}

pub fn error_map(errors: &FormErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .iter()
        .map(|(field, messages)| (field.to_string(), messages.to_vec()))
        .collect()
}
