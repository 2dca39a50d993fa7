//! Data Transfer Objects - page views and form submissions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Post create/edit submission (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// Login and signup submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// JSON credential exchange for API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLink {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub author: Option<String>,
    pub group: Option<GroupLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexView {
    pub page: PageView<PostView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetail {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPageView {
    pub group: GroupDetail,
    pub page: PageView<PostView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub author: String,
    pub post_count: u64,
    pub page: PageView<PostView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailView {
    pub post: PostView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOption {
    pub id: String,
    pub title: String,
}

/// The create/edit form, blank or re-rendered with submitted values and errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormView {
    pub is_edit: bool,
    pub post_id: Option<String>,
    pub text: String,
    pub group: Option<String>,
    pub groups: Vec<GroupOption>,
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Login or signup form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthFormView {
    pub username: String,
    pub next: Option<String>,
    pub errors: BTreeMap<String, Vec<String>>,
}
