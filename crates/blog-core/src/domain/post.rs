use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters a post shows when displayed as a label.
const LABEL_CHARS: usize = 15;

/// Post entity - a single authored text record, optionally in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
}

impl Post {
    /// Create a new post authored by `author_id`, stamped with the current time.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
            author_id,
            group_id,
        }
    }

    /// Replace the editable fields. Identity, author and timestamp are kept.
    pub fn revise(&mut self, text: String, group_id: Option<Uuid>) {
        self.text = text;
        self.group_id = group_id;
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: String = self.text.chars().take(LABEL_CHARS).collect();
        f.write_str(&label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_truncates_to_fifteen_chars() {
        let post = Post::new(Uuid::new_v4(), "Тестовый пост для теста".to_string(), None);
        assert_eq!(post.to_string(), "Тестовый пост д");
    }

    #[test]
    fn test_display_short_text_is_unchanged() {
        let post = Post::new(Uuid::new_v4(), "short".to_string(), None);
        assert_eq!(post.to_string(), "short");
    }

    #[test]
    fn test_revise_keeps_identity_and_author() {
        let author = Uuid::new_v4();
        let group = Uuid::new_v4();
        let mut post = Post::new(author, "before".to_string(), None);
        let (id, created_at) = (post.id, post.created_at);

        post.revise("after".to_string(), Some(group));

        assert_eq!(post.id, id);
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.author_id, author);
        assert_eq!(post.text, "after");
        assert_eq!(post.group_id, Some(group));
    }
}
