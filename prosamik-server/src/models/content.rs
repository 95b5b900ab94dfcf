//! Content entities: blog posts and projects
//!
//! Both variants share one field shape. What differs between them
//! (table, searchable columns) lives on the [`Entity`] trait so a single
//! repository can serve both.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::FromRow;

use super::ValidationError;

/// Columns selected for every entity read, in row order.
pub const COLUMNS: &str = "id, title, path, description, tags, views_count";

/// Borrowed view of the textual fields of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFields<'a> {
    pub title: &'a str,
    pub path: &'a str,
    pub description: &'a str,
    pub tags: &'a str,
}

/// Caller-supplied textual fields for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
}

impl ContentDraft {
    /// Reject drafts whose title or path is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if self.path.trim().is_empty() {
            return Err(ValidationError::Empty { field: "path" });
        }
        Ok(())
    }
}

/// A stored content variant.
///
/// Implementors describe where they live and which columns free-text search
/// looks at. Everything else about persistence is shared.
pub trait Entity:
    for<'r> FromRow<'r, AnyRow> + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    /// Table holding this variant.
    const TABLE: &'static str;

    /// Resource name used in errors and logs.
    const RESOURCE: &'static str;

    /// Columns OR-matched by [`search`](crate::db::ContentRepo::search).
    const SEARCH_COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    fn fields(&self) -> ContentFields<'_>;

    /// Build an entity from caller input. `views_count` starts at zero and is
    /// never written by this crate.
    fn from_draft(id: i64, draft: ContentDraft) -> Self;
}

/// Blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub description: String,
    pub tags: String,
    pub views_count: i64,
}

impl Entity for Blog {
    const TABLE: &'static str = "blogs";
    const RESOURCE: &'static str = "blog";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "path", "tags"];

    fn id(&self) -> i64 {
        self.id
    }

    fn fields(&self) -> ContentFields<'_> {
        ContentFields {
            title: &self.title,
            path: &self.path,
            description: &self.description,
            tags: &self.tags,
        }
    }

    fn from_draft(id: i64, draft: ContentDraft) -> Self {
        Self {
            id,
            title: draft.title,
            path: draft.path,
            description: draft.description,
            tags: draft.tags,
            views_count: 0,
        }
    }
}

/// Project showcase entry. Paths are unique by convention and can be
/// looked up directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub description: String,
    pub tags: String,
    pub views_count: i64,
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const RESOURCE: &'static str = "project";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "path", "tags", "description"];

    fn id(&self) -> i64 {
        self.id
    }

    fn fields(&self) -> ContentFields<'_> {
        ContentFields {
            title: &self.title,
            path: &self.path,
            description: &self.description,
            tags: &self.tags,
        }
    }

    fn from_draft(id: i64, draft: ContentDraft) -> Self {
        Self {
            id,
            title: draft.title,
            path: draft.path,
            description: draft.description,
            tags: draft.tags,
            views_count: 0,
        }
    }
}

/// Lookup-key normalization: trim, then lowercase.
///
/// Applied to title lookups and search queries only. Stored values keep
/// their casing.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, path: &str) -> ContentDraft {
        ContentDraft {
            title: title.into(),
            path: path.into(),
            description: "intro".into(),
            tags: "go,basics".into(),
        }
    }

    #[test]
    fn normalize_trims_then_lowercases() {
        assert_eq!(normalize("  Go Basics \n"), "go basics");
        assert_eq!(normalize("RUST"), "rust");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn blank_title_or_path_is_rejected() {
        assert!(draft("Go", "/go").validate().is_ok());
        assert!(matches!(
            draft("   ", "/go").validate(),
            Err(ValidationError::Empty { field: "title" })
        ));
        assert!(matches!(
            draft("Go", "").validate(),
            Err(ValidationError::Empty { field: "path" })
        ));
    }

    #[test]
    fn from_draft_keeps_fields_as_given() {
        let blog = Blog::from_draft(7, draft("  Go Basics  ", "/go-basics"));
        assert_eq!(blog.id(), 7);
        assert_eq!(blog.fields().title, "  Go Basics  ");
        assert_eq!(blog.views_count, 0);
    }

    #[test]
    fn search_columns_differ_by_variant() {
        assert!(!Blog::SEARCH_COLUMNS.contains(&"description"));
        assert!(Project::SEARCH_COLUMNS.contains(&"description"));
    }

    #[test]
    fn draft_defaults_optional_fields() {
        let d: ContentDraft =
            serde_json::from_str(r#"{"title":"Go","path":"/go"}"#).unwrap();
        assert_eq!(d.description, "");
        assert_eq!(d.tags, "");
    }

    #[test]
    fn entity_serializes_with_wire_names() {
        let project = Project::from_draft(3, draft("Crate", "/crate"));
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["views_count"], 0);
        assert_eq!(json["path"], "/crate");
    }
}
