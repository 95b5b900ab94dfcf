//! Content repository
//!
//! Handles CRUD and search for any [`Entity`] variant:
//! - every call checks out one pooled connection and prepares its
//!   statement on it without caching; both go away when the guard drops
//! - writes trim textual fields, lookups normalize the query side only
//! - update/delete treat zero affected rows as NotFound

use std::marker::PhantomData;

use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};

use super::DbError;
use crate::models::{normalize, Entity, Project, COLUMNS};

/// Generic content repository
pub struct ContentRepo<'a, E> {
    pool: &'a AnyPool,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> ContentRepo<'a, E> {
    pub fn new(pool: &'a AnyPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    async fn acquire(&self, op: &'static str) -> Result<PoolConnection<Any>, DbError> {
        self.pool
            .acquire()
            .await
            .map_err(DbError::persistence(E::RESOURCE, op))
    }

    /// Get a single entity by ID. `None` when absent.
    pub async fn get(&self, id: i64) -> Result<Option<E>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", E::TABLE);
        let mut conn = self.acquire("get").await?;

        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .persistent(false)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "get"))
    }

    /// Case-insensitive exact title match.
    ///
    /// Titles are not unique; with several matches the oldest row wins.
    pub async fn get_by_title(&self, title: &str) -> Result<Option<E>, DbError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {}
            WHERE LOWER(title) = LOWER($1)
            ORDER BY id ASC
            LIMIT 1
            "#,
            E::TABLE
        );
        let mut conn = self.acquire("get_by_title").await?;

        sqlx::query_as::<_, E>(&sql)
            .bind(normalize(title))
            .persistent(false)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "get_by_title"))
    }

    /// All entities, newest first.
    pub async fn list(&self) -> Result<Vec<E>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id DESC", E::TABLE);
        let mut conn = self.acquire("list").await?;

        sqlx::query_as::<_, E>(&sql)
            .persistent(false)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "list"))
    }

    /// Number of stored entities.
    pub async fn count(&self) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let mut conn = self.acquire("count").await?;

        let (count,): (i64,) = sqlx::query_as(&sql)
            .persistent(false)
            .fetch_one(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "count"))?;
        Ok(count)
    }

    /// Case-insensitive substring search across `E::SEARCH_COLUMNS`,
    /// newest first.
    pub async fn search(&self, query: &str) -> Result<Vec<E>, DbError> {
        let predicate = E::SEARCH_COLUMNS
            .iter()
            .map(|column| format!("LOWER({column}) LIKE LOWER($1) ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join("\n               OR ");
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {}
            WHERE {predicate}
            ORDER BY id DESC
            "#,
            E::TABLE
        );
        let mut conn = self.acquire("search").await?;

        sqlx::query_as::<_, E>(&sql)
            .bind(like_pattern(query))
            .persistent(false)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "search"))
    }

    /// Insert a new entity and return the stored row.
    ///
    /// The entity's own `id` is ignored; the store assigns one. Textual
    /// fields are trimmed, casing is kept.
    pub async fn create(&self, entity: &E) -> Result<E, DbError> {
        let sql = format!(
            r#"
            INSERT INTO {} (title, path, description, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#,
            E::TABLE
        );
        let fields = entity.fields();
        let mut conn = self.acquire("create").await?;

        let created = sqlx::query_as::<_, E>(&sql)
            .bind(fields.title.trim().to_owned())
            .bind(fields.path.trim().to_owned())
            .bind(fields.description.trim().to_owned())
            .bind(fields.tags.trim().to_owned())
            .persistent(false)
            .fetch_one(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "create"))?;

        tracing::debug!(resource = E::RESOURCE, id = created.id(), "created");
        Ok(created)
    }

    /// Replace the textual fields of an existing entity. The id is the key
    /// and is never written.
    pub async fn update(&self, entity: &E) -> Result<(), DbError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET title = $1, path = $2, description = $3, tags = $4
            WHERE id = $5
            "#,
            E::TABLE
        );
        let fields = entity.fields();
        let mut conn = self.acquire("update").await?;

        let result = sqlx::query(&sql)
            .bind(fields.title.trim().to_owned())
            .bind(fields.path.trim().to_owned())
            .bind(fields.description.trim().to_owned())
            .bind(fields.tags.trim().to_owned())
            .bind(entity.id())
            .persistent(false)
            .execute(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: E::RESOURCE,
                id: entity.id(),
            });
        }

        tracing::debug!(resource = E::RESOURCE, id = entity.id(), "updated");
        Ok(())
    }

    /// Delete by ID. Missing ids are an error, not a no-op.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let mut conn = self.acquire("delete").await?;

        let result = sqlx::query(&sql)
            .bind(id)
            .persistent(false)
            .execute(&mut *conn)
            .await
            .map_err(DbError::persistence(E::RESOURCE, "delete"))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: E::RESOURCE,
                id,
            });
        }

        tracing::debug!(resource = E::RESOURCE, id, "deleted");
        Ok(())
    }
}

impl ContentRepo<'_, Project> {
    /// Exact, case-sensitive path match.
    pub async fn get_by_path(&self, path: &str) -> Result<Option<Project>, DbError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {}
            WHERE path = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
            <Project as Entity>::TABLE
        );
        let mut conn = self.acquire("get_by_path").await?;

        sqlx::query_as::<_, Project>(&sql)
            .bind(path.to_owned())
            .persistent(false)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::persistence(<Project as Entity>::RESOURCE, "get_by_path"))
    }
}

/// `%query%` with LIKE metacharacters escaped, so `_` and `%` match
/// literally.
fn like_pattern(query: &str) -> String {
    let normalized = normalize(query);
    let mut pattern = String::with_capacity(normalized.len() + 2);
    pattern.push('%');
    for ch in normalized.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::db::{BlogRepo, ProjectRepo};
    use crate::models::{Blog, ContentDraft};

    fn blog(title: &str, path: &str, description: &str, tags: &str) -> Blog {
        Blog::from_draft(
            0,
            ContentDraft {
                title: title.into(),
                path: path.into(),
                description: description.into(),
                tags: tags.into(),
            },
        )
    }

    fn project(title: &str, path: &str, description: &str, tags: &str) -> Project {
        Project::from_draft(
            0,
            ContentDraft {
                title: title.into(),
                path: path.into(),
                description: description.into(),
                tags: tags.into(),
            },
        )
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("  Rust "), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[tokio::test]
    async fn create_then_get_round_trips_trimmed() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);

        let created = repo
            .create(&blog("  Go Basics  ", " /go-basics ", " intro ", " go,basics "))
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Go Basics");
        assert_eq!(created.path, "/go-basics");
        assert_eq!(created.description, "intro");
        assert_eq!(created.tags, "go,basics");
        assert_eq!(created.views_count, 0);

        let fetched = repo.get(created.id).await.unwrap().expect("stored");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_ignores_caller_id() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);

        let mut input = blog("Pinned", "/pinned", "", "");
        input.id = 999;
        let created = repo.create(&input).await.unwrap();

        assert_ne!(created.id, 999);
        assert!(repo.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let pool = memory_pool().await;
        assert!(BlogRepo::new(&pool).get(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn title_lookup_is_case_insensitive_and_preserves_casing() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        repo.create(&blog("  Go Basics  ", "/go-basics", "intro", "go,basics"))
            .await
            .unwrap();

        for key in ["go basics", "GO BASICS", "  Go Basics "] {
            let found = repo.get_by_title(key).await.unwrap().expect(key);
            assert_eq!(found.title, "Go Basics");
        }
        assert!(repo.get_by_title("go").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_titles_resolve_to_oldest() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        let first = repo.create(&blog("Same", "/a", "", "")).await.unwrap();
        repo.create(&blog("same", "/b", "", "")).await.unwrap();

        let found = repo.get_by_title("SAME").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        assert!(repo.list().await.unwrap().is_empty());

        for title in ["A", "B", "C"] {
            repo.create(&blog(title, "/x", "", "")).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn count_tracks_creates_and_deletes() {
        let pool = memory_pool().await;
        let repo = ProjectRepo::new(&pool);
        assert_eq!(repo.count().await.unwrap(), 0);

        let first = repo.create(&project("One", "/one", "", "")).await.unwrap();
        repo.create(&project("Two", "/two", "", "")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.delete(first.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(BlogRepo::new(&pool).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        let rust = repo
            .create(&blog("Rust Systems", "/rust-systems", "", "lang"))
            .await
            .unwrap();
        repo.create(&blog("Gardening", "/garden", "", "outdoors"))
            .await
            .unwrap();

        for query in ["rust", "RUST", "syst", "  Systems "] {
            let hits = repo.search(query).await.unwrap();
            assert_eq!(hits.len(), 1, "query {query:?}");
            assert_eq!(hits[0].id, rust.id);
        }
        assert!(repo.search("python").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_path_and_tags_newest_first() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        let by_path = repo.create(&blog("One", "/async-io", "", "")).await.unwrap();
        let by_tags = repo.create(&blog("Two", "/two", "", "ASYNC,tokio")).await.unwrap();

        let ids: Vec<_> = repo
            .search("async")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, [by_tags.id, by_path.id]);
    }

    #[tokio::test]
    async fn blog_search_skips_description_but_project_search_uses_it() {
        let pool = memory_pool().await;
        BlogRepo::new(&pool)
            .create(&blog("Post", "/post", "all about lifetimes", ""))
            .await
            .unwrap();
        ProjectRepo::new(&pool)
            .create(&project("Tool", "/tool", "all about lifetimes", ""))
            .await
            .unwrap();

        assert!(BlogRepo::new(&pool).search("lifetimes").await.unwrap().is_empty());
        assert_eq!(
            ProjectRepo::new(&pool).search("LIFETIMES").await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        repo.create(&blog("100% coverage", "/cov", "", "")).await.unwrap();
        repo.create(&blog("1000 coverage", "/cov2", "", "")).await.unwrap();

        let hits = repo.search("100%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% coverage");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let pool = memory_pool().await;
        let repo = BlogRepo::new(&pool);
        let created = repo.create(&blog("Draft", "/draft", "", "")).await.unwrap();

        let mut edited = created.clone();
        edited.title = "  Final  ".into();
        edited.tags = "done".into();
        repo.update(&edited).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Final");
        assert_eq!(fetched.tags, "done");
        assert_eq!(fetched.path, "/draft");
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let pool = memory_pool().await;
        let mut ghost = blog("Ghost", "/ghost", "", "");
        ghost.id = 77;

        let err = BlogRepo::new(&pool).update(&ghost).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "blog",
                id: 77
            }
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let pool = memory_pool().await;
        let repo = ProjectRepo::new(&pool);
        let created = repo.create(&project("Old", "/old", "", "")).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(repo.get(created.id).await.unwrap().is_none());

        let err = repo.delete(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "project", .. }));
    }

    #[tokio::test]
    async fn project_path_lookup_is_exact() {
        let pool = memory_pool().await;
        let repo = ProjectRepo::new(&pool);
        let created = repo
            .create(&project("Crate", "/My-Crate", "", ""))
            .await
            .unwrap();

        let found = repo.get_by_path("/My-Crate").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.get_by_path("/my-crate").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn variants_use_separate_tables() {
        let pool = memory_pool().await;
        BlogRepo::new(&pool)
            .create(&blog("Shared", "/shared", "", ""))
            .await
            .unwrap();

        assert!(ProjectRepo::new(&pool).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_table_surfaces_persistence_error() {
        let pool = memory_pool().await;
        sqlx::query("DROP TABLE blogs").execute(&pool).await.unwrap();

        let err = BlogRepo::new(&pool).list().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Persistence {
                resource: "blog",
                op: "list",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let pool = memory_pool().await;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    BlogRepo::new(&pool)
                        .create(&blog(&format!("Post {i}"), "/p", "", ""))
                        .await
                        .map(|b| b.id)
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("task panicked").unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(BlogRepo::new(&pool).list().await.unwrap().len(), 8);
    }
}
