//! Tag model and repository for snippetd.
//!
//! Tags relate to files through the file_tags join table.

use sqlx::SqlitePool;

use crate::{AppError, Result};

/// Tag entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID.
    pub id: i64,
    /// Tag name (unique).
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Repository for tag operations and file/tag links.
pub struct TagRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TagRepository<'a> {
    /// Create a new TagRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new tag.
    pub async fn create(&self, name: &str) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("tag".to_string()))
    }

    /// Get a tag by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let result =
            sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get a tag by name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let result =
            sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags WHERE name = ?")
                .bind(name)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get a tag by name, creating it if it doesn't exist.
    pub async fn get_or_create(&self, name: &str) -> Result<Tag> {
        if let Some(tag) = self.get_by_name(name).await? {
            return Ok(tag);
        }
        self.create(name).await
    }

    /// List all tags.
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let result =
            sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags ORDER BY name")
                .fetch_all(self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Link a tag to a file. Linking twice is a no-op.
    pub async fn attach(&self, file_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO file_tags (file_id, tag_id) VALUES (?, ?)")
            .bind(file_id)
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List the tags linked to a file.
    pub async fn for_file(&self, file_id: i64) -> Result<Vec<Tag>> {
        let result = sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.created_at
             FROM tags t
             JOIN file_tags ft ON ft.tag_id = t.id
             WHERE ft.file_id = ?
             ORDER BY t.name",
        )
        .bind(file_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileRepository, NewFile, NewUser, UserRepository};
    use crate::Database;

    async fn setup_file(db: &Database) -> i64 {
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("owner@test.com", "hash"))
            .await
            .unwrap();
        FileRepository::new(db.pool())
            .create(&NewFile {
                name: "f".to_string(),
                description: String::new(),
                file_path: "p".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_list_tags() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        repo.create("rust").await.unwrap();
        repo.create("notes").await.unwrap();

        let tags = repo.list().await.unwrap();
        assert_eq!(tags.len(), 2);
        // Ordered by name
        assert_eq!(tags[0].name, "notes");
        assert_eq!(tags[1].name, "rust");
    }

    #[tokio::test]
    async fn test_duplicate_tag_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        repo.create("rust").await.unwrap();
        let err = repo.create("rust").await.unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        let first = repo.get_or_create("rust").await.unwrap();
        let second = repo.get_or_create("rust").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_attach_and_for_file() {
        let db = Database::open_in_memory().await.unwrap();
        let file_id = setup_file(&db).await;
        let repo = TagRepository::new(db.pool());

        let tag = repo.create("rust").await.unwrap();
        repo.attach(file_id, tag.id).await.unwrap();
        // Attaching twice is a no-op
        repo.attach(file_id, tag.id).await.unwrap();

        let tags = repo.for_file(file_id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rust");
    }

    #[tokio::test]
    async fn test_links_removed_with_file() {
        let db = Database::open_in_memory().await.unwrap();
        let file_id = setup_file(&db).await;
        let tag_repo = TagRepository::new(db.pool());
        let file_repo = FileRepository::new(db.pool());

        let tag = tag_repo.create("rust").await.unwrap();
        tag_repo.attach(file_id, tag.id).await.unwrap();

        file_repo.delete(file_id).await.unwrap();

        // Join rows cascade away; the tag itself stays
        assert!(tag_repo.for_file(file_id).await.unwrap().is_empty());
        assert_eq!(tag_repo.list().await.unwrap().len(), 1);
    }
}
