// src/repositories/postgres/category.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use keyhaus_common::Error;
use keyhaus_common::models::Category;

/// Category administration plus the dashboard listing. Deleting a
/// category nulls the reference on its rewards (schema-level SET NULL).
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn create(&self, name: &str, slug: &str, sort_order: i32) -> Result<Category, Error>;
    async fn get(&self, category_id: i64) -> Result<Option<Category>, Error>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, Error>;
    async fn update(&self, category: &Category) -> Result<(), Error>;
    async fn delete(&self, category_id: i64) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<Category>, Error>;
    /// Only categories that currently have at least one active reward.
    async fn list_with_active_rewards(&self) -> Result<Vec<Category>, Error>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: Pool<Postgres>,
}

impl PostgresCategoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepo for PostgresCategoryRepository {
    async fn create(&self, name: &str, slug: &str, sort_order: i32) -> Result<Category, Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, sort_order)
            VALUES ($1, $2, $3)
            RETURNING category_id, name, slug, sort_order, created_at
            "#,
        )
            .bind(name)
            .bind(slug)
            .bind(sort_order)
            .fetch_one(&self.pool)
            .await?;

        Ok(category)
    }

    async fn get(&self, category_id: i64) -> Result<Option<Category>, Error> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, name, slug, sort_order, created_at
            FROM categories
            WHERE category_id = $1
            "#,
        )
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, Error> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, name, slug, sort_order, created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, category: &Category) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE categories
            SET name = $1,
                slug = $2,
                sort_order = $3
            WHERE category_id = $4
            "#,
        )
            .bind(&category.name)
            .bind(&category.slug)
            .bind(category.sort_order)
            .bind(category.category_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, category_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>, Error> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, name, slug, sort_order, created_at
            FROM categories
            ORDER BY sort_order, name
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_with_active_rewards(&self) -> Result<Vec<Category>, Error> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT DISTINCT c.category_id, c.name, c.slug, c.sort_order, c.created_at
            FROM categories c
            JOIN rewards r ON r.category_id = c.category_id
            WHERE r.is_active = TRUE
            ORDER BY c.sort_order, c.name
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
