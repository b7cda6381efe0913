//! PostgreSQL implementation of CandidateCatalog.
//!
//! Reads the `dishes` table and the `like` join table. Nullable text columns
//! are read as empty strings.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::recommendation::Candidate;
use crate::ports::{CandidateCatalog, CatalogError};

/// PostgreSQL implementation of the CandidateCatalog port.
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgresCatalog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row for candidate listing queries.
#[derive(Debug, sqlx::FromRow)]
struct DishRow {
    id: i64,
    name: String,
    price: f64,
    description: Option<String>,
    taste: Option<String>,
    score: Option<f64>,
    image_url: Option<String>,
}

impl From<DishRow> for Candidate {
    fn from(row: DishRow) -> Self {
        Candidate {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description.unwrap_or_default(),
            taste: row.taste.unwrap_or_default(),
            score: row.score.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl CandidateCatalog for PostgresCatalog {
    async fn list_candidates(&self) -> Result<Vec<Candidate>, CatalogError> {
        let rows: Vec<DishRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id,
                   name,
                   price::FLOAT8 AS price,
                   description,
                   taste,
                   score::FLOAT8 AS score,
                   image_url
            FROM dishes
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to list dishes");
            CatalogError::unavailable(e.to_string())
        })?;

        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    async fn is_liked(&self, user_id: i64, dish_id: i64) -> Result<bool, CatalogError> {
        let (liked,): (bool,) = sqlx::query_as(
            r#"SELECT EXISTS(SELECT 1 FROM "like" WHERE user_id = $1 AND dish_id = $2)"#,
        )
        .bind(user_id)
        .bind(dish_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CatalogError::unavailable(e.to_string()))?;

        Ok(liked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_columns_become_empty() {
        let row = DishRow {
            id: 3,
            name: "口水鸡".to_string(),
            price: 26.0,
            description: None,
            taste: Some("麻辣".to_string()),
            score: None,
            image_url: None,
        };

        let candidate = Candidate::from(row);
        assert_eq!(candidate.id, 3);
        assert_eq!(candidate.taste, "麻辣");
        assert_eq!(candidate.description, "");
        assert_eq!(candidate.image_url, "");
        assert_eq!(candidate.score, 0.0);
    }
}
