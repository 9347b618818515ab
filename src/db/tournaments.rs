use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tournament::Tournament;

pub async fn list_tournaments(pool: &PgPool) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(
        r#"
        SELECT id, name, info, finished, created_at
        FROM tournaments
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create_tournament(
    pool: &PgPool,
    name: &str,
    info: &str,
) -> Result<Tournament, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(
        r#"
        INSERT INTO tournaments (id, name, info)
        VALUES ($1, $2, $3)
        RETURNING id, name, info, finished, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(info)
    .fetch_one(pool)
    .await
}

/// The tournament a request is scoped to: the requested one, otherwise the
/// most recently created. `None` only when no tournament exists.
pub async fn resolve_tournament_id(
    pool: &PgPool,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, sqlx::Error> {
    if let Some(id) = requested {
        return Ok(Some(id));
    }

    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM tournaments
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}
