use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::matches::Opinion;

#[derive(FromRow)]
struct StoredOpinion {
    id: Uuid,
    user_id: Uuid,
    user_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

/// Appends an opinion to a live match. `None` when the match does not exist.
pub async fn append_opinion(
    pool: &PgPool,
    tournament_id: Uuid,
    match_number: i32,
    user_id: Uuid,
    user_name: &str,
    content: &str,
) -> Result<Option<Opinion>, sqlx::Error> {
    let stored = sqlx::query_as::<_, StoredOpinion>(
        r#"
        INSERT INTO match_opinions (id, match_id, user_id, user_name, content)
        SELECT $3, m.id, $4, $5, $6
        FROM matches m
        WHERE m.tournament_id = $1 AND m.match_number = $2 AND m.deleted_at IS NULL
        RETURNING id, user_id, user_name, content, created_at
        "#,
    )
    .bind(tournament_id)
    .bind(match_number)
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(user_name)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(stored.map(|o| Opinion {
        id: o.id,
        user_id: o.user_id,
        user_name: o.user_name,
        content: o.content,
        created_at: o.created_at,
    }))
}
