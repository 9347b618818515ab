use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::player::{Player, PlayerId};

pub async fn list_players(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>("SELECT id, name FROM players ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

/// The subset of `ids` that is not a registered player.
pub async fn unknown_player_ids(
    pool: &PgPool,
    ids: &[PlayerId],
) -> Result<Vec<PlayerId>, sqlx::Error> {
    let wanted: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
    let known: HashSet<PlayerId> = sqlx::query_scalar::<_, PlayerId>(
        "SELECT id FROM players WHERE id = ANY($1)",
    )
    .bind(&wanted)
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();

    Ok(ids.iter().copied().filter(|id| !known.contains(id)).collect())
}

pub async fn create_player(pool: &PgPool, name: &str) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO players (id, name)
        VALUES ($1, $2)
        RETURNING id, name
        "#,
    )
    .bind(PlayerId::new())
    .bind(name)
    .fetch_one(pool)
    .await
}
