use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::matches::Vote;
use crate::models::player::PlayerId;

#[derive(FromRow)]
struct StoredVote {
    user_id: Uuid,
    user_name: String,
    player_voted_for: PlayerId,
    voted_at: DateTime<Utc>,
}

/// Records or replaces the caller's vote in one statement.
///
/// Returns `None` when no live match with that number exists in the
/// tournament. Keyed on (match, user), so a re-vote can never leave zero or
/// two rows behind.
pub async fn upsert_vote(
    pool: &PgPool,
    tournament_id: Uuid,
    match_number: i32,
    user_id: Uuid,
    user_name: &str,
    player_voted_for: PlayerId,
) -> Result<Option<Vote>, sqlx::Error> {
    let stored = sqlx::query_as::<_, StoredVote>(
        r#"
        INSERT INTO match_votes (match_id, user_id, user_name, player_voted_for)
        SELECT m.id, $3, $4, $5
        FROM matches m
        WHERE m.tournament_id = $1 AND m.match_number = $2 AND m.deleted_at IS NULL
        ON CONFLICT (match_id, user_id)
        DO UPDATE SET
            player_voted_for = EXCLUDED.player_voted_for,
            user_name = EXCLUDED.user_name,
            voted_at = NOW()
        RETURNING user_id, user_name, player_voted_for, voted_at
        "#,
    )
    .bind(tournament_id)
    .bind(match_number)
    .bind(user_id)
    .bind(user_name)
    .bind(player_voted_for)
    .fetch_optional(pool)
    .await?;

    Ok(stored.map(|v| Vote {
        user_id: v.user_id,
        user_name: v.user_name,
        player_voted_for: v.player_voted_for,
        match_number,
        voted_at: v.voted_at,
    }))
}
