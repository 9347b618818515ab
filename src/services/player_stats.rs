use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{matches, players};
use crate::matchday::stats::compute_player_stats;
use crate::models::player::PlayerWithStats;

/// Every known player with cumulative stats over a tournament's live matches.
/// Without a tournament everybody is reported with zeroed stats.
pub async fn load_players_with_stats(
    pool: &PgPool,
    tournament_id: Option<Uuid>,
) -> Result<Vec<PlayerWithStats>, sqlx::Error> {
    let players = players::list_players(pool).await?;
    let tournament_matches = match tournament_id {
        Some(id) => matches::list_matches(pool, id).await?,
        None => Vec::new(),
    };
    Ok(compute_player_stats(&players, &tournament_matches))
}
