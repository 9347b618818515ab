pub mod health_handler;
pub mod match_handler;
pub mod message_handler;
pub mod opinion_handler;
pub mod player_handler;
pub mod tournament_handler;
pub mod vote_handler;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::tournaments::resolve_tournament_id;
use crate::error::AppError;

/// Tournament a match-level request runs against. With no tournament at all
/// the match cannot exist.
pub(crate) async fn tournament_for_match(
    pool: &PgPool,
    requested: Option<Uuid>,
    match_number: i32,
) -> Result<Uuid, AppError> {
    resolve_tournament_id(pool, requested)
        .await?
        .ok_or_else(|| AppError::match_not_found(match_number))
}

/// Trimmed free-text body, rejecting empty and oversized content.
pub(crate) fn required_content(
    content: Option<&str>,
    what: &str,
    max_len: usize,
) -> Result<String, AppError> {
    let trimmed = content.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} content is required", what)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{} content too long (max {} characters)",
            what, max_len
        )));
    }
    Ok(trimmed.to_string())
}
