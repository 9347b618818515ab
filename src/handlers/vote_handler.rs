use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::jwt::AuthenticatedUser;
use crate::db::{matches, votes};
use crate::error::AppError;
use crate::handlers::tournament_for_match;
use crate::matchday::votes::vote_of_user;
use crate::models::common::{ApiResponse, TournamentQuery};
use crate::models::events::RealtimeEvent;
use crate::models::matches::VoteRequest;
use crate::models::player::PlayerId;
use crate::services::realtime;

fn parse_candidate(request: &VoteRequest) -> Result<PlayerId, AppError> {
    let raw = request
        .player_voted_for
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Player vote is required".to_string()))?;

    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid player id: {}", raw)))
}

// POST /matches/{match_number}/vote
pub async fn submit_vote(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    redis_client: web::Data<Arc<redis::Client>>,
    match_number: web::Path<i32>,
    query: web::Query<TournamentQuery>,
    body: web::Json<VoteRequest>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let candidate = parse_candidate(&body)?;
    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;

    let current = matches::find_match(&pool, tournament_id, match_number)
        .await?
        .ok_or_else(|| AppError::match_not_found(match_number))?;

    if !current.has_player(candidate) {
        tracing::warn!(
            "{} tried to vote for {} who did not play match {}",
            user.display_name, candidate, match_number
        );
        return Err(AppError::Validation(format!(
            "Player {} did not play match {}",
            candidate, match_number
        )));
    }

    let vote = votes::upsert_vote(
        &pool,
        tournament_id,
        match_number,
        user.user_id,
        &user.display_name,
        candidate,
    )
    .await?
    .ok_or_else(|| AppError::match_not_found(match_number))?;

    tracing::info!("{} voted {} in match {}", vote.user_name, vote.player_voted_for, match_number);

    realtime::broadcast(
        &redis_client,
        RealtimeEvent::VoteRegistered {
            match_number,
            user_id: vote.user_id,
            user_name: vote.user_name.clone(),
            player_voted_for: vote.player_voted_for,
            timestamp: vote.voted_at,
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Vote registered successfully", vote)))
}

// GET /matches/{match_number}/vote
pub async fn get_my_vote(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    match_number: web::Path<i32>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;

    let current = matches::find_match(&pool, tournament_id, match_number)
        .await?
        .ok_or_else(|| AppError::match_not_found(match_number))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "vote": vote_of_user(&current, user.user_id),
        "has_played": current.has_player(PlayerId::from(user.user_id)),
    })))
}
