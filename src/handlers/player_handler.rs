use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::jwt::AdminUser;
use crate::db::{players, tournaments::resolve_tournament_id};
use crate::error::AppError;
use crate::matchday::stats::top_scorers;
use crate::models::common::{ApiResponse, TournamentQuery};
use crate::services::player_stats::load_players_with_stats;

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
}

// GET /players
pub async fn get_players(
    pool: web::Data<PgPool>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = resolve_tournament_id(&pool, query.tournament_id).await?;
    let players = load_players_with_stats(&pool, tournament_id).await?;
    Ok(HttpResponse::Ok().json(players))
}

// GET /players/top-scorers
pub async fn get_top_scorers(
    pool: web::Data<PgPool>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = resolve_tournament_id(&pool, query.tournament_id).await?;
    let players = load_players_with_stats(&pool, tournament_id).await?;
    Ok(HttpResponse::Ok().json(top_scorers(&players)))
}

// POST /players
pub async fn create_player(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    body: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Player name is required".to_string()));
    }

    let player = players::create_player(&pool, name).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Player created", player)))
}
