use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::jwt::AdminUser;
use crate::db::tournaments;
use crate::error::AppError;
use crate::models::common::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    #[serde(default)]
    pub info: String,
}

// GET /tournaments
pub async fn get_tournaments(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let tournaments = tournaments::list_tournaments(&pool).await?;
    Ok(HttpResponse::Ok().json(tournaments))
}

// POST /tournaments
pub async fn create_tournament(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    body: web::Json<CreateTournamentRequest>,
) -> Result<HttpResponse, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Tournament name is required".to_string()));
    }

    let tournament = tournaments::create_tournament(&pool, name, body.info.trim()).await?;
    tracing::info!("Tournament {} created by {}", tournament.id, admin.0.display_name);

    Ok(HttpResponse::Created().json(ApiResponse::success("Tournament created", tournament)))
}
