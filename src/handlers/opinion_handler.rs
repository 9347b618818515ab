use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::jwt::AuthenticatedUser;
use crate::db::opinions;
use crate::error::AppError;
use crate::handlers::{required_content, tournament_for_match};
use crate::models::common::{ApiResponse, TournamentQuery};
use crate::models::events::RealtimeEvent;
use crate::models::matches::CreateOpinionRequest;
use crate::services::realtime;

const MAX_OPINION_LEN: usize = 1000;

// POST /matches/{match_number}/opinions
pub async fn create_opinion(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    redis_client: web::Data<Arc<redis::Client>>,
    match_number: web::Path<i32>,
    query: web::Query<TournamentQuery>,
    body: web::Json<CreateOpinionRequest>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let content = required_content(body.content.as_deref(), "Opinion", MAX_OPINION_LEN)?;
    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;

    let opinion = opinions::append_opinion(
        &pool,
        tournament_id,
        match_number,
        user.user_id,
        &user.display_name,
        &content,
    )
    .await?
    .ok_or_else(|| AppError::match_not_found(match_number))?;

    realtime::broadcast(
        &redis_client,
        RealtimeEvent::NewOpinion { match_number, opinion: opinion.clone() },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Opinion registered successfully", opinion)))
}
