use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::AuthenticatedUser;
use crate::db::messages;
use crate::error::AppError;
use crate::handlers::required_content;
use crate::models::common::ApiResponse;
use crate::models::events::RealtimeEvent;
use crate::models::message::{CreateMessageRequest, Message};
use crate::services::realtime;

const RECENT_MESSAGES: i64 = 100;
const MAX_MESSAGE_LEN: usize = 1000;

// GET /messages
pub async fn get_messages(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let messages = messages::get_recent_messages(&pool, RECENT_MESSAGES).await?;
    Ok(HttpResponse::Ok().json(messages))
}

// POST /messages
pub async fn post_message(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    redis_client: web::Data<Arc<redis::Client>>,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let content = required_content(body.content.as_deref(), "Message", MAX_MESSAGE_LEN)?;

    let message = Message {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        user_name: user.display_name,
        content,
        team_logo: user.favorite_team,
        timestamp: Utc::now(),
        likes: 0,
        dislikes: 0,
    };

    messages::insert_message(&pool, &message).await?;
    tracing::info!("Message {} posted by {}", message.id, message.user_name);

    realtime::broadcast(&redis_client, RealtimeEvent::NewMessage(message.clone())).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Message sent successfully", message)))
}
