use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Forum message. Like/dislike counters are only ever read here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub content: String,
    pub team_logo: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: Option<String>,
}
