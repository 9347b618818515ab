use sqlx::PgPool;

use crate::models::message::Message;

/// The newest `limit` messages, returned oldest first.
pub async fn get_recent_messages(pool: &PgPool, limit: i64) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, user_name, content, team_logo, timestamp, likes, dislikes
        FROM (
            SELECT id, user_id, user_name, content, team_logo, timestamp, likes, dislikes
            FROM messages
            ORDER BY timestamp DESC
            LIMIT $1
        ) recent
        ORDER BY timestamp ASC
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn insert_message(pool: &PgPool, message: &Message) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, user_id, user_name, content, team_logo, timestamp, likes, dislikes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(message.id)
    .bind(message.user_id)
    .bind(&message.user_name)
    .bind(&message.content)
    .bind(&message.team_logo)
    .bind(message.timestamp)
    .bind(message.likes)
    .bind(message.dislikes)
    .execute(pool)
    .await?;

    Ok(())
}
