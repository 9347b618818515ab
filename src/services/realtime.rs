use redis::AsyncCommands;
use std::sync::Arc;
use actix_web::web;

use crate::models::events::RealtimeEvent;

/// Publishes an event on its channel. Returns the number of subscribers
/// that received it; delivery to clients is not acknowledged.
pub async fn trigger(
    redis_client: &web::Data<Arc<redis::Client>>,
    event: &RealtimeEvent,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut conn = redis_client.get_multiplexed_async_connection().await?;
    let payload = serde_json::to_string(event)?;
    let channel = event.channel();

    match conn.publish::<_, _, i32>(&channel, payload).await {
        Ok(subscriber_count) => {
            tracing::debug!(
                "Event {} relayed to {} subscribers on {}",
                event.name(), subscriber_count, channel
            );
            Ok(subscriber_count)
        }
        Err(e) => {
            tracing::error!("Failed to relay event {} on {}: {}", event.name(), channel, e);
            Err(Box::new(e))
        }
    }
}

/// Fire and forget: relay failures never fail the originating request.
pub async fn broadcast(redis_client: &web::Data<Arc<redis::Client>>, event: RealtimeEvent) {
    if let Err(e) = trigger(redis_client, &event).await {
        tracing::warn!("Failed to broadcast {} event: {}", event.name(), e);
    }
}
