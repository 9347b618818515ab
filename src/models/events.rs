use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::matches::Opinion;
use crate::models::message::Message;
use crate::models::player::PlayerId;

pub const MESSAGES_CHANNEL: &str = "messages-channel";

pub fn match_channel(match_number: i32) -> String {
    format!("match-{}", match_number)
}

/// Payloads fanned out through the real-time relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RealtimeEvent {
    #[serde(rename = "new-message")]
    NewMessage(Message),

    #[serde(rename = "vote-registered")]
    VoteRegistered {
        match_number: i32,
        user_id: Uuid,
        user_name: String,
        player_voted_for: PlayerId,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "new-opinion")]
    NewOpinion {
        match_number: i32,
        opinion: Opinion,
    },
}

impl RealtimeEvent {
    pub fn channel(&self) -> String {
        match self {
            RealtimeEvent::NewMessage(_) => MESSAGES_CHANNEL.to_string(),
            RealtimeEvent::VoteRegistered { match_number, .. }
            | RealtimeEvent::NewOpinion { match_number, .. } => match_channel(*match_number),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RealtimeEvent::NewMessage(_) => "new-message",
            RealtimeEvent::VoteRegistered { .. } => "vote-registered",
            RealtimeEvent::NewOpinion { .. } => "new-opinion",
        }
    }
}
