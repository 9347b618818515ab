use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::player::PlayerId;

/// One of the two fixed teams of a match: the darks or the lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Oscuras,
    Claras,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Oscuras, Side::Claras];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Oscuras => "oscuras",
            Side::Claras => "claras",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oscuras" => Ok(Side::Oscuras),
            "claras" => Ok(Side::Claras),
            other => Err(format!("Unknown side: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    #[serde(alias = "_id")]
    pub player_id: PlayerId,
    pub goals: i32,
}

impl RosterSlot {
    pub fn new(player_id: PlayerId, goals: i32) -> Self {
        Self { player_id, goals }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team: Side,
    pub players: Vec<RosterSlot>,
}

impl Team {
    pub fn new(team: Side, players: Vec<RosterSlot>) -> Self {
        Self { team, players }
    }

    pub fn empty(team: Side) -> Self {
        Self { team, players: Vec::new() }
    }

    /// Saturates instead of overflowing on corrupt stored data.
    pub fn goals(&self) -> i32 {
        self.players
            .iter()
            .fold(0i32, |total, slot| total.saturating_add(slot.goals.max(0)))
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|slot| slot.player_id == player_id)
    }
}

/// Player-of-the-match vote. At most one per (user, match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: Uuid,
    pub user_name: String,
    pub player_voted_for: PlayerId,
    pub match_number: i32,
    pub voted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub match_number: i32,
    pub date: Option<NaiveDate>,
    pub oscuras: Team,
    pub claras: Team,
    #[serde(default)]
    pub player_of_the_match_votes: Vec<Vote>,
    #[serde(default)]
    pub opinions: Vec<Opinion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Oscuras => &self.oscuras,
            Side::Claras => &self.claras,
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.oscuras.contains(player_id) || self.claras.contains(player_id)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "playerVotedFor", alias = "player_voted_for")]
    pub player_voted_for: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOpinionRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRosterRequest {
    pub oscuras: Team,
    pub claras: Team,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub date: Option<NaiveDate>,
    pub oscuras: Team,
    pub claras: Team,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteMatchQuery {
    pub tournament_id: Option<Uuid>,
    #[serde(default)]
    pub confirm: bool,
}
