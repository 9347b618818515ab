use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::matches::{Match, Side, Team};
use crate::models::player::{Player, PlayerId, PlayerWithStats};

const POINTS_PER_WIN: u32 = 3;
const POINTS_PER_DRAW: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Oscuras,
    Claras,
    Draw,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchOutcome::Oscuras => Some(Side::Oscuras),
            MatchOutcome::Claras => Some(Side::Claras),
            MatchOutcome::Draw => None,
        }
    }
}

pub fn match_outcome(m: &Match) -> MatchOutcome {
    match m.oscuras.goals().cmp(&m.claras.goals()) {
        Ordering::Greater => MatchOutcome::Oscuras,
        Ordering::Less => MatchOutcome::Claras,
        Ordering::Equal => MatchOutcome::Draw,
    }
}

/// Sum of the stored per-player percentage for each side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamPercentages {
    pub oscuras: f64,
    pub claras: f64,
}

impl TeamPercentages {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Oscuras => self.oscuras,
            Side::Claras => self.claras,
        }
    }

    /// Per-slot average for a side, 0 for an empty side.
    pub fn average(&self, m: &Match) -> TeamPercentages {
        let avg = |side: Side| {
            let slots = m.team(side).players.len();
            if slots == 0 {
                0.0
            } else {
                self.get(side) / slots as f64
            }
        };
        TeamPercentages {
            oscuras: avg(Side::Oscuras),
            claras: avg(Side::Claras),
        }
    }
}

/// Players missing from `players_with_stats` contribute 0.
pub fn team_percentage_sum(players_with_stats: &[PlayerWithStats], m: &Match) -> TeamPercentages {
    let by_id: HashMap<PlayerId, f64> = players_with_stats
        .iter()
        .map(|p| (p.id, p.percentage))
        .collect();

    let side_sum = |team: &Team| -> f64 {
        team.players
            .iter()
            .map(|slot| by_id.get(&slot.player_id).copied().unwrap_or(0.0))
            .sum()
    };

    TeamPercentages {
        oscuras: side_sum(&m.oscuras),
        claras: side_sum(&m.claras),
    }
}

/// All players sharing the highest goal count, in input order.
pub fn top_scorers(players_with_stats: &[PlayerWithStats]) -> Vec<PlayerWithStats> {
    players_with_stats
        .iter()
        .fold(Vec::<PlayerWithStats>::new(), |mut leaders, player| {
            match leaders.first().map(|leader| player.goals.cmp(&leader.goals)) {
                None | Some(Ordering::Greater) => {
                    leaders.clear();
                    leaders.push(player.clone());
                }
                Some(Ordering::Equal) => leaders.push(player.clone()),
                Some(Ordering::Less) => {}
            }
            leaders
        })
}

/// Cumulative goals, appearances and results per player over `matches`.
///
/// Soft-deleted matches are skipped. A player listed twice in one match counts
/// as a single appearance but every slot's goals are added. Roster entries
/// that reference unknown players are ignored. The result is ordered by
/// percentage, then goals (both descending), then name.
pub fn compute_player_stats(players: &[Player], matches: &[Match]) -> Vec<PlayerWithStats> {
    let mut stats: HashMap<PlayerId, PlayerWithStats> = players
        .iter()
        .map(|p| (p.id, PlayerWithStats::empty(p)))
        .collect();

    for m in matches.iter().filter(|m| !m.is_deleted()) {
        let outcome = match_outcome(m);
        for side in Side::ALL {
            let mut seen = HashSet::new();
            for slot in &m.team(side).players {
                let Some(entry) = stats.get_mut(&slot.player_id) else {
                    continue;
                };
                entry.goals = entry.goals.saturating_add(slot.goals.max(0) as u32);
                if !seen.insert(slot.player_id) {
                    continue;
                }
                entry.matches_played += 1;
                match outcome.winner() {
                    Some(winner) if winner == side => entry.wins += 1,
                    Some(_) => entry.losses += 1,
                    None => entry.draws += 1,
                }
            }
        }
    }

    let mut result: Vec<PlayerWithStats> = stats
        .into_values()
        .map(|mut p| {
            p.percentage = points_percentage(p.wins, p.draws, p.matches_played);
            p
        })
        .collect();

    result.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.goals.cmp(&a.goals))
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

fn points_percentage(wins: u32, draws: u32, matches_played: u32) -> f64 {
    if matches_played == 0 {
        return 0.0;
    }
    let earned = (wins * POINTS_PER_WIN + draws * POINTS_PER_DRAW) as f64;
    let possible = (matches_played * POINTS_PER_WIN) as f64;
    earned / possible * 100.0
}
