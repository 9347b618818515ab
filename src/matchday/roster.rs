use std::collections::HashSet;

use thiserror::Error;

use crate::models::matches::{Match, RosterSlot, Side, Team};
use crate::models::player::PlayerId;

/// Upper bound for goals in a single roster slot.
pub const MAX_GOALS_PER_SLOT: i32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("No roster slot {index} on side {side}")]
    SlotOutOfRange { side: Side, index: usize },

    #[error("Player {player_id} already occupies another slot in this match")]
    AlreadyAssigned { player_id: PlayerId },

    #[error("Player {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    #[error("Goals cannot be negative ({side} slot {index})")]
    NegativeGoals { side: Side, index: usize },

    #[error("At most {max} goals per player ({side} slot {index})", max = MAX_GOALS_PER_SLOT)]
    TooManyGoals { side: Side, index: usize },

    #[error("Expected the {expected} side but got {found}")]
    SideMismatch { expected: Side, found: Side },

    #[error("This match already has goals recorded; deleting it requires confirmation")]
    ConfirmationRequired,
}

/// Not-yet-persisted roster edit for one match.
///
/// Every edit returns a new draft and leaves `self` untouched, so a UI can
/// keep the previous value around for undo or comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterDraft {
    oscuras: Vec<RosterSlot>,
    claras: Vec<RosterSlot>,
}

impl RosterDraft {
    pub fn new(oscuras: Vec<RosterSlot>, claras: Vec<RosterSlot>) -> Self {
        Self { oscuras, claras }
    }

    pub fn from_match(m: &Match) -> Self {
        Self::new(m.oscuras.players.clone(), m.claras.players.clone())
    }

    /// Builds a draft from a client payload, checking each side is tagged
    /// with the position it was sent in.
    pub fn from_teams(oscuras: Team, claras: Team) -> Result<Self, RosterError> {
        for (expected, team) in [(Side::Oscuras, &oscuras), (Side::Claras, &claras)] {
            if team.team != expected {
                return Err(RosterError::SideMismatch { expected, found: team.team });
            }
        }
        Ok(Self::new(oscuras.players, claras.players))
    }

    pub fn slots(&self, side: Side) -> &[RosterSlot] {
        match side {
            Side::Oscuras => &self.oscuras,
            Side::Claras => &self.claras,
        }
    }

    pub fn slot(&self, side: Side, index: usize) -> Option<&RosterSlot> {
        self.slots(side).get(index)
    }

    /// True unless the candidate sits in some slot other than the target.
    pub fn is_slot_assignable(&self, candidate: PlayerId, side: Side, index: usize) -> bool {
        !Side::ALL.iter().any(|s| {
            self.slots(*s)
                .iter()
                .enumerate()
                .any(|(i, slot)| slot.player_id == candidate && !(*s == side && i == index))
        })
    }

    pub fn apply_goal_edit(&self, side: Side, index: usize, goals: i32) -> Result<Self, RosterError> {
        check_goals(side, index, goals)?;
        self.with_slot(side, index, |slot| RosterSlot { goals, ..slot })
    }

    /// Swaps the player in a slot and keeps its goals.
    ///
    /// Does not consult [`is_slot_assignable`](Self::is_slot_assignable); use
    /// [`apply_checked_player_swap`](Self::apply_checked_player_swap) when the
    /// caller has not already done so.
    pub fn apply_player_swap(
        &self,
        side: Side,
        index: usize,
        new_player: PlayerId,
    ) -> Result<Self, RosterError> {
        self.with_slot(side, index, |slot| RosterSlot { player_id: new_player, ..slot })
    }

    pub fn apply_checked_player_swap(
        &self,
        side: Side,
        index: usize,
        new_player: PlayerId,
    ) -> Result<Self, RosterError> {
        if !self.is_slot_assignable(new_player, side, index) {
            return Err(RosterError::AlreadyAssigned { player_id: new_player });
        }
        self.apply_player_swap(side, index, new_player)
    }

    fn with_slot(
        &self,
        side: Side,
        index: usize,
        update: impl FnOnce(RosterSlot) -> RosterSlot,
    ) -> Result<Self, RosterError> {
        let current = *self
            .slot(side, index)
            .ok_or(RosterError::SlotOutOfRange { side, index })?;

        let mut next = self.clone();
        let slots = match side {
            Side::Oscuras => &mut next.oscuras,
            Side::Claras => &mut next.claras,
        };
        slots[index] = update(current);
        Ok(next)
    }

    pub fn has_recorded_goals(&self) -> bool {
        Side::ALL
            .iter()
            .any(|side| self.slots(*side).iter().any(|slot| slot.goals > 0))
    }

    /// Full-roster check applied before anything is persisted.
    pub fn validate(&self) -> Result<(), RosterError> {
        let mut seen = HashSet::new();
        for side in Side::ALL {
            for (index, slot) in self.slots(side).iter().enumerate() {
                check_goals(side, index, slot.goals)?;
                if !seen.insert(slot.player_id) {
                    return Err(RosterError::DuplicatePlayer(slot.player_id));
                }
            }
        }
        Ok(())
    }

    /// Distinct players across both sides, in roster order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut seen = HashSet::new();
        Side::ALL
            .iter()
            .flat_map(|side| self.slots(*side))
            .map(|slot| slot.player_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn into_teams(self) -> (Team, Team) {
        (
            Team::new(Side::Oscuras, self.oscuras),
            Team::new(Side::Claras, self.claras),
        )
    }
}

fn check_goals(side: Side, index: usize, goals: i32) -> Result<(), RosterError> {
    if goals < 0 {
        return Err(RosterError::NegativeGoals { side, index });
    }
    if goals > MAX_GOALS_PER_SLOT {
        return Err(RosterError::TooManyGoals { side, index });
    }
    Ok(())
}

/// Destructive-action guard for deleting a match that was already played.
pub fn authorize_deletion(has_recorded_goals: bool, confirmed: bool) -> Result<(), RosterError> {
    if has_recorded_goals && !confirmed {
        return Err(RosterError::ConfirmationRequired);
    }
    Ok(())
}
