use std::collections::BTreeMap;

use crate::models::matches::{Match, Vote};
use crate::models::player::PlayerId;

/// Candidate -> number of votes received.
pub type VoteTally = BTreeMap<PlayerId, u32>;

pub fn tally(votes: &[Vote]) -> VoteTally {
    votes.iter().fold(VoteTally::new(), |mut counts, vote| {
        *counts.entry(vote.player_voted_for).or_insert(0) += 1;
        counts
    })
}

/// Vote counts per candidate for a match. Empty when nobody voted.
pub fn tally_votes(m: &Match) -> VoteTally {
    tally(&m.player_of_the_match_votes)
}

/// Every candidate sharing the highest count; ties are all kept.
pub fn most_voted_in(counts: &VoteTally) -> Vec<PlayerId> {
    let Some(max_votes) = counts.values().copied().max() else {
        return Vec::new();
    };

    counts
        .iter()
        .filter(|(_, votes)| **votes == max_votes)
        .map(|(player_id, _)| *player_id)
        .collect()
}

pub fn most_voted(m: &Match) -> Vec<PlayerId> {
    most_voted_in(&tally_votes(m))
}

/// The vote a given user currently holds in this match, if any.
pub fn vote_of_user(m: &Match, user_id: uuid::Uuid) -> Option<&Vote> {
    m.player_of_the_match_votes
        .iter()
        .find(|vote| vote.user_id == user_id)
}
