//! Pure match-day logic: vote tallies, player statistics and roster drafts.
//! Nothing in here touches the database.

pub mod roster;
pub mod stats;
pub mod votes;
