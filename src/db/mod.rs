pub mod matches;
pub mod messages;
pub mod opinions;
pub mod players;
pub mod tournaments;
pub mod votes;
