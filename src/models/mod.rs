pub mod common;
pub mod events;
pub mod matches;
pub mod message;
pub mod player;
pub mod tournament;
pub mod user;
