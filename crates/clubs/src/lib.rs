//! Owned resources: clubs and teams.
//!
//! Each resource has exactly one owner (the user that created it). Drafts carry
//! validated user input; ids and owners are assigned by the store.

pub mod club;
pub mod name;
pub mod team;

pub use club::{Club, ClubDraft};
pub use team::{Team, TeamDraft};
