//! Agent steering on top of `chase-grid`.
//!
//! Autonomous agents re-plan on a fixed cadence ([`ChaseController`]) and convert their held path
//! into physics impulses every tick ([`PathFollower`]). The human-controlled agent skips all of
//! that and maps input straight to impulses ([`HumanInput`]). A [`Roster`] decides which is which.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod follow;
pub mod input;
pub mod roster;
pub mod track;

pub use config::{InputConfig, SteeringConfig, TargetTrackingConfig};
pub use controller::{ChaseController, ReplanOutcome};
pub use follow::PathFollower;
pub use input::{fell_out_of_world, Drive, HumanInput, FALL_LIMIT};
pub use roster::{Roster, RosterEntry, DEFAULT_AGENT_NAMES};
pub use track::TargetTracker;
