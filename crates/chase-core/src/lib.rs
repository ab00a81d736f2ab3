//! Engine-agnostic tick, timer and agent primitives shared by the chase crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod debounce;
pub mod error;
pub mod tick;
pub mod timer;

pub use agent::{AgentId, AgentRole};
pub use debounce::Debouncer;
pub use error::{ensure_non_negative, ensure_positive, ConfigError};
pub use tick::TickContext;
pub use timer::IntervalTimer;
