//! Umbrella crate that re-exports the `chase-*` building blocks.
//!
//! Start with [`grid`] for the navigation grid, bakes and path queries, and [`steer`] for the
//! agents that follow those paths. The Bevy adapter sits behind the `bevy` feature.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use chase_core as core;

#[cfg(feature = "grid")]
#[cfg_attr(docsrs, doc(cfg(feature = "grid")))]
pub use chase_grid as grid;

#[cfg(feature = "steer")]
#[cfg_attr(docsrs, doc(cfg(feature = "steer")))]
pub use chase_steer as steer;

#[cfg(feature = "bevy")]
#[cfg_attr(docsrs, doc(cfg(feature = "bevy")))]
pub use chase_bevy as bevy;
