//! Static combat content and the in-memory archive over it.
//!
//! This crate houses the authored game data — entities, growth tables,
//! category matchups, skills, and effects — as embedded RON files, and loads
//! them into a [`ContentArchive`] implementing the core's archive oracle.
//! Content is consumed by the arena at combat setup and never appears in
//! combat state.

mod registry;

pub use registry::ContentArchive;
