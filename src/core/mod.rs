//! Core value types shared by every marker: coordinates, dungeon features,
//! monster dispositions, and runtime configuration.
//!
//! Features, behaviours, attitudes and terrain-change kinds are persisted as
//! single bytes. Each is a closed enum so that a byte the current build does
//! not know about is detected as corrupt save data instead of being carried
//! around as a meaningless number.

pub mod config;
pub mod coord;
pub mod feature;
pub mod monster;

pub use config::ScriptConfig;
pub use coord::Coord;
pub use feature::{Feature, TerrainChangeKind};
pub use monster::{Attitude, Behaviour, Deity};
