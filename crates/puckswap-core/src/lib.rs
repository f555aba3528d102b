// Category trade-recommendation engine.
//
// Stages run leaves first: stats -> baseline -> classify -> matcher ->
// recommend. `pipeline::analyze` wires them together for a single snapshot.

pub mod baseline;
pub mod category;
pub mod classify;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod recommend;
pub mod stats;

pub use error::AnalysisError;

/// Identifier of a fantasy team (e.g. `465.l.33140.t.11`).
pub type TeamId = String;

/// Identifier of a player (e.g. `465.p.6743`).
pub type PlayerId = String;
