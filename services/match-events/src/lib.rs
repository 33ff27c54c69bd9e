//! Live Match Event Service
//!
//! Consumes the frame stream of the live stats feed and produces:
//! - Kill events: first blood, streak tiers, shutdowns, executions
//! - Multi-kill events within the multi-kill window
//! - Ace events with hysteresis until the wiped team respawns
//! - Objective events, one per tower, inhibitor, baron and dragon
//! - Game end, with recording end times stamped on the game metadata
//!
//! Events are grouped per update cycle into snapshots and coalesced into
//! time buckets of a configured width.
//!
//! # Architecture
//!
//! ```text
//!   FeedClient (injected)
//!        │  windows of frames
//!    ┌───▼────┐
//!    │Ingest  │  ← Drops frames already applied
//!    └───┬────┘
//!        │
//!  ┌─────▼──────────────────────────┐
//!  │ MatchEngine                    │
//!  │  TeamTracker ×2                │
//!  │   └ ParticipantTracker ×5      │
//!  │  KillAttributor (per cycle)    │
//!  └─────┬──────────────────────────┘
//!        │ snapshots
//!    ┌───▼────┐
//!    │Buckets │
//!    └───┬────┘
//!        │ closed buckets
//!   Emission channel (one task per match)
//! ```

pub mod attribution;
pub mod buckets;
pub mod config;
pub mod engine;
pub mod feed;
pub mod ingestion;
pub mod participant;
pub mod replay;
pub mod roster;
pub mod runner;
pub mod state;
pub mod team;

use match_types::time::NANOS_PER_SEC;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";

/// Kills further apart than this start a new multi-kill count.
pub const MULTI_KILL_WINDOW: i64 = 10 * NANOS_PER_SEC;

/// A fifth kill only counts as a penta within this gap of the previous kill.
pub const PENTA_WINDOW: i64 = 30 * NANOS_PER_SEC;

/// Killing a participant holding at least this streak is a shutdown.
pub const SHUTDOWN_STREAK: u32 = 2;
