//! kitedb - A class-based database core with deterministic,
//! index-aware query planning
//!
//! Phase 0: schema catalog, filter model and index candidate
//! resolution. Probe execution, transactions and the network surface
//! live in later phases.

pub mod filter;
pub mod planner;
pub mod schema;
