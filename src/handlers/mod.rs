// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth)
pub mod public;    // Tier 1: service info and health
pub mod protected; // Tier 2: lead CRUD and search under /leads/*

pub use public::*;
pub use protected::*;
