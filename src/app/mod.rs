// RouterLens - app/mod.rs
//
// Application layer: session orchestration, device profile persistence,
// inventory mapping, and report rendering.
// Dependencies: core layer, platform config.

pub mod analysis;
pub mod device_store;
pub mod inventory;
pub mod report;
