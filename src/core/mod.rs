// RouterLens - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or touch the filesystem directly.
//
// Data flow: text -> parser (per line) -> corpus (table)
//            -> { device (profile), filter -> stats, export }

pub mod corpus;
pub mod device;
pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod stats;
