// ScanBoard - core/mod.rs
//
// Core data layer: backend resource models and the pure derivations the
// views render from them.
// Must NOT depend on: ui, platform, app, api, or any I/O crate directly.

pub mod model;
pub mod results;
