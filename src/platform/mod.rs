// ScanBoard - platform/mod.rs
//
// Platform abstraction layer: directories and config.toml.
// Dependencies: util, directories crate, toml.
// Must NOT depend on: core, app, ui.

pub mod config;
