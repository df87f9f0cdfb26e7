// ScanBoard - app/mod.rs
//
// Application layer: session handling, background polling, view state and
// the controller that ties them together.
// Dependencies: api, core, util.
// Must NOT depend on: ui, platform.

pub mod controller;
pub mod poller;
pub mod scans;
pub mod session;
pub mod state;
pub mod tasks;

#[cfg(test)]
pub mod testing;
