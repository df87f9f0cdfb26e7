// ScanBoard - ui/panels/mod.rs

pub mod about;
pub mod auth;
pub mod dashboard;
pub mod detail;
pub mod navbar;
