// ScanBoard - ui/theme.rs
//
// Colour scheme, scan status colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::ScanStatus;
use egui::Color32;

/// Badge colour for a scan status.
pub fn status_colour(status: ScanStatus) -> Color32 {
    match status {
        ScanStatus::Completed => Color32::from_rgb(0x4c, 0xaf, 0x50), // Green
        ScanStatus::Running => Color32::from_rgb(0x21, 0x96, 0xf3),   // Blue
        ScanStatus::Failed => Color32::from_rgb(0xf4, 0x43, 0x36),    // Red
        ScanStatus::Pending | ScanStatus::Unknown => Color32::from_rgb(0xff, 0x98, 0x00), // Orange
    }
}

/// Subtle card background for a status (used on the dashboard list).
pub fn status_bg_colour(status: ScanStatus) -> Color32 {
    let c = status_colour(status);
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 18)
}

/// Inline form error colour.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(239, 68, 68); // Red 500

/// Informational notice colour.
pub const NOTICE_TEXT: Color32 = Color32::from_rgb(34, 197, 94); // Green 500

/// Status bar colours.
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Layout constants.
pub const AUTH_FORM_WIDTH: f32 = 320.0;
pub const CONTENT_MAX_WIDTH: f32 = 960.0;
pub const OVERVIEW_CARD_WIDTH: f32 = 180.0;
pub const RESULTS_MIN_HEIGHT: f32 = 240.0;

/// Apply dark/light visuals and the configured body font size.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            match text_style {
                egui::TextStyle::Body | egui::TextStyle::Button | egui::TextStyle::Monospace => {
                    font_id.size = font_size;
                }
                egui::TextStyle::Heading => font_id.size = font_size * 1.4,
                egui::TextStyle::Small => font_id.size = font_size * 0.8,
                _ => {}
            }
        }
    });
}
