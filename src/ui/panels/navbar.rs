// ScanBoard - ui/panels/navbar.rs
//
// Top bar: app name, the signed-in user, and logout. Only the About button
// is shown while signed out.

use crate::app::state::{AppState, UiAction, View};
use crate::core::model::User;
use crate::util::constants::APP_NAME;

/// Render the navigation bar (top panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState, user: Option<&User>) {
    egui::menu::bar(ui, |ui| {
        let title = egui::RichText::new(APP_NAME).strong();
        if user.is_some() {
            if ui.link(title).clicked() {
                state.request(UiAction::Navigate(View::Dashboard));
            }
        } else {
            ui.label(title);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("\u{24d8}").on_hover_text("About").clicked() {
                state.show_about = true;
            }
            if let Some(user) = user {
                if ui.button("Logout").clicked() {
                    state.request(UiAction::Logout);
                }
                ui.label(&user.username);
            }
        });
    });
}
