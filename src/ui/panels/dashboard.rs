// ScanBoard - ui/panels/dashboard.rs
//
// Dashboard: new-scan form on top, the user's scans below, newest first as
// ordered by the server. Cards show a progress bar while a scan is running.

use crate::app::state::{AppState, UiAction};
use crate::core::model::{ScanStatus, ScanSummary};
use crate::ui::theme;

/// Render the dashboard (central panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    new_scan_form(ui, state);
    ui.add_space(12.0);
    ui.separator();

    ui.horizontal(|ui| {
        ui.heading("Your Scans");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button("\u{21bb} Refresh")
                .on_hover_text("Fetch the list now")
                .clicked()
            {
                state.request(UiAction::Refresh);
            }
        });
    });
    ui.add_space(6.0);

    if !state.scans_loaded {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading scans...");
        });
        return;
    }
    if state.scans.is_empty() {
        ui.label(egui::RichText::new("No scans yet. Start one above.").weak());
        return;
    }

    let mut opened = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for scan in &state.scans {
                if scan_card(ui, scan) {
                    opened = Some(scan.id.clone());
                }
                ui.add_space(6.0);
            }
        });
    if let Some(id) = opened {
        state.request(UiAction::OpenScan(id));
    }
}

fn new_scan_form(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("New Scan");
    ui.add_space(6.0);

    let form = &mut state.scan_form;
    let mut submit = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut form.domain)
                .hint_text("example.com")
                .desired_width(320.0),
        );
        submit |= response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let label = if form.busy { "Starting..." } else { "Start Scan" };
        submit |= ui
            .add_enabled(!form.busy, egui::Button::new(label))
            .clicked();
    });
    if let Some(ref error) = form.error {
        ui.colored_label(theme::ERROR_TEXT, error);
    }

    if submit && !form.busy {
        state.request(UiAction::SubmitScan);
    }
}

/// One clickable scan card. Returns `true` when clicked.
fn scan_card(ui: &mut egui::Ui, scan: &ScanSummary) -> bool {
    let frame = egui::Frame::group(ui.style())
        .fill(theme::status_bg_colour(scan.status))
        .inner_margin(egui::Margin::same(10));

    let response = frame
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&scan.domain).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    status_badge(ui, scan.status);
                });
            });
            ui.label(
                egui::RichText::new(format!(
                    "Created {}",
                    scan.created_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                ))
                .small()
                .weak(),
            );
            if scan.status == ScanStatus::Running {
                ui.add_space(4.0);
                ui.add(
                    egui::ProgressBar::new(scan.progress_fraction())
                        .show_percentage()
                        .desired_height(10.0),
                );
                if let Some(ref step) = scan.current_step {
                    ui.label(egui::RichText::new(step).small());
                }
            }
        })
        .response;

    response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

/// Coloured status pill.
pub fn status_badge(ui: &mut egui::Ui, status: ScanStatus) {
    ui.label(
        egui::RichText::new(format!(" {} ", status.label().to_uppercase()))
            .small()
            .strong()
            .color(egui::Color32::WHITE)
            .background_color(theme::status_colour(status)),
    );
}
