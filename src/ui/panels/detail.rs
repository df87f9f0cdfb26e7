// ScanBoard - ui/panels/detail.rs
//
// Scan detail view: header with status and progress, the result tab strip,
// and either the overview cards or one tool's raw output.

use crate::app::state::{AppState, DetailState, UiAction, View};
use crate::core::model::{ScanDetail, ScanStatus};
use crate::core::results::{self, ResultTab};
use crate::ui::panels::dashboard::status_badge;
use crate::ui::theme;
use crate::util::constants::SCAN_NOT_FOUND_MESSAGE;

/// Render the scan detail view (central panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if ui.link("\u{2190} Back to dashboard").clicked() {
        state.request(UiAction::Navigate(View::Dashboard));
    }
    ui.add_space(8.0);

    let detail = match &state.detail {
        DetailState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading scan...");
            });
            return;
        }
        DetailState::NotFound => {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(SCAN_NOT_FOUND_MESSAGE).heading().weak());
            });
            return;
        }
        DetailState::Loaded(detail) => detail,
    };

    header(ui, detail);
    ui.add_space(10.0);

    ui.horizontal_wrapped(|ui| {
        for tab in ResultTab::all() {
            ui.selectable_value(&mut state.selected_tab, tab, tab.label());
        }
    });
    ui.separator();

    match state.selected_tab {
        ResultTab::Overview => overview(ui, detail),
        ResultTab::Tool(tool) => {
            ui.label(egui::RichText::new(tool.tab_heading()).strong());
            ui.add_space(4.0);
            egui::ScrollArea::both()
                .auto_shrink([false; 2])
                .min_scrolled_height(theme::RESULTS_MIN_HEIGHT)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(results::tab_body(tool, detail)).monospace());
                });
        }
    }
}

fn header(ui: &mut egui::Ui, detail: &ScanDetail) {
    let scan = &detail.summary;
    ui.horizontal(|ui| {
        ui.heading(&scan.domain);
        status_badge(ui, scan.status);
    });

    egui::Grid::new("scan_header_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Scan ID:");
            ui.label(scan.id.as_str());
            ui.end_row();

            ui.label("Created:");
            ui.label(
                scan.created_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            );
            ui.end_row();

            ui.label("Updated:");
            ui.label(
                scan.updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            );
            ui.end_row();

            if let Some(ref step) = scan.current_step {
                ui.label("Current step:");
                ui.label(step);
                ui.end_row();
            }
        });

    if scan.status == ScanStatus::Running {
        ui.add_space(6.0);
        ui.add(egui::ProgressBar::new(scan.progress_fraction()).show_percentage());
    }
}

fn overview(ui: &mut egui::Ui, detail: &ScanDetail) {
    ui.add_space(6.0);
    ui.horizontal_wrapped(|ui| {
        for card in results::overview_cards(detail) {
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(10))
                .show(ui, |ui| {
                    ui.set_width(theme::OVERVIEW_CARD_WIDTH);
                    ui.label(egui::RichText::new(card.title).strong());
                    ui.add_space(4.0);
                    ui.label(card.text);
                });
        }
    });
}
