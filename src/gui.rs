// ScanBoard - gui.rs
//
// Top-level eframe::App implementation.
// Each frame: apply background results, render the current view, then hand
// the recorded intent to the controller.

use crate::app::controller::AppController;
use crate::app::state::View;
use crate::ui;
use std::time::Duration;

/// Repaint cadence while background work is outstanding.
const BUSY_REPAINT: Duration = Duration::from_millis(100);

/// The ScanBoard application.
pub struct ScanBoardApp {
    pub controller: AppController,
    /// Backend root shown in the About dialog.
    server: String,
}

impl ScanBoardApp {
    pub fn new(controller: AppController, server: String) -> Self {
        Self { controller, server }
    }
}

impl eframe::App for ScanBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let changed = self.controller.tick();
        if changed {
            ctx.request_repaint();
        } else if self.controller.is_busy() {
            // Pollers and tasks deliver over channels; keep waking to drain them.
            ctx.request_repaint_after(BUSY_REPAINT);
        }

        let user = self.controller.session().user().cloned();
        let state = &mut self.controller.state;

        // Top bar
        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui::panels::navbar::render(ui, state, user.as_ref());
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&state.status_message).color(ui::theme::STATUS_TEXT));
                if !state.warnings.is_empty() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("\u{26a0} {} warning(s)", state.warnings.len()))
                            .color(egui::Color32::from_rgb(217, 119, 6)),
                    )
                    .on_hover_text(state.warnings.join("\n"));
                }
            });
        });

        // Central panel: the current view
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_max_width(ui::theme::CONTENT_MAX_WIDTH);
            match state.view {
                View::Loading => {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                }
                View::Login => ui::panels::auth::render_login(ui, state),
                View::Register => ui::panels::auth::render_register(ui, state),
                View::Dashboard => ui::panels::dashboard::render(ui, state),
                View::ScanDetail(_) => ui::panels::detail::render(ui, state),
            }
        });

        ui::panels::about::render(ctx, state, &self.server);

        if let Some(action) = self.controller.state.pending_action.take() {
            tracing::debug!(?action, "UI action");
            self.controller.handle(action);
            ctx.request_repaint();
        }
    }

    /// Called by eframe when the window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("Shutting down");
    }
}
