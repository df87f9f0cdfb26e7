// ScanBoard - ui/panels/auth.rs
//
// Login and registration forms. Submitting records an intent; the controller
// performs the request on a background thread and clears `busy` when done.

use crate::app::state::{AppState, UiAction, View};
use crate::ui::theme;

/// Single-line input that reports whether Enter was pressed in it.
fn field(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool) -> bool {
    ui.label(label);
    let response = ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(6.0);
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn inline_messages(ui: &mut egui::Ui, error: Option<&str>, notice: Option<&str>) {
    if let Some(notice) = notice {
        ui.colored_label(theme::NOTICE_TEXT, notice);
        ui.add_space(4.0);
    }
    if let Some(error) = error {
        ui.colored_label(theme::ERROR_TEXT, error);
        ui.add_space(4.0);
    }
}

/// Centre a fixed-width column in the available space.
fn centred_form(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() * 0.15).max(16.0));
        ui.allocate_ui(egui::vec2(theme::AUTH_FORM_WIDTH, 0.0), |ui| {
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.set_width(theme::AUTH_FORM_WIDTH);
                    ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), add_contents);
                });
        });
    });
}

/// Render the login form.
pub fn render_login(ui: &mut egui::Ui, state: &mut AppState) {
    centred_form(ui, |ui| {
        ui.heading("Login");
        ui.add_space(10.0);

        let form = &mut state.login;
        let mut submit = field(ui, "Email", &mut form.email, false);
        submit |= field(ui, "Password", &mut form.password, true);

        inline_messages(ui, form.error.as_deref(), form.notice.as_deref());

        let label = if form.busy { "Logging in..." } else { "Login" };
        submit |= ui
            .add_enabled(!form.busy, egui::Button::new(label))
            .clicked();
        let busy = form.busy;

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Don't have an account?");
            if ui.link("Register").clicked() {
                state.request(UiAction::Navigate(View::Register));
            }
        });

        if submit && !busy {
            state.request(UiAction::SubmitLogin);
        }
    });
}

/// Render the registration form.
pub fn render_register(ui: &mut egui::Ui, state: &mut AppState) {
    centred_form(ui, |ui| {
        ui.heading("Register");
        ui.add_space(10.0);

        let form = &mut state.register;
        let mut submit = field(ui, "Email", &mut form.email, false);
        submit |= field(ui, "Username", &mut form.username, false);
        submit |= field(ui, "Password", &mut form.password, true);

        inline_messages(ui, form.error.as_deref(), None);

        let label = if form.busy { "Registering..." } else { "Register" };
        submit |= ui
            .add_enabled(!form.busy, egui::Button::new(label))
            .clicked();
        let busy = form.busy;

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Already have an account?");
            if ui.link("Login").clicked() {
                state.request(UiAction::Navigate(View::Login));
            }
        });

        if submit && !busy {
            state.request(UiAction::SubmitRegister);
        }
    });
}
