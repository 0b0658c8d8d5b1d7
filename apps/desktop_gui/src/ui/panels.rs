use client_core::{
    presenter::SELECTOR_PROMPT, validation::FormField, Mode, Notification, RecordView,
};
use eframe::egui;

use super::app::{StatusBanner, StatusBannerSeverity, SurveyFormApp};

const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(46, 125, 50);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(198, 40, 40);

impl SurveyFormApp {
    pub(super) fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Survey Registry");
        ui.add_space(6.0);
        self.show_status_banner(ui);

        let mut mode = self.form.mode();
        ui.horizontal(|ui| {
            for candidate in Mode::ALL {
                ui.radio_value(&mut mode, candidate, candidate.label());
            }
        });
        if mode != self.form.mode() {
            self.select_mode(mode);
        }
        ui.separator();

        match self.form.mode() {
            Mode::Add => self.show_add_panel(ui),
            Mode::Get => self.show_get_panel(ui),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = banner_colors(&banner);
            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_add_panel(&mut self, ui: &mut egui::Ui) {
        let busy = self.form.submission.is_busy();
        let draft = &mut self.form.submission.draft;
        let mut entered = field_row(
            ui,
            "Survey URL *",
            "https://...",
            &mut draft.survey_url,
            false,
        );
        entered |= field_row(
            ui,
            "Target Group *",
            "e.g. undergraduates",
            &mut draft.target_group,
            false,
        );
        entered |= field_row(ui, "Bypass Link", "https://...", &mut draft.bypass_link, false);
        field_row(
            ui,
            "Additional Details",
            "Optional notes",
            &mut draft.additional_details,
            true,
        );

        ui.add_space(8.0);
        let label = self.form.submission.button_label();
        let clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
        if (clicked || entered) && !busy {
            self.submit_active_mode();
        }
        let dismissed = self
            .form
            .submission
            .notification()
            .is_some_and(|note| notification_label(ui, note));
        if dismissed {
            self.dismiss_notification();
        }
    }

    fn show_get_panel(&mut self, ui: &mut egui::Ui) {
        let busy = self.form.lookup.is_busy();
        let entered = field_row(
            ui,
            "Survey URL *",
            "https://...",
            &mut self.form.lookup.query,
            false,
        );

        ui.add_space(8.0);
        let label = self.form.lookup.button_label();
        let clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
        if (clicked || entered) && !busy {
            self.submit_active_mode();
        }
        let dismissed = self
            .form
            .lookup
            .notification()
            .is_some_and(|note| notification_label(ui, note));
        if dismissed {
            self.dismiss_notification();
        }

        let presenter = self.form.lookup.presenter();
        if presenter.has_selector() {
            let entries = presenter.selector().to_vec();
            let current = presenter.selected();
            let mut selected = current;
            ui.add_space(8.0);
            egui::ComboBox::from_id_salt("survey_timestamp_selector")
                .selected_text(presenter.selected_label())
                .width(260.0)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, SELECTOR_PROMPT);
                    for entry in &entries {
                        ui.selectable_value(
                            &mut selected,
                            Some(entry.index),
                            entry.label.as_str(),
                        );
                    }
                });
            if selected != current {
                self.form.lookup.select(selected);
            }
        }

        if let Some(view) = self.form.lookup.presenter().displayed().cloned() {
            ui.add_space(8.0);
            self.show_record(ui, &view);
        }
    }

    fn show_record(&mut self, ui: &mut egui::Ui, view: &RecordView) {
        let copy_label = self.form.lookup.presenter().copy_label();
        let mut copy_clicked = false;
        egui::Frame::group(ui.style())
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                egui::Grid::new("survey_record")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("Target Group");
                        ui.label(view.target_group.as_str());
                        ui.end_row();

                        ui.strong("Bypass Link");
                        ui.horizontal(|ui| {
                            ui.label(view.bypass_link.as_str());
                            if view.can_copy() && ui.button(copy_label).clicked() {
                                copy_clicked = true;
                            }
                        });
                        ui.end_row();

                        ui.strong("Additional Details");
                        ui.label(view.additional_details.as_str());
                        ui.end_row();

                        ui.strong("Registered");
                        ui.label(view.timestamp_label());
                        ui.end_row();
                    });
            });
        if copy_clicked {
            self.copy_bypass_link();
        }
    }
}

fn banner_colors(banner: &StatusBanner) -> (egui::Color32, egui::Stroke) {
    match banner.severity {
        StatusBannerSeverity::Info => (
            egui::Color32::from_rgb(45, 74, 110),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(92, 132, 184)),
        ),
        StatusBannerSeverity::Error => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
        ),
    }
}

/// Labeled input that revalidates on every edit and shows the field's error.
/// Returns true when Enter was pressed in a single-line field.
fn field_row(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    field: &mut FormField,
    multiline: bool,
) -> bool {
    ui.label(label);
    let editor = if multiline {
        egui::TextEdit::multiline(&mut field.value).desired_rows(3)
    } else {
        egui::TextEdit::singleline(&mut field.value)
    };
    let response = ui.add(editor.hint_text(hint).desired_width(f32::INFINITY));
    if response.changed() {
        field.revalidate();
    }
    if let Some(err) = field.error() {
        ui.colored_label(ERROR_COLOR, err.to_string());
    }
    ui.add_space(4.0);
    !multiline && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

/// Returns true when the dismiss control was clicked.
fn notification_label(ui: &mut egui::Ui, note: &Notification) -> bool {
    let color = if note.is_error() {
        ERROR_COLOR
    } else {
        SUCCESS_COLOR
    };
    ui.add_space(6.0);
    ui.horizontal_wrapped(|ui| {
        ui.colored_label(color, note.message.as_str());
        ui.small_button("Dismiss").clicked()
    })
    .inner
}
