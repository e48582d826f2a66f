use eframe::egui;
use providers::TaskApiClient;
use shared::{ConversationEntry, Stage};
use std::sync::Arc;
use std::time::Duration;

mod controller;
mod runner;
mod session;
mod types;
mod utils;

use controller::SessionController;
use session::Session;
use types::*;
use utils::{load_settings_or_default, short_filename};

/// Search hits linked from the sidebar
const SIDEBAR_SOURCE_LIMIT: usize = 5;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings_or_default();
    let session = Session::start();
    let api = TaskApiClient::new(&settings, session.id());
    tracing::info!(session = session.id(), api = api.base_url(), "starting MKAI");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MKAI")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([1200.0, 800.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "MKAI",
        options,
        Box::new(move |_cc| {
            Box::new(MkaiApp {
                state: AppState::new(SessionController::new(session, Arc::new(api))),
            })
        }),
    )
}

struct MkaiApp {
    state: AppState,
}

impl eframe::App for MkaiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let s = &mut self.state;

        // Pick up finished calls (non-blocking)
        if s.controller.poll() {
            s.scroll_to_bottom = true;
        }
        // Keep polling while anything is in flight
        if s.controller.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut style = (*ctx.style()).clone();
        style.visuals = egui::Visuals::dark();
        style.visuals.panel_fill = palette::BG_PRIMARY;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        ctx.set_style(style);

        egui::SidePanel::right("sidebar")
            .resizable(false)
            .min_width(240.0)
            .max_width(280.0)
            .frame(
                egui::Frame::none()
                    .fill(palette::BG_SECONDARY)
                    .inner_margin(egui::Margin::same(16.0)),
            )
            .show(ctx, |ui| render_sidebar(s, ui));

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(palette::BG_PRIMARY)
                    .inner_margin(egui::Margin::symmetric(24.0, 20.0)),
            )
            .show(ctx, |ui| render_chat(s, ui));
    }
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(10.0)
            .strong()
            .color(palette::TEXT_MUTED),
    );
}

fn render_chat(s: &mut AppState, ui: &mut egui::Ui) {
    ui.label(
        egui::RichText::new("MKAI")
            .size(18.0)
            .strong()
            .color(palette::TEXT_PRIMARY),
    );
    ui.add_space(8.0);

    // Input row is laid out first from the bottom so the transcript gets the rest
    egui::TopBottomPanel::bottom("input")
        .frame(egui::Frame::none().fill(palette::BG_PRIMARY))
        .show_inside(ui, |ui| {
            ui.add_space(12.0);
            egui::Frame::none()
                .fill(palette::BG_SECONDARY)
                .stroke(egui::Stroke::new(1.0, palette::BORDER))
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::symmetric(16.0, 12.0))
                .show(ui, |ui| render_input(s, ui));
        });

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in s.controller.session().entries() {
                render_message(ui, entry);
                ui.add_space(4.0);
            }
            if s.controller.is_chat_in_flight() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Thinking...").color(palette::TEXT_SECONDARY),
                    );
                });
            }
            if s.scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                s.scroll_to_bottom = false;
            }
        });
}

fn render_input(s: &mut AppState, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let can_send = !s.controller.is_chat_in_flight();
        let send_btn = egui::Button::new(
            egui::RichText::new("→").size(16.0).strong().color(egui::Color32::WHITE),
        )
        .fill(palette::HIGHLIGHT)
        .rounding(egui::Rounding::same(18.0));
        let send_clicked = ui
            .with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clicked =
                    ui.add_enabled(can_send, send_btn.min_size(egui::vec2(36.0, 36.0)));
                let field = ui.add(
                    egui::TextEdit::singleline(&mut s.input_text)
                        .hint_text("Type a message...")
                        .frame(false)
                        .desired_width(f32::INFINITY),
                );
                let enter = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if enter {
                    field.request_focus();
                }
                clicked.clicked() || enter
            })
            .inner;

        if send_clicked && s.controller.submit_message(&s.input_text) {
            s.input_text.clear();
            s.scroll_to_bottom = true;
        }
    });
}

/// Render one transcript entry as a bubble with its time underneath
fn render_message(ui: &mut egui::Ui, entry: &ConversationEntry) {
    let bubble = |ui: &mut egui::Ui, fill: egui::Color32, text_color: egui::Color32| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(560.0);
                ui.label(egui::RichText::new(entry.content()).size(13.0).color(text_color));
                ui.label(
                    egui::RichText::new(entry.time_label())
                        .size(10.0)
                        .color(palette::TEXT_MUTED),
                );
            });
    };

    if entry.is_user() {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            bubble(ui, palette::HIGHLIGHT, egui::Color32::WHITE);
        });
    } else {
        bubble(ui, palette::BG_TERTIARY, palette::TEXT_PRIMARY);
    }
}

fn stage_button(ui: &mut egui::Ui, stage: Stage, active: bool, completed: bool) -> bool {
    let (fill, text_color) = if active {
        (palette::HIGHLIGHT, egui::Color32::WHITE)
    } else if completed {
        (palette::SUCCESS, egui::Color32::WHITE)
    } else {
        (egui::Color32::TRANSPARENT, palette::TEXT_SECONDARY)
    };
    let btn = egui::Button::new(egui::RichText::new(stage.label()).size(12.0).color(text_color))
        .fill(fill)
        .rounding(egui::Rounding::same(6.0));
    ui.add_sized([ui.available_width(), 44.0], btn)
        .on_hover_text(stage.description())
        .clicked()
}

fn action_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> bool {
    let btn = egui::Button::new(
        egui::RichText::new(label)
            .size(12.0)
            .color(palette::TEXT_SECONDARY),
    )
    .fill(palette::BG_TERTIARY)
    .stroke(egui::Stroke::new(1.0, palette::BORDER))
    .rounding(egui::Rounding::same(6.0));
    ui.add_enabled_ui(enabled, |ui| ui.add_sized([ui.available_width(), 36.0], btn))
        .inner
        .clicked()
}

fn render_sidebar(s: &mut AppState, ui: &mut egui::Ui) {
    section_label(ui, "STAGES");
    let current = s.controller.session().stage();
    let completed = s.controller.session().completed_stages();
    let mut chosen = None;
    for stage in Stage::ALL {
        if stage_button(ui, stage, stage == current, completed.contains(&stage)) {
            chosen = Some(stage);
        }
    }
    if let Some(stage) = chosen {
        s.controller.set_stage(stage);
    }

    ui.add_space(12.0);
    section_label(ui, "ACTIONS");
    ui.add(
        egui::TextEdit::singleline(&mut s.search_text)
            .hint_text("Search...")
            .desired_width(f32::INFINITY),
    );

    let can_search = !s.controller.is_search_in_flight();
    if action_button(ui, "🔍  Web search", can_search) {
        s.controller.run_search(&s.search_text, false);
    }
    if action_button(ui, "📚  Scholarly articles", can_search) {
        s.controller.run_search(&s.search_text, true);
    }
    if action_button(ui, "📄  Upload PDF", !s.controller.is_extract_in_flight()) {
        let picked = rfd::FileDialog::new()
            .set_title("Choose a PDF file")
            .add_filter("PDF Files", &["pdf"])
            .pick_file();
        if let Some(path) = picked {
            s.controller.upload_document(path);
        }
    }
    if s.controller.is_search_in_flight() || s.controller.is_extract_in_flight() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new("Working...")
                    .size(11.0)
                    .color(palette::TEXT_SECONDARY),
            );
        });
    }

    ui.add_space(12.0);
    let documents = s.controller.session().documents();
    section_label(ui, &format!("DOCUMENTS: {}", documents.len()));
    for doc in documents {
        ui.label(
            egui::RichText::new(short_filename(&doc.filename))
                .size(11.0)
                .color(palette::TEXT_SECONDARY),
        )
        .on_hover_text(doc.filename.as_str());
    }

    let results = s.controller.session().search_results();
    if !results.is_empty() {
        ui.add_space(12.0);
        section_label(ui, &format!("SOURCES: {}", results.len()));
        for r in results.iter().take(SIDEBAR_SOURCE_LIMIT) {
            ui.hyperlink_to(
                egui::RichText::new(&r.domain).size(11.0),
                &r.url,
            )
            .on_hover_text(r.title.as_str());
        }
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
        ui.label(
            egui::RichText::new(format!("Session {}", s.controller.session().id()))
                .size(10.0)
                .color(palette::TEXT_MUTED),
        );
    });
}
