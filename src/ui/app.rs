//! Main application for the Gomoku GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel, Vec2};

use crate::board::{Stone, CAPTURES_TO_WIN};

use super::board_view::BoardView;
use super::theme::*;
use super::{Scene, Visualizer};

/// Main Gomoku application
pub struct GomokuApp {
    view: Visualizer,
    board_view: BoardView,
    show_log: bool,
}

impl GomokuApp {
    pub fn new(view: Visualizer) -> Self {
        Self {
            view,
            board_view: BoardView::default(),
            show_log: true,
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("Quit (Esc)").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_log, "Turn Log (L)");
                });
            });
        });
    }

    /// Render the side panel with game info and the turn log
    fn render_side_panel(&self, ctx: &Context, scene: &Scene) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(320.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                Self::render_title_card(ui);
                ui.add_space(12.0);

                Self::render_turn_card(ui, scene);
                ui.add_space(10.0);

                Self::render_captures_card(ui, scene);

                if let Some(winner) = scene.winner {
                    ui.add_space(10.0);
                    Self::render_game_over_card(ui, scene, winner);
                }

                if let Some(msg) = &scene.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }

                if self.show_log {
                    ui.add_space(10.0);
                    Self::render_log_card(ui, scene);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("GOMOKU").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("Ninuki-renju").size(11.0).color(TEXT_MUTED));
        });
    }

    /// Whose turn it is and whether the window is waiting on a click
    fn render_turn_card(ui: &mut egui::Ui, scene: &Scene) {
        Self::card_frame().show(ui, |ui| {
            let (color_name, accent, ink) = match scene.current {
                Stone::Black => ("BLACK", BLACK_STONE_HIGHLIGHT, TEXT_PRIMARY),
                Stone::White => ("WHITE", WHITE_STONE, BLACK_STONE),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    scene.current.number().to_string(),
                    egui::FontId::proportional(20.0),
                    ink,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(color_name).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if scene.winner.is_some() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if scene.awaiting().is_some() {
                        ("Your turn", STATUS_READY)
                    } else {
                        ("Thinking...", STATUS_WAITING)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                    ui.label(
                        RichText::new(format!("Turn #{}", scene.turn + 1))
                            .size(11.0)
                            .color(TEXT_SECONDARY),
                    );
                });
            });
        });
    }

    fn render_captures_card(ui: &mut egui::Ui, scene: &Scene) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("CAPTURES").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);
            for stone in Stone::ALL {
                Self::render_capture_row(ui, stone, scene.captures[stone.index()]);
                ui.add_space(6.0);
            }
        });
    }

    /// One row of capture progress toward the capture win
    fn render_capture_row(ui: &mut egui::Ui, stone: Stone, captures: u32) {
        let close_to_win = captures + 2 >= CAPTURES_TO_WIN;
        ui.horizontal(|ui| {
            ui.label(RichText::new(stone.to_string()).size(13.0).color(TEXT_PRIMARY));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text = format!("{captures}/{CAPTURES_TO_WIN}");
                let text = if captures >= CAPTURES_TO_WIN {
                    RichText::new("WIN!").size(14.0).strong().color(WIN_HIGHLIGHT)
                } else if close_to_win {
                    RichText::new(text).size(14.0).strong().color(STATUS_DANGER)
                } else {
                    RichText::new(text).size(14.0).color(TEXT_SECONDARY)
                };
                ui.label(text);
            });
        });
    }

    fn render_game_over_card(ui: &mut egui::Ui, scene: &Scene, winner: Stone) {
        let how = if scene.captures[winner.index()] >= CAPTURES_TO_WIN {
            "by captures"
        } else {
            "by five in a row"
        };

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(format!("{winner} WINS!")).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.label(RichText::new(how).size(11.0).color(TEXT_SECONDARY));
                });
            });
    }

    /// Last refusal from the rules
    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_log_card(ui: &mut egui::Ui, scene: &Scene) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TURN LOG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in &scene.log {
                        ui.label(RichText::new(line).size(10.0).color(TEXT_SECONDARY));
                    }
                });
        });
    }

    /// Render the main board and forward clicks to the waiting seat
    fn render_board(&mut self, ctx: &Context, scene: &Scene) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_AREA_BG).inner_margin(10.0))
            .show(ctx, |ui| {
                if let Some(pos) = self.board_view.show(ui, scene) {
                    self.view.click(pos);
                }
            });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (toggle_log, quit) =
            ctx.input(|i| (i.key_pressed(egui::Key::L), i.key_pressed(egui::Key::Escape)));
        if toggle_log {
            self.show_log = !self.show_log;
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl eframe::App for GomokuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.view.close();
        }

        // Draw from a snapshot so the coordinator is never blocked on painting
        let scene = self.view.scene().clone();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx, &scene);
        self.render_board(ctx, &scene);
    }
}

impl Drop for GomokuApp {
    fn drop(&mut self) {
        self.view.close();
    }
}
