//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Layout and content of the end-of-match banner for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct BannerUiContext<'a> {
    /// Top-left corner of the banner in screen coordinates.
    pub(crate) origin: Vec2,
    /// Banner dimensions in screen space.
    pub(crate) size: Vec2,
    pub(crate) background: Color,
    pub(crate) title: &'a str,
    pub(crate) message: &'a str,
}

/// Outcome of drawing the banner window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BannerUiResult {
    /// Whether the "New match" button was pressed during this frame.
    pub(crate) restart_pressed: bool,
}

/// Renders the end-of-match banner with a restart button.
pub(crate) fn draw_banner_ui(ui: &mut Ui, context: BannerUiContext<'_>) -> BannerUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(8.0, 8.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut restart_pressed = false;
    let _ = ui.window(hash!("match_banner"), context.origin, context.size, |ui| {
        ui.label(None, context.title);
        ui.label(None, context.message);
        ui.label(None, "Press R or use the button below.");
        restart_pressed = ui.button(None, "New match");
    });

    ui.pop_skin();

    BannerUiResult { restart_pressed }
}
