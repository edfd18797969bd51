use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(17, 22, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(24, 30, 42);
pub const BG_HEADER: Color32 = Color32::from_rgb(30, 38, 52);
pub const BG_FIELD: Color32 = Color32::from_rgb(14, 18, 27);
pub const BG_WIDGET: Color32 = Color32::from_rgb(38, 46, 62);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(48, 58, 77);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(58, 69, 90);
pub const BG_ROW_ODD: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 6);
pub const BG_CELL_HOVER: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 12);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(14, 120, 170, 50);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 30);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(45, 55, 72);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(56, 189, 248);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 163, 184);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 116, 139);
pub const TEXT_ON_CARD: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(14, 165, 233);
pub const TODAY_LINE: Color32 = Color32::from_rgb(244, 63, 94);
pub const GRID_LINE: Color32 = Color32::from_rgb(39, 48, 64);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);

pub const CONNECTOR: Color32 = Color32::from_rgb(148, 163, 184);
pub const CONNECTOR_SELECTED: Color32 = Color32::from_rgb(56, 189, 248);
pub const ANCHOR_IDLE: Color32 = Color32::from_rgb(203, 213, 225);
pub const ANCHOR_PENDING: Color32 = Color32::from_rgb(250, 204, 21);
pub const PREVIEW_OUTLINE: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 90);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HANDLE_WIDTH: f32 = 7.0;
pub const CARD_ROUNDING: f32 = 5.0;
pub const ANCHOR_RADIUS: f32 = 4.0;
pub const ANCHOR_HIT_RADIUS: f32 = 8.0;
pub const CONNECTOR_WIDTH: f32 = 1.6;
pub const CONNECTOR_HIT_TOLERANCE: f32 = 6.0;
pub const ARROW_SIZE: f32 = 7.0;
pub const PERIOD_BAND_HEIGHT: f32 = 16.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const SIDE_PANEL_WIDTH: f32 = 220.0;
pub const DIALOG_WIDTH: f32 = 380.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_card() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

const WIDGET_ROUNDING: f32 = 4.0;

fn style_widget(w: &mut WidgetVisuals, fill: Color32, border: Color32, text: Stroke) {
    w.bg_fill = fill;
    w.weak_bg_fill = fill;
    w.bg_stroke = Stroke::new(1.0, border);
    w.fg_stroke = text;
    w.rounding = Rounding::same(WIDGET_ROUNDING);
}

/// Install the dark slate palette on the context.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.faint_bg_color = BG_PANEL;
    visuals.striped = false;

    let text = Stroke::new(1.0, TEXT_PRIMARY);
    let w = &mut visuals.widgets;
    style_widget(&mut w.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    style_widget(&mut w.inactive, BG_WIDGET, BORDER_SUBTLE, text);
    style_widget(&mut w.hovered, BG_WIDGET_HOVER, ACCENT, text);
    style_widget(&mut w.active, BG_WIDGET_ACTIVE, ACCENT, Stroke::new(2.0, Color32::WHITE));
    style_widget(&mut w.open, BG_WIDGET_HOVER, ACCENT, text);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(CARD_ROUNDING + 3.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

/// Card fill for a segment or kind colour, dimmed while being dragged.
pub fn card_fill(base: Color32, dragging: bool) -> Color32 {
    if dragging {
        base.gamma_multiply(0.75)
    } else {
        base
    }
}
