use std::ops::Range;

use chrono::{Datelike, Weekday};
use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, CursorIcon, Id, Painter, PointerButton, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::model::{Period, Side};
use crate::timeline::geometry::{CARD_HEIGHT, HEADER_HEIGHT, ROW_HEIGHT, ROW_LABEL_WIDTH};
use crate::timeline::router::anchor_point;
use crate::timeline::{
    Action, CardLayout, DragMode, FunnelStore, GridCell, RouteViewport, Selection, Timeline,
};
use crate::ui::theme;

/// What the view asks of the app this frame.
#[derive(Debug, Default)]
pub struct TimelineResponse {
    pub actions: Vec<Action>,
    /// Open the delivery editor on this item.
    pub open_editor: Option<Uuid>,
}

/// Where a context menu was opened, remembered while it stays open.
#[derive(Debug, Clone, Copy, Default)]
struct ContextTarget {
    connection: Option<Uuid>,
    cell: Option<GridCell>,
}

fn context_id() -> Id {
    Id::new("timeline-context-target")
}

/// Render the scheduling grid (central panel).
pub fn show_timeline<S: FunnelStore>(
    timeline: &Timeline<S>,
    periods: &[Period],
    ui: &mut Ui,
) -> TimelineResponse {
    let mut out = TimelineResponse::default();
    let geometry = timeline.geometry();

    // Ctrl+scroll / pinch zoom changes the column width
    if ui.rect_contains_pointer(ui.max_rect()) {
        let zoom = ui.input(|i| i.zoom_delta());
        if (zoom - 1.0).abs() > f32::EPSILON {
            out.actions
                .push(Action::SetColumnWidth(geometry.column_width() * zoom));
        }
    }

    if timeline.axis().is_empty() || timeline.segments().is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("Nothing to schedule: the date range is empty or there are no segments")
                    .color(theme::TEXT_DIM),
            );
        });
        return out;
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show_viewport(ui, |ui, viewport_rect| {
            let content = geometry.content_size();
            let (response, painter) = ui.allocate_painter(
                content.max(viewport_rect.size()),
                Sense::click(),
            );
            let origin = response.rect.min;
            let grid_origin = origin + Vec2::new(ROW_LABEL_WIDTH, HEADER_HEIGHT);
            let grid_rect = Rect::from_min_size(grid_origin, geometry.grid_size());
            let visible = painter.clip_rect();

            let viewport = RouteViewport {
                origin: origin + viewport_rect.min.to_vec2(),
                scroll_offset: viewport_rect.min.to_vec2(),
                size: viewport_rect.size(),
            };
            if viewport != timeline.route_cache().viewport() {
                out.actions.push(Action::ViewportChanged(viewport));
                ui.ctx().request_repaint();
            }

            // Global pointer routing while a drag session holds the capture
            let captured = timeline.pointer_captured();
            if captured {
                let (latest, released) = ui.input(|i| {
                    (
                        i.pointer.latest_pos(),
                        i.pointer.any_released() || !i.pointer.primary_down(),
                    )
                });
                if let Some(pos) = latest {
                    out.actions.push(Action::UpdateDragPreview {
                        pointer: to_grid(pos, grid_origin),
                    });
                }
                if released {
                    out.actions.push(Action::CommitDrag);
                }
                if let Some(session) = timeline.drag() {
                    ui.ctx().set_cursor_icon(match session.mode() {
                        DragMode::Move => CursorIcon::Grabbing,
                        DragMode::ResizeEnd => CursorIcon::ResizeHorizontal,
                        DragMode::ResizeRow => CursorIcon::ResizeVertical,
                    });
                }
            }

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            let columns = visible_columns(timeline, grid_origin, visible);
            draw_rows(&painter, timeline, origin, response.rect.width());
            draw_columns(&painter, timeline, grid_origin, grid_rect, columns.clone());
            draw_base_band(&painter, timeline, grid_origin, grid_rect);
            draw_today_line(&painter, timeline, grid_origin, grid_rect);

            let hover_cell = response
                .hover_pos()
                .filter(|p| grid_rect.contains(*p) && !captured)
                .and_then(|p| geometry.point_to_grid(to_grid(p, grid_origin)));
            if let Some(cell) = hover_cell {
                let cell_rect = geometry
                    .rect_for(&crate::timeline::GridSpan::cell(cell.date_index, cell.segment_index))
                    .translate(grid_origin.to_vec2());
                painter.rect_filled(cell_rect, 0.0, theme::BG_CELL_HOVER);
            }

            // ── Cards ───────────────────────────────────────────────
            let grid_painter = painter.with_clip_rect(visible.intersect(grid_rect));
            let layout = timeline.layout();
            let mut over_card = false;
            for card in &layout {
                over_card |= show_card(ui, &grid_painter, timeline, card, grid_origin, captured, &mut out);
            }

            // ── Connectors ──────────────────────────────────────────
            let cached = timeline.route_cache().viewport();
            let shift = viewport.to_screen(Pos2::ZERO) - cached.to_screen(Pos2::ZERO);
            draw_connectors(&grid_painter, timeline, shift);
            draw_pending(&grid_painter, ui, timeline, &layout, grid_origin);

            // ── Header and gutter ───────────────────────────────────
            draw_header(&painter, timeline, periods, origin, grid_origin, columns);
            draw_gutter(&painter, timeline, origin);

            // ── Background interaction ──────────────────────────────
            let pointer_in_grid = response
                .interact_pointer_pos()
                .filter(|p| grid_rect.contains(*p));
            let hit_connection = pointer_in_grid.and_then(|p| {
                timeline
                    .route_cache()
                    .hit_test(p - shift, theme::CONNECTOR_HIT_TOLERANCE)
            });

            if !captured && !over_card {
                if response.double_clicked() {
                    if let Some(cell) =
                        pointer_in_grid.and_then(|p| geometry.point_to_grid(to_grid(p, grid_origin)))
                    {
                        out.actions.push(Action::CreateItem(cell));
                    }
                } else if response.clicked() {
                    match hit_connection {
                        Some(id) => out.actions.push(Action::Select(Selection::Connection(id))),
                        None => out.actions.push(Action::ClickEmpty),
                    }
                }
                if response.secondary_clicked() {
                    let target = ContextTarget {
                        connection: hit_connection,
                        cell: pointer_in_grid
                            .and_then(|p| geometry.point_to_grid(to_grid(p, grid_origin))),
                    };
                    ui.ctx().data_mut(|d| d.insert_temp(context_id(), target));
                }
            }

            response.context_menu(|ui| {
                let target = ui
                    .ctx()
                    .data_mut(|d| d.get_temp::<ContextTarget>(context_id()))
                    .unwrap_or_default();
                if let Some(id) = target.connection {
                    if ui.button(format!("{}  Delete connection", egui_phosphor::regular::TRASH)).clicked() {
                        out.actions.push(Action::DeleteConnection(id));
                        ui.close_menu();
                    }
                }
                if let Some(cell) = target.cell {
                    if ui.button(format!("{}  New delivery here", egui_phosphor::regular::PLUS)).clicked() {
                        out.actions.push(Action::CreateItem(cell));
                        ui.close_menu();
                    }
                }
                if target.connection.is_none() && target.cell.is_none() {
                    ui.label(egui::RichText::new("Nothing here").weak());
                }
            });
        });

    out
}

/// Grid-local position of a screen point.
fn to_grid(p: Pos2, grid_origin: Pos2) -> Pos2 {
    (p - grid_origin).to_pos2()
}

fn visible_columns<S: FunnelStore>(timeline: &Timeline<S>, grid_origin: Pos2, visible: Rect) -> Range<usize> {
    let width = timeline.geometry().column_width();
    let count = timeline.axis().len();
    let first = ((visible.left() - grid_origin.x) / width).floor().max(0.0) as usize;
    let last = ((visible.right() - grid_origin.x) / width).ceil().max(0.0) as usize;
    first.min(count)..last.min(count)
}

/// Outward unit vector of a card side.
fn side_normal(side: Side) -> Vec2 {
    match side {
        Side::Top => Vec2::new(0.0, -1.0),
        Side::Right => Vec2::new(1.0, 0.0),
        Side::Bottom => Vec2::new(0.0, 1.0),
        Side::Left => Vec2::new(-1.0, 0.0),
    }
}

/// Draw one card and wire up its body, handles and anchors. Returns true when
/// the pointer is over it.
fn show_card<S: FunnelStore>(
    ui: &mut Ui,
    painter: &Painter,
    timeline: &Timeline<S>,
    card: &CardLayout,
    grid_origin: Pos2,
    captured: bool,
    out: &mut TimelineResponse,
) -> bool {
    let Some(delivery) = timeline.delivery(card.item_id) else {
        return false;
    };
    let rect = card.card.translate(grid_origin.to_vec2());
    let selected = timeline.selection() == Selection::Item(card.item_id);
    let segment_color = delivery
        .primary_segment()
        .and_then(|id| timeline.segments().iter().find(|s| s.id == id))
        .map(|s| s.color)
        .unwrap_or(theme::ACCENT);
    let rounding = Rounding::same(theme::CARD_ROUNDING);

    if card.dragging {
        painter.rect_stroke(
            card.cells.translate(grid_origin.to_vec2()).shrink(1.0),
            Rounding::same(2.0),
            Stroke::new(1.0, theme::PREVIEW_OUTLINE),
        );
    }

    // Soft shadow
    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, theme::card_fill(delivery.kind.color(), card.dragging));
    // Segment stripe
    let stripe = Rect::from_min_size(rect.min, Vec2::new(4.0, rect.height()));
    painter.rect_filled(
        stripe,
        Rounding {
            nw: theme::CARD_ROUNDING,
            sw: theme::CARD_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        segment_color,
    );
    if selected {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::CARD_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(
            format!("{} {}", delivery.kind.icon(), delivery.title),
            theme::font_card(),
            theme::TEXT_ON_CARD,
        );
        let text_y = rect.top() + (CARD_HEIGHT - galley.size().y) / 2.0;
        painter
            .with_clip_rect(rect.intersect(painter.clip_rect()))
            .galley(Pos2::new(rect.left() + 8.0, text_y), galley, Color32::TRANSPARENT);
    }

    // ── Interaction ─────────────────────────────────────────────
    let body = ui.interact(rect, Id::new(("card", card.item_id)), Sense::click_and_drag());
    let right_handle = Rect::from_min_max(
        Pos2::new(rect.right() - theme::HANDLE_WIDTH, rect.top()),
        rect.max,
    );
    let bottom_handle = Rect::from_min_max(
        Pos2::new(rect.left(), rect.bottom() - theme::HANDLE_WIDTH * 0.8),
        rect.max,
    );
    let right = ui.interact(right_handle, Id::new(("card-resize-end", card.item_id)), Sense::drag());
    let bottom = ui.interact(bottom_handle, Id::new(("card-resize-row", card.item_id)), Sense::drag());

    let press = ui.input(|i| i.pointer.press_origin());
    let begin = |mode: DragMode, response: &egui::Response| {
        press
            .or(response.interact_pointer_pos())
            .map(|p| Action::BeginDrag {
                item_id: card.item_id,
                mode,
                pointer: to_grid(p, grid_origin),
            })
    };
    if !captured {
        let started = if right.drag_started_by(PointerButton::Primary) {
            begin(DragMode::ResizeEnd, &right)
        } else if bottom.drag_started_by(PointerButton::Primary) {
            begin(DragMode::ResizeRow, &bottom)
        } else if body.drag_started_by(PointerButton::Primary) {
            begin(DragMode::Move, &body)
        } else {
            None
        };
        out.actions.extend(started);
    }

    if body.double_clicked() {
        out.open_editor = Some(card.item_id);
    } else if body.clicked() {
        out.actions.push(Action::Select(Selection::Item(card.item_id)));
    }

    let hovered = body.hovered() || right.hovered() || bottom.hovered();
    if !captured {
        if right.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        } else if bottom.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
        } else if body.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }
    }

    if (selected || hovered) && !card.dragging {
        let handle_h = rect.height().min(CARD_HEIGHT) * 0.55;
        let rh = Rect::from_min_size(
            Pos2::new(rect.right() - 3.5, rect.top() + (CARD_HEIGHT - handle_h) / 2.0),
            Vec2::new(3.0, handle_h),
        );
        let bh = Rect::from_center_size(
            Pos2::new(rect.center().x, rect.bottom() - 2.0),
            Vec2::new(18.0, 3.0),
        );
        painter.rect_filled(rh, Rounding::same(1.5), theme::HANDLE_COLOR);
        painter.rect_filled(bh, Rounding::same(1.5), theme::HANDLE_COLOR);
    }

    body.context_menu(|ui| {
        if ui.button(format!("{}  Edit…", egui_phosphor::regular::PENCIL_SIMPLE)).clicked() {
            out.open_editor = Some(card.item_id);
            ui.close_menu();
        }
        if ui.button(format!("{}  Delete", egui_phosphor::regular::TRASH)).clicked() {
            out.actions.push(Action::DeleteItem(card.item_id));
            ui.close_menu();
        }
    });

    // ── Anchors ─────────────────────────────────────────────────
    let pending = timeline.pending();
    let mut anchor_hovered = false;
    for side in Side::ALL {
        let point = anchor_point(rect, side);
        let hit = Rect::from_center_size(
            point + side_normal(side) * theme::ANCHOR_RADIUS,
            Vec2::splat(theme::ANCHOR_HIT_RADIUS * 2.0),
        );
        let anchor = ui.interact(hit, Id::new(("card-anchor", card.item_id, side)), Sense::click());
        anchor_hovered |= anchor.hovered();
        if anchor.clicked() && !captured {
            out.actions.push(Action::ClickAnchor {
                item_id: card.item_id,
                side,
            });
        }
        let is_pending = pending.is_some_and(|p| p.item_id == card.item_id && p.side == side);
        let show = is_pending || hovered || anchor.hovered() || selected || pending.is_some();
        if show && !card.dragging {
            let color = if is_pending {
                theme::ANCHOR_PENDING
            } else {
                theme::ANCHOR_IDLE
            };
            let radius = if anchor.hovered() {
                theme::ANCHOR_RADIUS + 1.5
            } else {
                theme::ANCHOR_RADIUS
            };
            painter.circle_filled(point, radius, color);
            painter.circle_stroke(point, radius, Stroke::new(1.0, theme::BG_DARK));
        }
        if anchor.hovered() && !captured {
            ui.ctx().set_cursor_icon(CursorIcon::Crosshair);
        }
    }

    if body.hovered() && !captured && !anchor_hovered {
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            Id::new(("card-tip", card.item_id)),
            |ui| {
                ui.strong(&delivery.title);
                ui.label(format!(
                    "{} → {}",
                    delivery.start_date.format("%d/%m/%Y"),
                    delivery.end_date.format("%d/%m/%Y"),
                ));
                let names: Vec<&str> = delivery
                    .segment_ids
                    .iter()
                    .filter_map(|id| timeline.segments().iter().find(|s| s.id == *id))
                    .map(|s| s.name.as_str())
                    .collect();
                ui.label(names.join(", "));
            },
        );
    }

    hovered || anchor_hovered
}

fn draw_connectors<S: FunnelStore>(painter: &Painter, timeline: &Timeline<S>, shift: Vec2) {
    for route in timeline.routes() {
        let path = route.path.translate(shift);
        let selected = timeline.selection() == Selection::Connection(route.connection_id);
        let color = if selected {
            theme::CONNECTOR_SELECTED
        } else {
            theme::CONNECTOR
        };
        let width = if selected {
            theme::CONNECTOR_WIDTH + 1.0
        } else {
            theme::CONNECTOR_WIDTH
        };
        painter.add(CubicBezierShape::from_points_stroke(
            path.points(),
            false,
            Color32::TRANSPARENT,
            Stroke::new(width, color),
        ));

        // Arrowhead
        let dir = path.end_direction();
        let normal = Vec2::new(-dir.y, dir.x);
        let tip = path.to;
        let base = tip - dir * theme::ARROW_SIZE;
        painter.add(egui::Shape::convex_polygon(
            vec![
                tip,
                base + normal * theme::ARROW_SIZE * 0.5,
                base - normal * theme::ARROW_SIZE * 0.5,
            ],
            color,
            Stroke::NONE,
        ));

        if let Some(label) = route.label.as_deref().filter(|l| !l.is_empty()) {
            let galley = painter.layout_no_wrap(label.to_string(), theme::font_small(), theme::TEXT_PRIMARY);
            let bg = Rect::from_center_size(path.midpoint(), galley.size() + Vec2::new(10.0, 4.0));
            painter.rect_filled(bg, Rounding::same(6.0), theme::BG_HEADER);
            painter.rect_stroke(bg, Rounding::same(6.0), Stroke::new(1.0, color));
            painter.galley(bg.min + Vec2::new(5.0, 2.0), galley, Color32::TRANSPARENT);
        }
    }
}

/// Dashed line from the pending anchor to the pointer.
fn draw_pending<S: FunnelStore>(
    painter: &Painter,
    ui: &Ui,
    timeline: &Timeline<S>,
    layout: &[CardLayout],
    grid_origin: Pos2,
) {
    let Some(pending) = timeline.pending() else {
        return;
    };
    let Some(card) = layout.iter().find(|c| c.item_id == pending.item_id) else {
        return;
    };
    let from = anchor_point(card.card.translate(grid_origin.to_vec2()), pending.side);
    if let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) {
        painter.extend(egui::Shape::dashed_line(
            &[from, pointer],
            Stroke::new(1.2, theme::ANCHOR_PENDING),
            6.0,
            4.0,
        ));
    }
}

fn draw_rows<S: FunnelStore>(painter: &Painter, timeline: &Timeline<S>, origin: Pos2, width: f32) {
    for (i, _segment) in timeline.segments().iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT;
        let row = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT));
        if i % 2 == 1 {
            painter.rect_filled(row, 0.0, theme::BG_ROW_ODD);
        }
        painter.line_segment(
            [row.left_bottom(), row.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_columns<S: FunnelStore>(
    painter: &Painter,
    timeline: &Timeline<S>,
    grid_origin: Pos2,
    grid_rect: Rect,
    columns: Range<usize>,
) {
    let width = timeline.geometry().column_width();
    for index in columns {
        let Some(date) = timeline.axis().date(index) else {
            continue;
        };
        let x = grid_origin.x + index as f32 * width;
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, grid_rect.top()), Pos2::new(x + width, grid_rect.bottom())),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        painter.line_segment(
            [Pos2::new(x, grid_rect.top()), Pos2::new(x, grid_rect.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

/// Translucent column band over the base-date window.
fn draw_base_band<S: FunnelStore>(painter: &Painter, timeline: &Timeline<S>, grid_origin: Pos2, grid_rect: Rect) {
    let Some((start, end)) = timeline.base_band() else {
        return;
    };
    let width = timeline.geometry().column_width();
    let band = Rect::from_min_max(
        Pos2::new(grid_origin.x + start as f32 * width, grid_rect.top()),
        Pos2::new(grid_origin.x + (end + 1) as f32 * width, grid_rect.bottom()),
    );
    painter.rect_filled(band, 0.0, theme::TODAY_LINE.gamma_multiply(0.08));
}

fn draw_today_line<S: FunnelStore>(painter: &Painter, timeline: &Timeline<S>, grid_origin: Pos2, grid_rect: Rect) {
    let today = chrono::Local::now().date_naive();
    let Some(index) = timeline.axis().index_of(today) else {
        return;
    };
    let width = timeline.geometry().column_width();
    let x = grid_origin.x + (index as f32 + 0.5) * width;
    painter.line_segment(
        [Pos2::new(x, grid_rect.top()), Pos2::new(x, grid_rect.bottom())],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
}

fn draw_header<S: FunnelStore>(
    painter: &Painter,
    timeline: &Timeline<S>,
    periods: &[Period],
    origin: Pos2,
    grid_origin: Pos2,
    columns: Range<usize>,
) {
    let width = timeline.geometry().column_width();
    let header = Rect::from_min_size(
        Pos2::new(grid_origin.x, origin.y),
        Vec2::new(timeline.geometry().grid_size().x, HEADER_HEIGHT),
    );
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    // Period bands along the top edge
    for period in periods {
        let Some((start, end)) = timeline.axis().index_range(period.start_date, period.end_date) else {
            continue;
        };
        let band = Rect::from_min_max(
            Pos2::new(grid_origin.x + start as f32 * width + 1.0, origin.y + 2.0),
            Pos2::new(grid_origin.x + (end + 1) as f32 * width - 1.0, origin.y + 2.0 + theme::PERIOD_BAND_HEIGHT),
        );
        painter.rect_filled(band, Rounding::same(3.0), period.color.gamma_multiply(0.35));
        painter.with_clip_rect(band.intersect(painter.clip_rect())).text(
            band.left_center() + Vec2::new(4.0, 0.0),
            Align2::LEFT_CENTER,
            &period.name,
            theme::font_small(),
            theme::TEXT_PRIMARY,
        );
    }

    let first = columns.start;
    for index in columns {
        let Some(date) = timeline.axis().date(index) else {
            continue;
        };
        let x = grid_origin.x + index as f32 * width;
        painter.line_segment(
            [Pos2::new(x, origin.y + theme::PERIOD_BAND_HEIGHT + 4.0), Pos2::new(x, header.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        if date.day() == 1 || index == first {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 29.0),
                Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }
        if let Some(day) = timeline.base_day_number(index) {
            painter.text(
                Pos2::new(x + width - 4.0, origin.y + 29.0),
                Align2::RIGHT_CENTER,
                format!("Day {day}"),
                theme::font_small(),
                theme::TODAY_LINE,
            );
        }
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        painter.text(
            Pos2::new(x + 4.0, origin.y + 46.0),
            Align2::LEFT_CENTER,
            date.format("%a %d").to_string(),
            theme::font_sub(),
            if weekend { theme::TEXT_DIM } else { theme::TEXT_SECONDARY },
        );
    }
}

fn draw_gutter<S: FunnelStore>(painter: &Painter, timeline: &Timeline<S>, origin: Pos2) {
    let corner = Rect::from_min_size(origin, Vec2::new(ROW_LABEL_WIDTH, HEADER_HEIGHT));
    painter.rect_filled(corner, 0.0, theme::BG_HEADER);
    painter.text(
        corner.left_bottom() + Vec2::new(10.0, -12.0),
        Align2::LEFT_CENTER,
        "Segments",
        theme::font_sub(),
        theme::TEXT_DIM,
    );

    for (i, segment) in timeline.segments().iter().enumerate() {
        let row = Rect::from_min_size(
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT),
            Vec2::new(ROW_LABEL_WIDTH, ROW_HEIGHT),
        );
        painter.rect_filled(row, 0.0, theme::BG_PANEL);
        painter.circle_filled(Pos2::new(row.left() + 14.0, row.center().y), 5.0, segment.color);
        painter.with_clip_rect(row.intersect(painter.clip_rect())).text(
            Pos2::new(row.left() + 26.0, row.center().y),
            Align2::LEFT_CENTER,
            &segment.name,
            theme::font_card(),
            theme::TEXT_PRIMARY,
        );
        painter.line_segment(
            [row.left_bottom(), row.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
    painter.line_segment(
        [
            Pos2::new(origin.x + ROW_LABEL_WIDTH, origin.y),
            Pos2::new(
                origin.x + ROW_LABEL_WIDTH,
                origin.y + HEADER_HEIGHT + timeline.geometry().grid_size().y,
            ),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_normals_point_outward() {
        let card = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(40.0, 20.0));
        for side in Side::ALL {
            let outside = anchor_point(card, side) + side_normal(side) * 2.0;
            assert!(!card.contains(outside), "{side:?}");
        }
    }

    #[test]
    fn screen_to_grid() {
        let p = to_grid(Pos2::new(250.0, 130.0), Pos2::new(140.0, 58.0));
        assert_eq!(p, Pos2::new(110.0, 72.0));
    }
}
