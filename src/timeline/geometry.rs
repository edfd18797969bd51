//! Mapping between grid coordinates (date column, segment row) and pixel
//! rectangles. All rectangles are grid-local: (0, 0) is the top-left corner
//! of the first date cell, to the right of the segment gutter and below the
//! date header.

use egui::{Pos2, Rect, Vec2};

pub const MIN_COLUMN_WIDTH: f32 = 80.0;
pub const MAX_COLUMN_WIDTH: f32 = 220.0;
pub const DEFAULT_COLUMN_WIDTH: f32 = 120.0;
pub const COLUMN_WIDTH_STEP: f32 = 20.0;

pub const ROW_HEIGHT: f32 = 72.0;
/// Width of the segment-label gutter left of the grid.
pub const ROW_LABEL_WIDTH: f32 = 140.0;
/// Height of the period bands plus the date header above the grid.
pub const HEADER_HEIGHT: f32 = 58.0;

pub const CARD_HEIGHT: f32 = 26.0;
pub const CARD_GAP: f32 = 4.0;
/// Vertical distance between two stacked cards.
pub const CARD_PITCH: f32 = CARD_HEIGHT + CARD_GAP;
pub const CARD_INSET: f32 = 4.0;
pub const MIN_CARD_WIDTH: f32 = 24.0;

/// Rectangular region of the grid an item occupies, inclusive on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    pub start_index: usize,
    pub end_index: usize,
    pub segment_start: usize,
    pub segment_end: usize,
}

impl GridSpan {
    pub fn cell(date_index: usize, segment_index: usize) -> Self {
        Self {
            start_index: date_index,
            end_index: date_index,
            segment_start: segment_index,
            segment_end: segment_index,
        }
    }

    pub fn columns(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn rows(&self) -> usize {
        self.segment_end - self.segment_start + 1
    }

    /// `(segment_start, start_index)`: the cell stacking is keyed on.
    pub fn origin(&self) -> (usize, usize) {
        (self.segment_start, self.start_index)
    }

    pub fn within(&self, last_date: usize, last_segment: usize) -> bool {
        self.start_index <= self.end_index
            && self.end_index <= last_date
            && self.segment_start <= self.segment_end
            && self.segment_end <= last_segment
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub date_index: usize,
    pub segment_index: usize,
}

#[derive(Debug, Clone)]
pub struct GridGeometry {
    column_width: f32,
    date_count: usize,
    segment_count: usize,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

impl GridGeometry {
    pub fn new(column_width: f32) -> Self {
        Self {
            column_width: clamp_column_width(column_width),
            date_count: 0,
            segment_count: 0,
        }
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn row_height(&self) -> f32 {
        ROW_HEIGHT
    }

    /// Clamp and store a new column width. Returns the stored value.
    pub fn set_column_width(&mut self, px: f32) -> f32 {
        self.column_width = clamp_column_width(px);
        self.column_width
    }

    pub fn set_axes(&mut self, date_count: usize, segment_count: usize) {
        self.date_count = date_count;
        self.segment_count = segment_count;
    }

    pub fn date_count(&self) -> usize {
        self.date_count
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn last_date_index(&self) -> Option<usize> {
        self.date_count.checked_sub(1)
    }

    pub fn last_segment_index(&self) -> Option<usize> {
        self.segment_count.checked_sub(1)
    }

    /// Size of the grid body, excluding gutter and header.
    pub fn grid_size(&self) -> Vec2 {
        Vec2::new(
            self.date_count as f32 * self.column_width,
            self.segment_count as f32 * ROW_HEIGHT,
        )
    }

    /// Size of everything that scrolls: gutter, header and grid.
    pub fn content_size(&self) -> Vec2 {
        self.grid_size() + Vec2::new(ROW_LABEL_WIDTH, HEADER_HEIGHT)
    }

    /// The cell range an item covers.
    pub fn rect_for(&self, span: &GridSpan) -> Rect {
        let left = span.start_index as f32 * self.column_width;
        let top = span.segment_start as f32 * ROW_HEIGHT;
        let width = (span.columns() as f32 * self.column_width).max(MIN_CARD_WIDTH);
        let height = span.rows() as f32 * ROW_HEIGHT;
        Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, height))
    }

    /// The visible card inside `rect_for(span)`, pushed down by its stack slot.
    pub fn card_rect(&self, span: &GridSpan, stack_index: usize) -> Rect {
        let cells = self.rect_for(span);
        let width = (cells.width() - CARD_INSET * 2.0).max(MIN_CARD_WIDTH);
        let height = CARD_HEIGHT + (span.rows() - 1) as f32 * ROW_HEIGHT;
        let top = cells.top() + CARD_INSET + super::stacking::stack_offset(stack_index);
        Rect::from_min_size(Pos2::new(cells.left() + CARD_INSET, top), Vec2::new(width, height))
    }

    /// Cell under a grid-local point, clamped onto the grid. `None` only when
    /// either axis is empty.
    pub fn point_to_grid(&self, point: Pos2) -> Option<GridCell> {
        let last_date = self.last_date_index()?;
        let last_segment = self.last_segment_index()?;
        let col = (point.x / self.column_width).floor().max(0.0) as usize;
        let row = (point.y / ROW_HEIGHT).floor().max(0.0) as usize;
        Some(GridCell {
            date_index: col.min(last_date),
            segment_index: row.min(last_segment),
        })
    }

    /// Whole columns covered by a horizontal pointer delta.
    pub fn column_shift(&self, delta_x: f32) -> i64 {
        (delta_x / self.column_width).round() as i64
    }

    /// Whole rows covered by a vertical pointer delta.
    pub fn row_shift(&self, delta_y: f32) -> i64 {
        (delta_y / ROW_HEIGHT).round() as i64
    }
}

pub fn clamp_column_width(px: f32) -> f32 {
    if px.is_finite() {
        px.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
    } else {
        DEFAULT_COLUMN_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(dates: usize, segments: usize) -> GridGeometry {
        let mut g = GridGeometry::new(100.0);
        g.set_axes(dates, segments);
        g
    }

    #[test]
    fn column_width_is_clamped() {
        let mut g = GridGeometry::new(10.0);
        assert_eq!(g.column_width(), MIN_COLUMN_WIDTH);
        assert_eq!(g.set_column_width(500.0), MAX_COLUMN_WIDTH);
        assert_eq!(g.set_column_width(f32::NAN), DEFAULT_COLUMN_WIDTH);
        assert_eq!(g.set_column_width(150.0), 150.0);
    }

    #[test]
    fn rect_covers_span() {
        let g = geometry(5, 3);
        let span = GridSpan {
            start_index: 1,
            end_index: 3,
            segment_start: 1,
            segment_end: 2,
        };
        let rect = g.rect_for(&span);
        assert_eq!(rect.left(), 100.0);
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.top(), ROW_HEIGHT);
        assert_eq!(rect.height(), ROW_HEIGHT * 2.0);
    }

    #[test]
    fn single_cell_card_is_never_narrower_than_minimum() {
        let g = geometry(5, 1);
        let card = g.card_rect(&GridSpan::cell(0, 0), 0);
        assert!(card.width() >= MIN_CARD_WIDTH);
        assert_eq!(card.height(), CARD_HEIGHT);
    }

    #[test]
    fn point_to_grid_divides_and_clamps() {
        let g = geometry(5, 3);
        let cell = g.point_to_grid(Pos2::new(250.0, ROW_HEIGHT * 1.5)).unwrap();
        assert_eq!(cell, GridCell { date_index: 2, segment_index: 1 });

        let far = g.point_to_grid(Pos2::new(9_000.0, 9_000.0)).unwrap();
        assert_eq!(far, GridCell { date_index: 4, segment_index: 2 });

        let before = g.point_to_grid(Pos2::new(-40.0, -1.0)).unwrap();
        assert_eq!(before, GridCell { date_index: 0, segment_index: 0 });

        assert!(geometry(0, 3).point_to_grid(Pos2::ZERO).is_none());
    }

    #[test]
    fn shifts_round_to_nearest_cell() {
        let g = geometry(5, 3);
        assert_eq!(g.column_shift(149.0), 1);
        assert_eq!(g.column_shift(151.0), 2);
        assert_eq!(g.column_shift(-151.0), -2);
        assert_eq!(g.row_shift(ROW_HEIGHT * 0.4), 0);
        assert_eq!(g.row_shift(ROW_HEIGHT * 0.6), 1);
    }
}
