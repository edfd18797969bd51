//! Pointer-driven move / resize of a single card.
//!
//! A [`DragSession`] lives from pointer-down to pointer-up. While it exists the
//! item itself is untouched; the session only carries a preview span that
//! rendering and connector routing read. The session holds a
//! [`PointerCapture`], so global pointer routing is installed exactly while a
//! session exists and removed whichever way the session ends.

use std::cell::Cell;
use std::rc::Rc;

use egui::Pos2;
use uuid::Uuid;

use super::geometry::{GridGeometry, GridSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Body drag: shift the whole span on both axes.
    Move,
    /// Trailing edge: only `end_index` moves.
    ResizeEnd,
    /// Bottom edge: only `segment_end` moves.
    ResizeRow,
}

/// Shared count of live pointer captures.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    active: Rc<Cell<usize>>,
}

impl CaptureRegistry {
    pub fn acquire(&self) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        log::trace!("pointer capture installed ({} active)", self.active.get());
        PointerCapture {
            active: Rc::clone(&self.active),
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Global pointer routing for one drag session. Released on drop.
#[derive(Debug)]
pub struct PointerCapture {
    active: Rc<Cell<usize>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        log::trace!("pointer capture released ({} active)", self.active.get());
    }
}

#[derive(Debug)]
pub struct DragSession {
    item_id: Uuid,
    mode: DragMode,
    anchor: Pos2,
    origin: GridSpan,
    preview: GridSpan,
    _capture: PointerCapture,
}

impl DragSession {
    pub fn begin(
        item_id: Uuid,
        mode: DragMode,
        anchor: Pos2,
        origin: GridSpan,
        capture: PointerCapture,
    ) -> Self {
        Self {
            item_id,
            mode,
            anchor,
            origin,
            preview: origin,
            _capture: capture,
        }
    }

    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn origin(&self) -> GridSpan {
        self.origin
    }

    pub fn preview(&self) -> GridSpan {
        self.preview
    }

    /// Recompute the preview from the pointer's total travel since
    /// pointer-down. Returns true when the preview changed.
    pub fn update(&mut self, pointer: Pos2, geometry: &GridGeometry) -> bool {
        let (Some(last_date), Some(last_segment)) =
            (geometry.last_date_index(), geometry.last_segment_index())
        else {
            return false;
        };
        let delta = pointer - self.anchor;
        let next = shifted_span(
            self.mode,
            self.origin,
            geometry.column_shift(delta.x),
            geometry.row_shift(delta.y),
            last_date,
            last_segment,
        );
        let changed = next != self.preview;
        self.preview = next;
        changed
    }

    /// Pull origin and preview back inside axes that shrank underneath the
    /// session. Returns false when an axis is now empty and the session
    /// cannot continue.
    pub fn reclamp(&mut self, geometry: &GridGeometry) -> bool {
        let (Some(last_date), Some(last_segment)) =
            (geometry.last_date_index(), geometry.last_segment_index())
        else {
            return false;
        };
        self.origin = shifted_span(DragMode::Move, self.origin, 0, 0, last_date, last_segment);
        self.preview = shifted_span(DragMode::Move, self.preview, 0, 0, last_date, last_segment);
        true
    }

    /// End the session, releasing the pointer capture. Returns the item, the
    /// span it started from and the span it ends on.
    pub fn finish(self) -> (Uuid, GridSpan, GridSpan) {
        (self.item_id, self.origin, self.preview)
    }
}

/// The span that results from dragging `origin` by whole cells.
pub fn shifted_span(
    mode: DragMode,
    origin: GridSpan,
    shift_columns: i64,
    shift_rows: i64,
    last_date: usize,
    last_segment: usize,
) -> GridSpan {
    match mode {
        DragMode::Move => {
            let (start_index, end_index) =
                shift_window(origin.start_index, origin.end_index, shift_columns, last_date);
            let (segment_start, segment_end) =
                shift_window(origin.segment_start, origin.segment_end, shift_rows, last_segment);
            GridSpan {
                start_index,
                end_index,
                segment_start,
                segment_end,
            }
        }
        DragMode::ResizeEnd => {
            let start_index = origin.start_index.min(last_date);
            GridSpan {
                start_index,
                end_index: clamp_shift(origin.end_index, shift_columns, start_index, last_date),
                ..origin
            }
        }
        DragMode::ResizeRow => {
            let segment_start = origin.segment_start.min(last_segment);
            GridSpan {
                segment_start,
                segment_end: clamp_shift(origin.segment_end, shift_rows, segment_start, last_segment),
                ..origin
            }
        }
    }
}

/// Shift `start..=end` by `shift` and slide it back inside `0..=last`
/// keeping its length. A window longer than the axis is cut to the axis.
fn shift_window(start: usize, end: usize, shift: i64, last: usize) -> (usize, usize) {
    let len = end.saturating_sub(start);
    if len >= last {
        return (0, last);
    }
    let max_start = (last - len) as i64;
    let new_start = (start as i64 + shift).clamp(0, max_start) as usize;
    (new_start, new_start + len)
}

fn clamp_shift(value: usize, shift: i64, min: usize, max: usize) -> usize {
    (value as i64 + shift).clamp(min as i64, max as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start_index: usize, end_index: usize, segment_start: usize, segment_end: usize) -> GridSpan {
        GridSpan {
            start_index,
            end_index,
            segment_start,
            segment_end,
        }
    }

    #[test]
    fn move_shifts_both_axes() {
        let moved = shifted_span(DragMode::Move, span(0, 1, 0, 0), 2, 1, 4, 2);
        assert_eq!(moved, span(2, 3, 1, 1));
    }

    #[test]
    fn move_keeps_span_at_boundaries() {
        assert_eq!(shifted_span(DragMode::Move, span(2, 3, 1, 2), 10, 10, 4, 2), span(3, 4, 1, 2));
        assert_eq!(shifted_span(DragMode::Move, span(2, 3, 1, 2), -10, -10, 4, 2), span(0, 1, 0, 1));
    }

    #[test]
    fn move_window_wider_than_axis_is_cut() {
        assert_eq!(shifted_span(DragMode::Move, span(0, 9, 0, 0), 1, 0, 4, 0), span(0, 4, 0, 0));
    }

    #[test]
    fn resize_end_pins_start() {
        assert_eq!(shifted_span(DragMode::ResizeEnd, span(1, 1, 0, 0), 3, 5, 4, 2), span(1, 4, 0, 0));
        assert_eq!(shifted_span(DragMode::ResizeEnd, span(1, 3, 0, 0), -9, 0, 4, 2), span(1, 1, 0, 0));
    }

    #[test]
    fn resize_row_pins_segment_start() {
        assert_eq!(shifted_span(DragMode::ResizeRow, span(1, 2, 1, 1), 4, 1, 4, 2), span(1, 2, 1, 2));
        assert_eq!(shifted_span(DragMode::ResizeRow, span(1, 2, 1, 2), 0, -3, 4, 2), span(1, 2, 1, 1));
    }

    #[test]
    fn capture_released_when_session_dropped() {
        let registry = CaptureRegistry::default();
        let session = DragSession::begin(
            Uuid::new_v4(),
            DragMode::Move,
            Pos2::ZERO,
            span(0, 0, 0, 0),
            registry.acquire(),
        );
        assert_eq!(registry.active(), 1);
        drop(session);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn session_preview_follows_pointer_without_touching_origin() {
        let mut geometry = GridGeometry::new(100.0);
        geometry.set_axes(5, 3);
        let registry = CaptureRegistry::default();
        let mut session = DragSession::begin(
            Uuid::new_v4(),
            DragMode::Move,
            Pos2::new(50.0, 10.0),
            span(0, 0, 0, 0),
            registry.acquire(),
        );
        assert!(session.update(Pos2::new(250.0, 10.0), &geometry));
        assert_eq!(session.preview(), span(2, 2, 0, 0));
        assert_eq!(session.origin(), span(0, 0, 0, 0));
        assert!(!session.update(Pos2::new(260.0, 12.0), &geometry));

        let (_, origin, final_span) = session.finish();
        assert_eq!(origin, span(0, 0, 0, 0));
        assert_eq!(final_span, span(2, 2, 0, 0));
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn reclamp_after_axis_shrinks() {
        let mut geometry = GridGeometry::new(100.0);
        geometry.set_axes(10, 3);
        let registry = CaptureRegistry::default();
        let mut session = DragSession::begin(
            Uuid::new_v4(),
            DragMode::Move,
            Pos2::ZERO,
            span(6, 8, 2, 2),
            registry.acquire(),
        );
        geometry.set_axes(5, 2);
        assert!(session.reclamp(&geometry));
        assert_eq!(session.preview(), span(2, 4, 1, 1));

        geometry.set_axes(0, 2);
        assert!(!session.reclamp(&geometry));
    }
}
