//! The single state object behind the schedule grid.
//!
//! Every input arrives as an [`Action`] (or the matching method) and is
//! applied synchronously. Every mutation of deliveries or connections ends in
//! [`Timeline::commit`], which records history and then hands the new state
//! to the [`FunnelStore`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use egui::{Color32, Pos2, Rect};
use uuid::Uuid;

use super::date_axis::DateAxis;
use super::drag::{CaptureRegistry, DragMode, DragSession};
use super::geometry::{GridCell, GridGeometry, GridSpan};
use super::history::HistoryLog;
use super::router::{
    AnchorClick, ConnectionRouter, PendingConnection, RouteCache, RouteViewport, RoutedConnection,
};
use super::stacking;
use super::store::FunnelStore;
use crate::model::period::band_end;
use crate::model::segment::normalize_order;
use crate::model::{Connection, Delivery, Funnel, Segment, Side};

pub const NEW_DELIVERY_TITLE: &str = "New delivery";

/// The slice of the funnel record the timeline reads.
#[derive(Debug, Clone)]
pub struct TimelineInput {
    pub segments: Vec<Segment>,
    pub deliveries: Vec<Delivery>,
    pub connections: Vec<Connection>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub base_date: NaiveDate,
    pub base_date_days: u32,
}

impl From<&Funnel> for TimelineInput {
    fn from(funnel: &Funnel) -> Self {
        Self {
            segments: funnel.segments.clone(),
            deliveries: funnel.deliveries.clone(),
            connections: funnel.connections.clone(),
            start_date: funnel.start_date,
            end_date: funnel.end_date,
            base_date: funnel.base_date,
            base_date_days: funnel.base_date_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Item(Uuid),
    Connection(Uuid),
}

/// Where one card is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub item_id: Uuid,
    pub span: GridSpan,
    /// The cell range, grid-local.
    pub cells: Rect,
    /// The card itself after stacking, grid-local.
    pub card: Rect,
    pub stack_index: usize,
    /// True while this card shows a live drag preview.
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BeginDrag {
        item_id: Uuid,
        mode: DragMode,
        pointer: Pos2,
    },
    UpdateDragPreview {
        pointer: Pos2,
    },
    CommitDrag,
    ClickAnchor {
        item_id: Uuid,
        side: Side,
    },
    ClickEmpty,
    CreateItem(GridCell),
    EditItem(Delivery),
    DeleteItem(Uuid),
    DeleteConnection(Uuid),
    Select(Selection),
    Undo,
    SetColumnWidth(f32),
    ViewportChanged(RouteViewport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    DragStarted,
    Previewed,
    Committed,
    ConnectionPending,
    ConnectionCreated(Uuid),
    /// Self-loop or duplicate; the pending anchor was dropped.
    ConnectionRejected,
    Cleared,
    ItemCreated(Uuid),
    Deleted,
    Undone,
    Selected,
    LayoutChanged,
}

pub struct Timeline<S: FunnelStore> {
    segments: Vec<Segment>,
    deliveries: Vec<Delivery>,
    connections: Vec<Connection>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    base_date: NaiveDate,
    base_date_days: u32,
    axis: DateAxis,
    geometry: GridGeometry,
    drag: Option<DragSession>,
    captures: CaptureRegistry,
    router: ConnectionRouter,
    routes: RouteCache,
    history: HistoryLog,
    selection: Selection,
    store: S,
}

impl<S: FunnelStore> Timeline<S> {
    pub fn new(input: TimelineInput, store: S, column_width: f32, history_limit: usize) -> Self {
        let mut segments = input.segments;
        normalize_order(&mut segments);
        let axis = DateAxis::build(input.start_date, input.end_date);
        let mut geometry = GridGeometry::new(column_width);
        geometry.set_axes(axis.len(), segments.len());
        let history = HistoryLog::new(&input.deliveries, &input.connections, history_limit);
        let mut routes = RouteCache::default();
        routes.invalidate();

        Self {
            segments,
            deliveries: input.deliveries,
            connections: input.connections,
            start_date: input.start_date,
            end_date: input.end_date,
            base_date: input.base_date,
            base_date_days: input.base_date_days,
            axis,
            geometry,
            drag: None,
            captures: CaptureRegistry::default(),
            router: ConnectionRouter::default(),
            routes,
            history,
            selection: Selection::None,
            store,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn delivery(&self, id: Uuid) -> Option<&Delivery> {
        self.deliveries.iter().find(|d| d.id == id)
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.end_date)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// True while a drag session owns the global pointer.
    pub fn pointer_captured(&self) -> bool {
        self.captures.active() > 0
    }

    pub fn captures(&self) -> &CaptureRegistry {
        &self.captures
    }

    pub fn pending(&self) -> Option<PendingConnection> {
        self.router.pending()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn routes(&self) -> &[RoutedConnection] {
        self.routes.routes()
    }

    pub fn route_cache(&self) -> &RouteCache {
        &self.routes
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Items can only be created when both axes have at least one entry.
    pub fn can_create(&self) -> bool {
        !self.axis.is_empty() && !self.segments.is_empty()
    }

    pub fn segment_index(&self, id: Uuid) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    /// Column range of the highlighted base-date band, if visible.
    pub fn base_band(&self) -> Option<(usize, usize)> {
        let end = band_end(self.base_date, self.base_date_days);
        self.axis.index_range(self.base_date, end)
    }

    /// 1-based day of the base-date band that column `index` falls on.
    pub fn base_day_number(&self, index: usize) -> Option<i64> {
        let (start, end) = self.base_band()?;
        if index < start || index > end {
            return None;
        }
        let date = self.axis.date(index)?;
        Some((date - self.base_date).num_days() + 1)
    }

    // ── Layout ──────────────────────────────────────────────────

    /// Grid span of a delivery's committed state. `None` when it lies off
    /// the date axis or none of its segments exist.
    pub fn resolve_span(&self, delivery: &Delivery) -> Option<GridSpan> {
        let (start_index, end_index) = self
            .axis
            .index_range(delivery.start_date, delivery.end_date)?;
        let (segment_start, segment_end) = delivery
            .segment_ids
            .iter()
            .filter_map(|id| self.segment_index(*id))
            .fold(None, |acc: Option<(usize, usize)>, row| match acc {
                None => Some((row, row)),
                Some((lo, hi)) => Some((lo.min(row), hi.max(row))),
            })?;
        Some(GridSpan {
            start_index,
            end_index,
            segment_start,
            segment_end,
        })
    }

    /// Cards in delivery order, using the live preview for the dragged one.
    pub fn layout(&self) -> Vec<CardLayout> {
        let placed: Vec<(Uuid, GridSpan, bool)> = self
            .deliveries
            .iter()
            .filter_map(|delivery| match self.drag.as_ref() {
                Some(session) if session.item_id() == delivery.id => {
                    Some((delivery.id, session.preview(), true))
                }
                _ => self.resolve_span(delivery).map(|span| (delivery.id, span, false)),
            })
            .collect();
        let spans: Vec<GridSpan> = placed.iter().map(|(_, span, _)| *span).collect();
        let slots = stacking::assign_stack_slots(&spans);

        placed
            .into_iter()
            .zip(slots)
            .map(|((item_id, span, dragging), stack_index)| CardLayout {
                item_id,
                span,
                cells: self.geometry.rect_for(&span),
                card: self.geometry.card_rect(&span, stack_index),
                stack_index,
                dragging,
            })
            .collect()
    }

    pub fn card_layout(&self, item_id: Uuid) -> Option<CardLayout> {
        self.layout().into_iter().find(|c| c.item_id == item_id)
    }

    /// Recompute connector routes if anything invalidated them since the
    /// last frame. Call once per frame.
    pub fn on_frame(&mut self) -> bool {
        if !self.routes.is_dirty() {
            return false;
        }
        let cards: HashMap<Uuid, Rect> = self
            .layout()
            .into_iter()
            .map(|c| (c.item_id, c.card))
            .collect();
        self.routes
            .on_frame(&self.connections, |id| cards.get(&id).copied())
    }

    // ── Actions ─────────────────────────────────────────────────

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::BeginDrag {
                item_id,
                mode,
                pointer,
            } => self.begin_drag(item_id, mode, pointer),
            Action::UpdateDragPreview { pointer } => self.update_drag_preview(pointer),
            Action::CommitDrag => self.commit_drag(),
            Action::ClickAnchor { item_id, side } => self.click_anchor(item_id, side),
            Action::ClickEmpty => self.click_empty(),
            Action::CreateItem(cell) => self.create_item(cell),
            Action::EditItem(delivery) => self.edit_item(delivery),
            Action::DeleteItem(id) => self.delete_item(id),
            Action::DeleteConnection(id) => self.delete_connection(id),
            Action::Select(selection) => self.select(selection),
            Action::Undo => self.undo(),
            Action::SetColumnWidth(px) => self.set_column_width(px),
            Action::ViewportChanged(viewport) => self.set_viewport(viewport),
        }
    }

    pub fn begin_drag(&mut self, item_id: Uuid, mode: DragMode, pointer: Pos2) -> Outcome {
        if self.drag.is_some() {
            log::debug!("drag already in progress; ignoring pointer-down on {item_id}");
            return Outcome::Unchanged;
        }
        let Some(origin) = self.delivery(item_id).and_then(|d| self.resolve_span(d)) else {
            return Outcome::Unchanged;
        };
        self.drag = Some(DragSession::begin(
            item_id,
            mode,
            pointer,
            origin,
            self.captures.acquire(),
        ));
        self.selection = Selection::Item(item_id);
        self.routes.invalidate();
        log::debug!("drag {mode:?} started on {item_id} at {origin:?}");
        Outcome::DragStarted
    }

    pub fn update_drag_preview(&mut self, pointer: Pos2) -> Outcome {
        let Some(session) = self.drag.as_mut() else {
            return Outcome::Unchanged;
        };
        if session.update(pointer, &self.geometry) {
            self.routes.invalidate();
            Outcome::Previewed
        } else {
            Outcome::Unchanged
        }
    }

    /// Write the preview into the item and commit. A session that never moved
    /// still commits; history drops the duplicate snapshot.
    pub fn commit_drag(&mut self) -> Outcome {
        let Some(session) = self.drag.take() else {
            return Outcome::Unchanged;
        };
        let (item_id, origin, preview) = session.finish();
        if origin != preview {
            self.apply_span(item_id, origin, preview);
        }
        log::debug!("drag committed on {item_id}: {origin:?} -> {preview:?}");
        self.commit();
        Outcome::Committed
    }

    fn apply_span(&mut self, item_id: Uuid, origin: GridSpan, span: GridSpan) {
        let (Some(start), Some(end)) = (self.axis.date(span.start_index), self.axis.date(span.end_index))
        else {
            return;
        };
        let segment_ids: Vec<Uuid> = self
            .segments
            .get(span.segment_start..=span.segment_end)
            .map(|rows| rows.iter().map(|s| s.id).collect())
            .unwrap_or_default();
        let Some(delivery) = self.deliveries.iter_mut().find(|d| d.id == item_id) else {
            return;
        };
        if span.start_index != origin.start_index {
            delivery.start_date = start;
        }
        if span.end_index != origin.end_index {
            delivery.end_date = end;
        }
        let rows_changed =
            span.segment_start != origin.segment_start || span.segment_end != origin.segment_end;
        if rows_changed && !segment_ids.is_empty() {
            delivery.segment_ids = segment_ids;
        }
    }

    pub fn click_anchor(&mut self, item_id: Uuid, side: Side) -> Outcome {
        if self.delivery(item_id).is_none() {
            self.router.clear();
            return Outcome::Unchanged;
        }
        match self.router.click_anchor(item_id, side) {
            AnchorClick::Pending(_) => Outcome::ConnectionPending,
            AnchorClick::Cleared => {
                log::debug!("connection cancelled on {item_id}");
                Outcome::ConnectionRejected
            }
            AnchorClick::Complete { from, to } => {
                let candidate = Connection::new(from.item_id, from.side, to.item_id, to.side);
                let duplicate = self.connections.iter().any(|c| c.same_route(&candidate));
                if duplicate || self.delivery(from.item_id).is_none() {
                    log::debug!("connection {from:?} -> {to:?} rejected");
                    return Outcome::ConnectionRejected;
                }
                let id = candidate.id;
                self.connections.push(candidate);
                self.selection = Selection::Connection(id);
                log::debug!("connection {id} created");
                self.commit();
                Outcome::ConnectionCreated(id)
            }
        }
    }

    pub fn click_empty(&mut self) -> Outcome {
        let had_pending = self.router.clear();
        let had_selection = self.selection != Selection::None;
        self.selection = Selection::None;
        if had_pending || had_selection {
            Outcome::Cleared
        } else {
            Outcome::Unchanged
        }
    }

    pub fn create_item(&mut self, cell: GridCell) -> Outcome {
        let (Some(last_date), Some(last_segment)) =
            (self.axis.last_index(), self.segments.len().checked_sub(1))
        else {
            log::debug!("nothing schedulable: empty date axis or no segments");
            return Outcome::Unchanged;
        };
        let Some(date) = self.axis.date(cell.date_index.min(last_date)) else {
            return Outcome::Unchanged;
        };
        let segment_id = self.segments[cell.segment_index.min(last_segment)].id;
        let delivery = Delivery::new(NEW_DELIVERY_TITLE, date, segment_id);
        let id = delivery.id;
        self.deliveries.push(delivery);
        self.selection = Selection::Item(id);
        self.commit();
        Outcome::ItemCreated(id)
    }

    /// Insert or replace a delivery from the edit dialog. Dates are pulled
    /// onto the axis and unknown segments dropped; an item left without a
    /// segment is refused.
    pub fn edit_item(&mut self, mut delivery: Delivery) -> Outcome {
        if !self.normalize_item(&mut delivery) {
            log::debug!("refusing delivery {} without schedulable dates or segments", delivery.id);
            return Outcome::Unchanged;
        }
        if self.drag.as_ref().is_some_and(|s| s.item_id() == delivery.id) {
            self.drag = None;
        }
        match self.deliveries.iter_mut().find(|d| d.id == delivery.id) {
            Some(existing) if *existing == delivery => Outcome::Unchanged,
            Some(existing) => {
                *existing = delivery;
                self.commit();
                Outcome::Committed
            }
            None => {
                let id = delivery.id;
                self.deliveries.push(delivery);
                self.selection = Selection::Item(id);
                self.commit();
                Outcome::ItemCreated(id)
            }
        }
    }

    fn normalize_item(&self, delivery: &mut Delivery) -> bool {
        let (Some(first), Some(last)) = (self.axis.first(), self.axis.last()) else {
            return false;
        };
        let mut seen = HashSet::new();
        delivery
            .segment_ids
            .retain(|id| seen.insert(*id) && self.segment_index(*id).is_some());
        if delivery.segment_ids.is_empty() {
            return false;
        }
        delivery.start_date = delivery.start_date.clamp(first, last);
        delivery.end_date = delivery.end_date.clamp(delivery.start_date, last);
        true
    }

    /// Remove a delivery and every connection touching it in one commit.
    pub fn delete_item(&mut self, item_id: Uuid) -> Outcome {
        let before = self.deliveries.len();
        self.deliveries.retain(|d| d.id != item_id);
        if self.deliveries.len() == before {
            return Outcome::Unchanged;
        }
        self.forget_items(&[item_id]);
        self.commit();
        Outcome::Deleted
    }

    pub fn delete_connection(&mut self, connection_id: Uuid) -> Outcome {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != connection_id);
        if self.connections.len() == before {
            return Outcome::Unchanged;
        }
        if self.selection == Selection::Connection(connection_id) {
            self.selection = Selection::None;
        }
        self.commit();
        Outcome::Deleted
    }

    pub fn select(&mut self, selection: Selection) -> Outcome {
        if self.selection == selection {
            return Outcome::Unchanged;
        }
        self.selection = selection;
        Outcome::Selected
    }

    /// Step the schedule back one commit. An in-flight drag is abandoned.
    pub fn undo(&mut self) -> Outcome {
        if self.drag.take().is_some() {
            log::debug!("drag abandoned by undo");
        }
        let Some(snapshot) = self.history.undo() else {
            return Outcome::Unchanged;
        };
        self.deliveries = snapshot.deliveries;
        self.connections = snapshot.connections;
        self.router.clear();
        self.prune_selection();
        self.commit();
        self.history.settle();
        log::debug!("undo -> history entry {}", self.history.pointer());
        Outcome::Undone
    }

    pub fn set_column_width(&mut self, px: f32) -> Outcome {
        let before = self.geometry.column_width();
        if self.geometry.set_column_width(px) == before {
            return Outcome::Unchanged;
        }
        self.routes.invalidate();
        Outcome::LayoutChanged
    }

    pub fn set_viewport(&mut self, viewport: RouteViewport) -> Outcome {
        if self.routes.set_viewport(viewport) {
            Outcome::LayoutChanged
        } else {
            Outcome::Unchanged
        }
    }

    // ── Changes from outside the grid ───────────────────────────

    /// New display window. An in-flight drag is pulled back inside it.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Outcome {
        self.start_date = start;
        self.end_date = end;
        self.axis = DateAxis::build(start, end);
        self.sync_geometry();
        Outcome::LayoutChanged
    }

    pub fn set_base_band(&mut self, base_date: NaiveDate, days: u32) {
        self.base_date = base_date;
        self.base_date_days = days;
    }

    /// Replace the segment list, cascading removed segments into items.
    pub fn set_segments(&mut self, mut segments: Vec<Segment>) -> Outcome {
        normalize_order(&mut segments);
        self.segments = segments;
        self.segments_changed()
    }

    /// Items and connections changed by the store's owner. Recorded as a
    /// history entry unless an undo is being applied.
    pub fn apply_external(&mut self, deliveries: Vec<Delivery>, connections: Vec<Connection>) {
        self.deliveries = deliveries;
        self.connections = connections;
        let live: HashSet<Uuid> = self.deliveries.iter().map(|d| d.id).collect();
        if self.drag.as_ref().is_some_and(|s| !live.contains(&s.item_id())) {
            self.drag = None;
        }
        if self.router.pending().is_some_and(|p| !live.contains(&p.item_id)) {
            self.router.clear();
        }
        self.prune_selection();
        self.history.record(&self.deliveries, &self.connections);
        self.routes.invalidate();
    }

    /// Load a different funnel. History starts over.
    pub fn reload(&mut self, input: TimelineInput) {
        self.drag = None;
        self.router.clear();
        self.selection = Selection::None;
        self.segments = input.segments;
        normalize_order(&mut self.segments);
        self.deliveries = input.deliveries;
        self.connections = input.connections;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.base_date = input.base_date;
        self.base_date_days = input.base_date_days;
        self.axis = DateAxis::build(input.start_date, input.end_date);
        self.history.reset(&self.deliveries, &self.connections);
        self.sync_geometry();
    }

    // ── Segments ────────────────────────────────────────────────

    pub fn add_segment(&mut self, name: impl Into<String>) -> Uuid {
        let n = self.segments.len();
        let segment = Segment::new(name, Segment::preset_color(n), n as u32);
        let id = segment.id;
        self.segments.push(segment);
        self.segments_changed();
        id
    }

    pub fn rename_segment(&mut self, id: Uuid, name: impl Into<String>) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        segment.name = name.into();
        self.publish_segments();
        true
    }

    pub fn recolor_segment(&mut self, id: Uuid, color: Color32) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        segment.color = color;
        self.publish_segments();
        true
    }

    /// Move the row at `from` to position `to`.
    pub fn move_segment(&mut self, from: usize, to: usize) -> bool {
        let len = self.segments.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let segment = self.segments.remove(from);
        self.segments.insert(to, segment);
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.order = i as u32;
        }
        self.segments_changed();
        true
    }

    /// Delete a segment. Items lose it; items left with no segment are
    /// removed together with their connections. The default segment stays.
    pub fn delete_segment(&mut self, id: Uuid) -> Outcome {
        let Some(index) = self.segment_index(id) else {
            return Outcome::Unchanged;
        };
        if self.segments[index].is_default {
            log::debug!("default segment cannot be deleted");
            return Outcome::Unchanged;
        }
        self.segments.remove(index);
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.order = i as u32;
        }
        self.segments_changed()
    }

    fn segments_changed(&mut self) -> Outcome {
        let cascaded = self.cascade_segments();
        self.sync_geometry();
        self.publish_segments();
        if cascaded {
            self.commit();
            Outcome::Committed
        } else {
            Outcome::LayoutChanged
        }
    }

    fn cascade_segments(&mut self) -> bool {
        let live: HashSet<Uuid> = self.segments.iter().map(|s| s.id).collect();
        let mut changed = false;
        for delivery in &mut self.deliveries {
            let before = delivery.segment_ids.len();
            delivery.segment_ids.retain(|id| live.contains(id));
            changed |= delivery.segment_ids.len() != before;
        }
        let orphaned: Vec<Uuid> = self
            .deliveries
            .iter()
            .filter(|d| d.segment_ids.is_empty())
            .map(|d| d.id)
            .collect();
        if !orphaned.is_empty() {
            self.deliveries.retain(|d| !d.segment_ids.is_empty());
            self.forget_items(&orphaned);
            log::debug!("dropped {} deliveries left without a segment", orphaned.len());
        }
        changed
    }

    fn publish_segments(&mut self) {
        if let Err(err) = self.store.update_segments(&self.segments) {
            log::warn!("Failed to persist segments: {err:#}");
        }
        self.routes.invalidate();
    }

    // ── Internals ───────────────────────────────────────────────

    /// Record and publish the live state. Persistence failures are logged,
    /// never rolled back.
    fn commit(&mut self) {
        self.history.record(&self.deliveries, &self.connections);
        if let Err(err) = self.store.update(&self.deliveries, &self.connections) {
            log::warn!("Failed to persist schedule: {err:#}");
        }
        self.routes.invalidate();
    }

    /// Drop connections, pending anchor, drag and selection that refer to
    /// removed items.
    fn forget_items(&mut self, removed: &[Uuid]) {
        self.connections
            .retain(|c| !removed.iter().any(|id| c.involves(*id)));
        for id in removed {
            self.router.forget_item(*id);
        }
        if self.drag.as_ref().is_some_and(|s| removed.contains(&s.item_id())) {
            self.drag = None;
            log::debug!("drag abandoned: item removed");
        }
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let still_there = match self.selection {
            Selection::None => true,
            Selection::Item(id) => self.deliveries.iter().any(|d| d.id == id),
            Selection::Connection(id) => self.connections.iter().any(|c| c.id == id),
        };
        if !still_there {
            self.selection = Selection::None;
        }
    }

    fn sync_geometry(&mut self) {
        self.geometry.set_axes(self.axis.len(), self.segments.len());
        let keep = self
            .drag
            .as_mut()
            .map_or(true, |session| session.reclamp(&self.geometry));
        if !keep {
            self.drag = None;
            log::debug!("drag abandoned: axis is empty");
        }
        self.routes.invalidate();
    }
}
