//! Connector arrows: anchor points, the two-click connection protocol and
//! cached curve routes.

use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

use super::geometry::{HEADER_HEIGHT, ROW_LABEL_WIDTH};
use crate::model::{Connection, Side};

/// Smallest horizontal control-point offset, so short hops still curve.
pub const MIN_CONTROL_OFFSET: f32 = 40.0;
/// Control offset as a share of the horizontal distance between anchors.
pub const CONTROL_FACTOR: f32 = 0.5;

/// Midpoint of one edge of a card.
pub fn anchor_point(card: Rect, side: Side) -> Pos2 {
    match side {
        Side::Top => card.center_top(),
        Side::Right => card.right_center(),
        Side::Bottom => card.center_bottom(),
        Side::Left => card.left_center(),
    }
}

/// Half of a connection: the anchor clicked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConnection {
    pub item_id: Uuid,
    pub side: Side,
}

/// What an anchor click means for the pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorClick {
    /// First click: the anchor is now pending.
    Pending(PendingConnection),
    /// Second click on another item: try to connect.
    Complete {
        from: PendingConnection,
        to: PendingConnection,
    },
    /// Second click on the pending item itself: nothing is created.
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionRouter {
    pending: Option<PendingConnection>,
}

impl ConnectionRouter {
    pub fn pending(&self) -> Option<PendingConnection> {
        self.pending
    }

    pub fn click_anchor(&mut self, item_id: Uuid, side: Side) -> AnchorClick {
        let to = PendingConnection { item_id, side };
        match self.pending.take() {
            None => {
                self.pending = Some(to);
                AnchorClick::Pending(to)
            }
            Some(from) if from.item_id == item_id => AnchorClick::Cleared,
            Some(from) => AnchorClick::Complete { from, to },
        }
    }

    /// Drop the pending anchor. Returns true if one was pending.
    pub fn clear(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Drop the pending anchor if it belongs to `item_id`.
    pub fn forget_item(&mut self, item_id: Uuid) {
        if self.pending.is_some_and(|p| p.item_id == item_id) {
            self.pending = None;
        }
    }
}

/// A cubic curve from one anchor to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPath {
    pub from: Pos2,
    pub c1: Pos2,
    pub c2: Pos2,
    pub to: Pos2,
}

impl ConnectorPath {
    /// S-curve between two anchors. The control points leave each anchor
    /// horizontally, outward for left/right anchors and toward the other end
    /// for top/bottom anchors.
    pub fn route(from: Pos2, from_side: Side, to: Pos2, to_side: Side) -> Self {
        let dx = to.x - from.x;
        let offset = (dx.abs() * CONTROL_FACTOR).max(MIN_CONTROL_OFFSET);
        let toward = if dx < 0.0 { -1.0 } else { 1.0 };
        let out = match from_side {
            Side::Right => 1.0,
            Side::Left => -1.0,
            Side::Top | Side::Bottom => toward,
        };
        let inward = match to_side {
            Side::Left => -1.0,
            Side::Right => 1.0,
            Side::Top | Side::Bottom => -toward,
        };
        Self {
            from,
            c1: from + Vec2::new(offset * out, 0.0),
            c2: to + Vec2::new(offset * inward, 0.0),
            to,
        }
    }

    pub fn points(&self) -> [Pos2; 4] {
        [self.from, self.c1, self.c2, self.to]
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let w = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
        let p = self.points();
        Pos2::new(
            w[0] * p[0].x + w[1] * p[1].x + w[2] * p[2].x + w[3] * p[3].x,
            w[0] * p[0].y + w[1] * p[1].y + w[2] * p[2].y + w[3] * p[3].y,
        )
    }

    pub fn midpoint(&self) -> Pos2 {
        self.point_at(0.5)
    }

    /// Direction the curve arrives in at `to`, for the arrowhead.
    pub fn end_direction(&self) -> Vec2 {
        let d = self.to - self.c2;
        if d.length_sq() > f32::EPSILON {
            d.normalized()
        } else {
            (self.to - self.from).normalized()
        }
    }

    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let n = segments.max(1);
        (0..=n).map(|i| self.point_at(i as f32 / n as f32)).collect()
    }

    /// Approximate distance from `p` to the curve.
    pub fn distance_to(&self, p: Pos2) -> f32 {
        self.sample(24)
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
    }

    pub fn translate(&self, by: Vec2) -> Self {
        Self {
            from: self.from + by,
            c1: self.c1 + by,
            c2: self.c2 + by,
            to: self.to + by,
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Where the scrolled grid sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteViewport {
    /// Screen position of the scroll container's top-left corner.
    pub origin: Pos2,
    pub scroll_offset: Vec2,
    pub size: Vec2,
}

impl RouteViewport {
    /// Screen position of a grid-local point.
    pub fn to_screen(&self, grid_point: Pos2) -> Pos2 {
        self.origin + Vec2::new(ROW_LABEL_WIDTH, HEADER_HEIGHT) + grid_point.to_vec2()
            - self.scroll_offset
    }

    /// Grid-local position of a screen point.
    pub fn to_grid(&self, screen: Pos2) -> Pos2 {
        screen - self.origin.to_vec2() - Vec2::new(ROW_LABEL_WIDTH, HEADER_HEIGHT)
            + self.scroll_offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedConnection {
    pub connection_id: Uuid,
    /// Path in screen coordinates.
    pub path: ConnectorPath,
    pub label: Option<String>,
}

/// Connector paths, recomputed at most once per frame after something that
/// moves anchors on screen (layout, drag, scroll, container resize).
#[derive(Debug, Clone, Default)]
pub struct RouteCache {
    dirty: bool,
    viewport: RouteViewport,
    routes: Vec<RoutedConnection>,
    recomputes: u64,
}

impl RouteCache {
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn viewport(&self) -> RouteViewport {
        self.viewport
    }

    /// Store the new scroll position / container size; returns true and marks
    /// the cache dirty when it moved.
    pub fn set_viewport(&mut self, viewport: RouteViewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.dirty = true;
        true
    }

    pub fn routes(&self) -> &[RoutedConnection] {
        &self.routes
    }

    /// Number of recomputations so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Recompute if dirty. `card_of` resolves an item id to its grid-local
    /// card rectangle; connections whose items do not resolve are skipped.
    pub fn on_frame(
        &mut self,
        connections: &[Connection],
        card_of: impl Fn(Uuid) -> Option<Rect>,
    ) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.recomputes += 1;
        let viewport = self.viewport;
        self.routes = connections
            .iter()
            .filter_map(|conn| {
                let from_card = card_of(conn.from_item_id)?;
                let to_card = card_of(conn.to_item_id)?;
                let from = viewport.to_screen(anchor_point(from_card, conn.from_side));
                let to = viewport.to_screen(anchor_point(to_card, conn.to_side));
                Some(RoutedConnection {
                    connection_id: conn.id,
                    path: ConnectorPath::route(from, conn.from_side, to, conn.to_side),
                    label: conn.label.clone(),
                })
            })
            .collect();
        log::trace!("routed {} connectors", self.routes.len());
        true
    }

    /// Connector nearest to a screen point, within `tolerance` pixels.
    pub fn hit_test(&self, screen: Pos2, tolerance: f32) -> Option<Uuid> {
        self.routes
            .iter()
            .map(|r| (r.connection_id, r.path.distance_to(screen)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
