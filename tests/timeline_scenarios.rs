use chrono::NaiveDate;
use egui::{Pos2, Vec2};
use funnel_timeline::io::{load_funnel, FileStore};
use funnel_timeline::model::{Delivery, Funnel, Segment, Side};
use funnel_timeline::timeline::geometry::{CARD_PITCH, ROW_HEIGHT};
use funnel_timeline::timeline::router::anchor_point;
use funnel_timeline::timeline::{
    Action, DragMode, GridCell, MemoryStore, Outcome, RouteViewport, Selection, Timeline,
    TimelineInput,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uuid::Uuid;

const COLUMN: f32 = 120.0;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn segments(names: &[&str]) -> Vec<Segment> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Segment::new(*name, Segment::preset_color(i), i as u32))
        .collect()
}

fn input(segments: Vec<Segment>, deliveries: Vec<Delivery>) -> TimelineInput {
    TimelineInput {
        segments,
        deliveries,
        connections: Vec::new(),
        start_date: day(1),
        end_date: day(5),
        base_date: day(4),
        base_date_days: 1,
    }
}

fn five_days(names: &[&str]) -> Timeline<MemoryStore> {
    Timeline::new(input(segments(names), Vec::new()), MemoryStore::default(), COLUMN, 100)
}

fn create(t: &mut Timeline<MemoryStore>, date_index: usize, segment_index: usize) -> Uuid {
    match t.dispatch(Action::CreateItem(GridCell {
        date_index,
        segment_index,
    })) {
        Outcome::ItemCreated(id) => id,
        other => panic!("expected a new item, got {other:?}"),
    }
}

fn drag(t: &mut Timeline<MemoryStore>, item_id: Uuid, mode: DragMode, delta: Vec2) -> Outcome {
    let start = Pos2::new(10.0, 10.0);
    assert_eq!(
        t.dispatch(Action::BeginDrag {
            item_id,
            mode,
            pointer: start,
        }),
        Outcome::DragStarted
    );
    t.dispatch(Action::UpdateDragPreview {
        pointer: start + delta,
    });
    t.dispatch(Action::CommitDrag)
}

#[test]
fn move_by_two_columns_commits_new_start() {
    let mut t = five_days(&["Everyone"]);
    let id = create(&mut t, 0, 0);

    assert_eq!(drag(&mut t, id, DragMode::Move, Vec2::new(2.0 * COLUMN, 0.0)), Outcome::Committed);

    let span = t.card_layout(id).unwrap().span;
    assert_eq!((span.start_index, span.end_index), (2, 2));
    assert_eq!((span.segment_start, span.segment_end), (0, 0));
    assert_eq!(t.delivery(id).unwrap().start_date, day(3));
    assert_eq!(t.store().deliveries, t.deliveries().to_vec());
}

#[test]
fn resize_end_clamps_to_last_date() {
    let mut t = five_days(&["Everyone"]);
    let id = create(&mut t, 0, 0);
    drag(&mut t, id, DragMode::Move, Vec2::new(2.0 * COLUMN, 0.0));

    drag(&mut t, id, DragMode::ResizeEnd, Vec2::new(3.0 * COLUMN, 0.0));

    let span = t.card_layout(id).unwrap().span;
    assert_eq!(span.start_index, 2);
    assert_eq!(span.end_index, 4);
    let item = t.delivery(id).unwrap();
    assert_eq!((item.start_date, item.end_date), (day(3), day(5)));
}

#[test]
fn items_sharing_an_origin_stack() {
    let mut t = five_days(&["Everyone"]);
    let first = create(&mut t, 0, 0);
    let second = create(&mut t, 0, 0);

    let a = t.card_layout(first).unwrap();
    let b = t.card_layout(second).unwrap();
    assert_eq!(a.stack_index, 0);
    assert_eq!(b.stack_index, 1);
    assert_eq!(b.card.top() - a.card.top(), CARD_PITCH);
}

#[test]
fn two_anchor_clicks_connect_edge_midpoints() {
    let mut t = five_days(&["Everyone"]);
    let first = create(&mut t, 0, 0);
    let second = create(&mut t, 0, 0);

    assert_eq!(
        t.dispatch(Action::ClickAnchor {
            item_id: first,
            side: Side::Right
        }),
        Outcome::ConnectionPending
    );
    let Outcome::ConnectionCreated(conn_id) = t.dispatch(Action::ClickAnchor {
        item_id: second,
        side: Side::Left,
    }) else {
        panic!("second click should connect");
    };

    let conn = &t.connections()[0];
    assert_eq!(conn.id, conn_id);
    assert_eq!((conn.from_side, conn.to_side), (Side::Right, Side::Left));
    assert!(t.pending().is_none());

    assert!(t.on_frame());
    let viewport = RouteViewport::default();
    let route = &t.routes()[0];
    let from_card = t.card_layout(first).unwrap().card;
    let to_card = t.card_layout(second).unwrap().card;
    assert_eq!(route.path.from, viewport.to_screen(anchor_point(from_card, Side::Right)));
    assert_eq!(route.path.to, viewport.to_screen(anchor_point(to_card, Side::Left)));
}

#[test]
fn deleting_an_item_drops_its_connections() {
    let mut t = five_days(&["Everyone"]);
    let first = create(&mut t, 0, 0);
    let second = create(&mut t, 1, 0);
    t.dispatch(Action::ClickAnchor {
        item_id: first,
        side: Side::Right,
    });
    t.dispatch(Action::ClickAnchor {
        item_id: second,
        side: Side::Left,
    });
    let before = t.delivery(second).unwrap().clone();

    assert_eq!(t.dispatch(Action::DeleteItem(first)), Outcome::Deleted);

    assert!(t.connections().is_empty());
    assert!(t.store().connections.is_empty());
    assert_eq!(t.deliveries().len(), 1);
    assert_eq!(t.delivery(second), Some(&before));
}

#[test]
fn undo_restores_the_move_then_stops_at_the_start() {
    let everyone = segments(&["Everyone"]);
    let item = Delivery::new("Welcome", day(1), everyone[0].id);
    let id = item.id;
    let mut t = Timeline::new(input(everyone, vec![item]), MemoryStore::default(), COLUMN, 100);
    drag(&mut t, id, DragMode::Move, Vec2::new(2.0 * COLUMN, 0.0));
    assert_eq!(t.card_layout(id).unwrap().span.start_index, 2);

    assert_eq!(t.dispatch(Action::Undo), Outcome::Undone);
    assert_eq!(t.card_layout(id).unwrap().span.start_index, 0);
    assert_eq!(t.history().pointer(), 0);

    let deliveries = t.deliveries().to_vec();
    let updates = t.store().updates;
    assert_eq!(t.dispatch(Action::Undo), Outcome::Unchanged);
    assert_eq!(t.deliveries(), deliveries.as_slice());
    assert_eq!(t.store().updates, updates);
}

#[test]
fn undo_after_undo_keeps_walking_back() {
    let mut t = five_days(&["Everyone"]);
    let id = create(&mut t, 0, 0);
    drag(&mut t, id, DragMode::Move, Vec2::new(COLUMN, 0.0));
    assert_eq!(t.history().len(), 3);

    t.dispatch(Action::Undo);
    t.dispatch(Action::Undo);

    assert!(t.deliveries().is_empty());
    assert_eq!(t.history().pointer(), 0);
    assert!(!t.history().is_restoring());
}

#[test]
fn duplicate_connection_is_rejected() {
    let mut t = five_days(&["Everyone"]);
    let first = create(&mut t, 0, 0);
    let second = create(&mut t, 2, 0);
    for _ in 0..2 {
        t.dispatch(Action::ClickAnchor {
            item_id: first,
            side: Side::Right,
        });
        t.dispatch(Action::ClickAnchor {
            item_id: second,
            side: Side::Left,
        });
    }
    assert_eq!(t.connections().len(), 1);

    t.dispatch(Action::ClickAnchor {
        item_id: first,
        side: Side::Right,
    });
    assert_eq!(
        t.dispatch(Action::ClickAnchor {
            item_id: first,
            side: Side::Left
        }),
        Outcome::ConnectionRejected
    );
    assert_eq!(t.connections().len(), 1);
}

#[test]
fn resize_row_spans_segments_below() {
    let mut t = five_days(&["Everyone", "Buyers", "Lapsed"]);
    let id = create(&mut t, 1, 0);

    drag(&mut t, id, DragMode::ResizeRow, Vec2::new(0.0, 2.0 * ROW_HEIGHT));

    let ids: Vec<Uuid> = t.segments().iter().map(|s| s.id).collect();
    assert_eq!(t.delivery(id).unwrap().segment_ids, ids);
    let span = t.card_layout(id).unwrap().span;
    assert_eq!((span.segment_start, span.segment_end), (0, 2));
}

#[test]
fn deleting_a_segment_cascades_to_items() {
    let mut t = five_days(&["Everyone", "Buyers"]);
    let buyers = t.segments()[1].id;
    let only_buyers = create(&mut t, 0, 1);
    let both = create(&mut t, 2, 0);
    drag(&mut t, both, DragMode::ResizeRow, Vec2::new(0.0, ROW_HEIGHT));
    t.dispatch(Action::ClickAnchor {
        item_id: only_buyers,
        side: Side::Right,
    });
    t.dispatch(Action::ClickAnchor {
        item_id: both,
        side: Side::Left,
    });

    assert_eq!(t.delete_segment(buyers), Outcome::Committed);

    assert!(t.delivery(only_buyers).is_none());
    assert_eq!(t.delivery(both).unwrap().segment_ids, vec![t.segments()[0].id]);
    assert!(t.connections().is_empty());
    assert_eq!(t.store().segments.len(), 1);
}

#[test]
fn capture_is_released_on_every_exit() {
    let mut t = five_days(&["Everyone"]);
    let id = create(&mut t, 0, 0);
    let begin = Action::BeginDrag {
        item_id: id,
        mode: DragMode::Move,
        pointer: Pos2::ZERO,
    };

    t.dispatch(begin.clone());
    assert_eq!(t.captures().active(), 1);
    t.dispatch(Action::CommitDrag);
    assert_eq!(t.captures().active(), 0);

    t.dispatch(begin.clone());
    t.dispatch(Action::Undo);
    assert_eq!(t.captures().active(), 0);

    let id = create(&mut t, 0, 0);
    t.dispatch(Action::BeginDrag {
        item_id: id,
        mode: DragMode::ResizeEnd,
        pointer: Pos2::ZERO,
    });
    t.dispatch(Action::DeleteItem(id));
    assert_eq!(t.captures().active(), 0);
    assert!(t.drag().is_none());

    let id = create(&mut t, 0, 0);
    t.dispatch(Action::BeginDrag {
        item_id: id,
        mode: DragMode::Move,
        pointer: Pos2::ZERO,
    });
    t.reload(input(segments(&["Everyone"]), Vec::new()));
    assert_eq!(t.captures().active(), 0);
    assert_eq!(t.selection(), Selection::None);
}

#[test]
fn second_pointer_down_does_not_stack_captures() {
    let mut t = five_days(&["Everyone"]);
    let a = create(&mut t, 0, 0);
    let b = create(&mut t, 1, 0);
    t.begin_drag(a, DragMode::Move, Pos2::ZERO);
    assert_eq!(t.begin_drag(b, DragMode::Move, Pos2::ZERO), Outcome::Unchanged);
    assert_eq!(t.captures().active(), 1);
    assert_eq!(t.drag().unwrap().item_id(), a);
}

#[test]
fn routes_recompute_once_per_frame() {
    let mut t = five_days(&["Everyone"]);
    let a = create(&mut t, 0, 0);
    let b = create(&mut t, 3, 0);
    t.click_anchor(a, Side::Right);
    t.click_anchor(b, Side::Left);
    t.on_frame();
    let before = t.route_cache().recomputes();

    t.begin_drag(b, DragMode::Move, Pos2::ZERO);
    t.update_drag_preview(Pos2::new(-COLUMN, 0.0));
    t.update_drag_preview(Pos2::new(-2.0 * COLUMN, 0.0));
    assert!(t.on_frame());
    assert!(!t.on_frame());
    assert_eq!(t.route_cache().recomputes(), before + 1);

    let card = t.card_layout(b).unwrap().card;
    assert!(t.card_layout(b).unwrap().dragging);
    assert_eq!(t.routes()[0].path.to, RouteViewport::default().to_screen(anchor_point(card, Side::Left)));
}

#[test]
fn file_store_persists_commits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("launch.funnel.json");
    let funnel = Funnel::starting_on(day(1));
    funnel_timeline::io::save_funnel(&funnel, &path).unwrap();

    let store = FileStore::open(&path, true).unwrap();
    let input = TimelineInput::from(&store.funnel);
    let mut t = Timeline::new(input, store, COLUMN, 100);
    let id = match t.dispatch(Action::CreateItem(GridCell {
        date_index: 2,
        segment_index: 0,
    })) {
        Outcome::ItemCreated(id) => id,
        other => panic!("expected a new item, got {other:?}"),
    };

    let on_disk = load_funnel(&path).unwrap();
    assert_eq!(on_disk.deliveries.len(), 1);
    assert_eq!(on_disk.deliveries[0].id, id);
    assert_eq!(on_disk.deliveries[0].start_date, day(3));
    assert!(!t.store().is_dirty());
}

fn drag_mode() -> impl Strategy<Value = DragMode> {
    prop::sample::select(vec![DragMode::Move, DragMode::ResizeEnd, DragMode::ResizeRow])
}

proptest! {
    #[test]
    fn committed_span_stays_on_the_grid(
        start in 0u32..5,
        len in 0u32..5,
        first_row in 0usize..3,
        extra_rows in 0usize..3,
        mode in drag_mode(),
        dx in -1_500.0f32..1_500.0,
        dy in -400.0f32..400.0,
    ) {
        let rows = segments(&["Everyone", "Buyers", "Lapsed"]);
        let last_row = (first_row + extra_rows).min(2);
        let mut item = Delivery::new("Probe", day(1 + start), rows[first_row].id);
        item.end_date = day((1 + start + len).min(5));
        item.segment_ids = rows[first_row..=last_row].iter().map(|s| s.id).collect();
        let id = item.id;
        let mut t = Timeline::new(input(rows, vec![item]), MemoryStore::default(), COLUMN, 100);
        let before = t.card_layout(id).unwrap().span;

        drag(&mut t, id, mode, Vec2::new(dx, dy));

        let after = t.card_layout(id).unwrap().span;
        prop_assert!(after.within(4, 2));
        prop_assert!(t.drag().is_none());
        prop_assert_eq!(t.captures().active(), 0);
        match mode {
            DragMode::Move => {
                prop_assert_eq!(after.columns(), before.columns());
                prop_assert_eq!(after.rows(), before.rows());
            }
            DragMode::ResizeEnd => {
                prop_assert_eq!(after.start_index, before.start_index);
                prop_assert_eq!((after.segment_start, after.segment_end), (before.segment_start, before.segment_end));
            }
            DragMode::ResizeRow => {
                prop_assert_eq!(after.segment_start, before.segment_start);
                prop_assert_eq!((after.start_index, after.end_index), (before.start_index, before.end_index));
            }
        }
    }
}
