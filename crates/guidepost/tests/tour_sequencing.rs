#![forbid(unsafe_code)]

//! Sequencer scenarios: traversal, closing, resetting, idempotence and
//! transactional failure.

use std::cell::RefCell;
use std::rc::Rc;

use guidepost::{
    Alignment, Anchor, EventOutcome, Margins, Placement, Point, Rect, SequencerState, Size,
    Surface, Tip, Tour, TourConfig, TourError, TourEvent, ViewId,
};
use guidepost_harness::{HostCall, RecordingHost};

// ── Fixtures ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Log {
    changed: Vec<(usize, Rect)>,
    closed: Vec<bool>,
}

fn observed(tour: &mut Tour) -> Rc<RefCell<Log>> {
    let log = Rc::new(RefCell::new(Log::default()));
    let changed = Rc::clone(&log);
    tour.set_on_tip_changed(move |index, rect| changed.borrow_mut().changed.push((index, rect)));
    let closed = Rc::clone(&log);
    tour.set_on_closed(move |cancelled| closed.borrow_mut().closed.push(cancelled));
    log
}

fn tip(id: u32, text: &str) -> Tip {
    Tip::new(Anchor::ById(ViewId(id)), text)
}

/// A host with `n` targets (ids `1..=n`) stacked down the left edge.
fn host_with_targets(n: u32) -> RecordingHost {
    let mut host = RecordingHost::new(Rect::new(0, 0, 1000, 1000));
    for id in 1..=n {
        host.add_view(id, Rect::new(100, 100 * id as i32, 50, 30));
    }
    host
}

fn tour_of_singles(n: u32) -> Tour {
    let mut tour = Tour::default();
    for id in 1..=n {
        tour.add_tip(tip(id, &format!("tip {id}"))).unwrap();
    }
    tour
}

// ── Traversal ───────────────────────────────────────────────────────────

#[test]
fn full_traversal_reports_each_group_then_closes_once() {
    let mut host = host_with_targets(3);
    let mut tour = tour_of_singles(3);
    let log = observed(&mut tour);

    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    for _ in 0..2 {
        tour.show_next(&mut host).unwrap();
        host.settle(&mut tour).unwrap();
    }
    assert!(log.borrow().closed.is_empty());

    tour.show_next(&mut host).unwrap();
    let log = log.borrow();
    let indices: Vec<_> = log.changed.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(log.changed[1].1, Rect::new(100, 200, 50, 30));
    assert_eq!(log.closed, vec![false]);
    assert!(!tour.is_shown());
    assert_eq!(tour.index(), 0);
    assert_eq!(tour.state(), SequencerState::Idle);
    assert!(host.tip_views().is_empty());
}

#[test]
fn show_next_before_show_starts_at_the_first_group() {
    let mut host = host_with_targets(2);
    let mut tour = tour_of_singles(2);
    tour.show_next(&mut host).unwrap();
    assert!(tour.is_shown());
    assert_eq!(tour.index(), 0);
    assert_eq!(tour.state(), SequencerState::ShowingGroup(0));
}

#[test]
fn show_next_after_close_starts_over() {
    let mut host = host_with_targets(3);
    let mut tour = tour_of_singles(3);
    let log = observed(&mut tour);

    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    tour.show_next(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    tour.close(&mut host);
    assert_eq!(tour.index(), 1);

    tour.show_next(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    let indices: Vec<_> = log.borrow().changed.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 0]);
    assert_eq!(tour.state(), SequencerState::ShowingGroup(0));
    assert_eq!(host.tip_text(host.tip_views()[0]), Some("tip 1"));
}

#[test]
fn groups_replace_each_other_completely() {
    let mut host = host_with_targets(2);
    let mut tour = tour_of_singles(2);
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    let first = host.tip_views();
    tour.show_next(&mut host).unwrap();
    let second = host.tip_views();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(!host.is_live(first[0]));
    assert_eq!(host.tip_text(second[0]), Some("tip 2"));
}

// ── Closing and resetting ───────────────────────────────────────────────

#[test]
fn close_mid_sequence_notifies_once_and_keeps_index() {
    let mut host = host_with_targets(3);
    let mut tour = tour_of_singles(3);
    let log = observed(&mut tour);

    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    tour.show_next(&mut host).unwrap();
    host.settle(&mut tour).unwrap();

    tour.close(&mut host);
    tour.close(&mut host);
    assert_eq!(log.borrow().closed, vec![true]);
    assert_eq!(log.borrow().changed.len(), 2);
    assert_eq!(tour.index(), 1);
    assert!(!tour.is_shown());
    assert_eq!(host.overlay_count(), 0);

    // Nothing more is reported after closing.
    assert!(host.settle(&mut tour).unwrap().is_empty());
    assert_eq!(log.borrow().changed.len(), 2);
}

#[test]
fn closed_tour_resumes_where_it_stopped() {
    let mut host = host_with_targets(3);
    let mut tour = tour_of_singles(3);
    tour.show(&mut host).unwrap();
    tour.show_next(&mut host).unwrap();
    tour.close(&mut host);
    tour.show(&mut host).unwrap();
    assert_eq!(tour.index(), 1);
    let views = host.tip_views();
    assert_eq!(host.tip_text(views[0]), Some("tip 2"));
}

#[test]
fn reset_after_close_restarts_the_first_group() {
    let mut host = host_with_targets(4);
    let mut tour = Tour::default();
    tour.add_group(false, [tip(1, "a"), tip(2, "b"), tip(3, "c")])
        .unwrap();
    tour.add_tip(tip(4, "d")).unwrap();
    let log = observed(&mut tour);

    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    tour.show_next(&mut host).unwrap();
    tour.close(&mut host);
    assert_eq!(log.borrow().closed, vec![true]);

    tour.reset(&mut host);
    assert_eq!(tour.index(), 0);
    assert_eq!(log.borrow().closed, vec![true]);

    tour.show(&mut host).unwrap();
    let texts: Vec<_> = host
        .tip_views()
        .into_iter()
        .filter_map(|v| host.tip_text(v).map(str::to_owned))
        .collect();
    assert_eq!(texts, ["a", "b", "c"]);
}

#[test]
fn reset_while_shown_reports_a_cancelled_close() {
    let mut host = host_with_targets(1);
    let mut tour = tour_of_singles(1);
    let log = observed(&mut tour);
    tour.show(&mut host).unwrap();
    tour.reset(&mut host);
    assert_eq!(log.borrow().closed, vec![true]);
    assert_eq!(tour.state(), SequencerState::Idle);
}

// ── is_shown and idempotence ────────────────────────────────────────────

#[test]
fn is_shown_follows_the_lifecycle() {
    let mut host = host_with_targets(1);
    let mut tour = tour_of_singles(1);
    assert!(!tour.is_shown());
    tour.show(&mut host).unwrap();
    assert!(tour.is_shown());
    tour.close(&mut host);
    assert!(!tour.is_shown());
    tour.show(&mut host).unwrap();
    tour.show_next(&mut host).unwrap();
    assert!(!tour.is_shown());
}

#[test]
fn show_while_shown_is_a_no_op() {
    let mut host = host_with_targets(2);
    let mut tour = tour_of_singles(2);
    let log = observed(&mut tour);
    tour.show(&mut host).unwrap();
    let before = host.calls().len();
    tour.show(&mut host).unwrap();
    tour.show(&mut host).unwrap();
    assert_eq!(host.calls().len(), before);
    host.settle(&mut tour).unwrap();
    assert_eq!(log.borrow().changed.len(), 1);
}

// ── Rejected operations ─────────────────────────────────────────────────

#[test]
fn show_without_tips_is_invalid_state() {
    let mut host = host_with_targets(0);
    let mut tour = Tour::default();
    assert!(matches!(
        tour.show(&mut host),
        Err(TourError::InvalidState { .. })
    ));
    assert!(host.calls().is_empty());
}

#[test]
fn adding_tips_after_show_needs_a_reset() {
    let mut host = host_with_targets(2);
    let mut tour = tour_of_singles(1);
    tour.show(&mut host).unwrap();
    assert!(matches!(
        tour.add_tip(tip(2, "late")),
        Err(TourError::InvalidState { .. })
    ));
    assert!(matches!(
        tour.add_group(true, [tip(2, "late")]),
        Err(TourError::InvalidState { .. })
    ));
    tour.reset(&mut host);
    tour.add_tip(tip(2, "late")).unwrap();
    assert_eq!(tour.groups().len(), 2);
}

#[test]
fn missing_target_on_advance_leaves_the_current_group_alone() {
    let mut host = host_with_targets(1);
    let mut tour = Tour::default();
    tour.add_tip(tip(1, "here")).unwrap();
    tour.add_tip(tip(99, "nowhere")).unwrap();
    let log = observed(&mut tour);
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    let shown = host.tip_views();
    host.clear_calls();

    let err = tour.show_next(&mut host).unwrap_err();
    assert_eq!(
        err,
        TourError::TargetNotFound {
            anchor: Anchor::ById(ViewId(99))
        }
    );
    assert!(err.is_transactional());
    assert!(host.calls().is_empty());
    assert!(tour.is_shown());
    assert_eq!(tour.index(), 0);
    assert_eq!(host.tip_views(), shown);
    assert!(log.borrow().closed.is_empty());
}

#[test]
fn missing_target_on_first_show_changes_nothing() {
    let mut host = host_with_targets(1);
    let mut tour = Tour::default();
    tour.add_group(true, [tip(1, "ok"), tip(7, "missing")])
        .unwrap();
    assert!(matches!(
        tour.show(&mut host),
        Err(TourError::TargetNotFound { .. })
    ));
    assert!(host.calls().is_empty());
    assert!(!tour.is_shown());
    // Still mutable: the failed show never presented anything.
    tour.add_tip(tip(1, "again")).unwrap();
}

#[test]
fn vanished_target_surfaces_as_missing_geometry() {
    let mut host = host_with_targets(1);
    let mut tour = tour_of_singles(1);
    let log = observed(&mut tour);
    tour.show(&mut host).unwrap();
    let target = host.find_by_id(ViewId(1)).unwrap();
    host.detach(target);
    let err = host.settle(&mut tour).unwrap_err();
    assert_eq!(err, TourError::MissingGeometry { view: target });
    assert!(!err.is_transactional());

    // The pass was spent, so the unplaceable group is closed.
    assert!(!tour.is_shown());
    assert_eq!(tour.state(), SequencerState::Idle);
    assert_eq!(host.overlay_count(), 0);
    assert!(host.pending_layouts().is_empty());
    assert_eq!(log.borrow().closed, vec![true]);
    assert!(log.borrow().changed.is_empty());

    // It can be shown again once the target is back.
    host.add_view(1, Rect::new(100, 100, 50, 30));
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    assert_eq!(log.borrow().changed.len(), 1);
}

// ── Deferred placement ──────────────────────────────────────────────────

#[test]
fn nothing_is_placed_before_the_layout_pass() {
    let mut host = host_with_targets(1);
    let mut tour = tour_of_singles(1);
    tour.show(&mut host).unwrap();
    assert!(
        !host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::UpdatePosition { .. }))
    );
    host.settle(&mut tour).unwrap();
    assert!(
        host.calls()
            .iter()
            .any(|c| matches!(c, HostCall::UpdatePosition { .. }))
    );
}

#[test]
fn unmeasured_target_is_observed_first() {
    let mut host = RecordingHost::new(Rect::new(0, 0, 1000, 1000));
    host.add_view(1, Rect::new(10, 10, 20, 20));
    let late = host.add_unmeasured_view(2, Rect::new(10, 100, 20, 20));
    let mut tour = Tour::default();
    tour.add_group(false, [tip(1, "a"), tip(2, "b")]).unwrap();
    tour.show(&mut host).unwrap();
    assert!(host.calls().iter().any(
        |c| matches!(c, HostCall::ObserveNextLayout { view, .. } if *view == late)
    ));
}

#[test]
fn stale_layout_tokens_are_ignored() {
    let mut host = host_with_targets(2);
    let mut tour = tour_of_singles(2);
    let log = observed(&mut tour);
    tour.show(&mut host).unwrap();
    let stale = host.pending_layouts()[0];

    // Replace the group before its layout arrives.
    tour.show_next(&mut host).unwrap();
    assert_eq!(
        tour.handle_event(&mut host, TourEvent::Layout(stale)).unwrap(),
        EventOutcome::Ignored
    );
    assert!(log.borrow().changed.is_empty());

    host.settle(&mut tour).unwrap();
    assert_eq!(log.borrow().changed.len(), 1);
    assert_eq!(log.borrow().changed[0].0, 1);

    // A token that already fired is stale too.
    tour.close(&mut host);
    assert_eq!(
        tour.handle_event(&mut host, TourEvent::Layout(stale)).unwrap(),
        EventOutcome::Ignored
    );
}

// ── Placement scenarios ─────────────────────────────────────────────────

fn placed_at(host: &RecordingHost, view: guidepost::ViewRef) -> Option<Point> {
    host.calls().iter().rev().find_map(|c| match c {
        HostCall::UpdatePosition { view: v, at } if *v == view => Some(*at),
        _ => None,
    })
}

#[test]
fn auto_with_room_to_the_right_goes_right() {
    let mut host = RecordingHost::new(Rect::new(0, 0, 1000, 430));
    host.add_view(1, Rect::new(100, 200, 50, 30));
    let mut tour = Tour::default();
    tour.add_tip(
        tip(1, "auto")
            .align(Alignment::Auto)
            .margins(Margins::new(0, 10)),
    )
    .unwrap();
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();

    let view = host.tip_views()[0];
    assert_eq!(placed_at(&host, view), Some(Point::new(150, 205)));
    let mode = host.calls().iter().find_map(|c| match c {
        HostCall::UpdateTip { update, .. } => Some(update.mode),
        _ => None,
    });
    assert_eq!(mode, Some(Placement::Right.pointer_mode()));
}

#[test]
fn center_inside_centers_the_body() {
    let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
    host.add_view(1, Rect::new(0, 0, 100, 100));
    host.set_tip_size(Size::new(60, 50));
    let mut tour = Tour::new(TourConfig::new().pointer_size(10));
    tour.add_tip(tip(1, "inside").align(Alignment::CenterInside))
        .unwrap();
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    let view = host.tip_views()[0];
    assert_eq!(placed_at(&host, view), Some(Point::new(20, 30)));
}

#[test]
fn point_anchor_places_at_the_point_without_highlight() {
    let mut host = RecordingHost::new(Rect::new(0, 0, 1000, 1000));
    let mut tour = Tour::default();
    let log = observed(&mut tour);
    tour.add_tip(Tip::new(Anchor::AtPoint(Point::new(300, 300)), "here"))
        .unwrap();
    tour.show(&mut host).unwrap();
    assert!(host.containers().is_empty());
    assert!(host.highlight_views().is_empty());
    host.settle(&mut tour).unwrap();
    let view = host.tip_views()[0];
    assert_eq!(placed_at(&host, view), Some(Point::new(300, 300)));
    assert_eq!(log.borrow().changed, vec![(0, Rect::new(300, 300, 0, 0))]);
}

#[test]
fn view_ref_anchor_resolves_directly() {
    let mut host = RecordingHost::new(Rect::new(0, 0, 1000, 1000));
    let target = host.add_anonymous_view(Rect::new(40, 40, 100, 20));
    let mut tour = Tour::default();
    tour.add_tip(Tip::new(Anchor::ByRef(target), "ref").align(Alignment::LeftBelow))
        .unwrap();
    tour.show(&mut host).unwrap();
    host.settle(&mut tour).unwrap();
    let view = host.tip_views()[0];
    assert_eq!(placed_at(&host, view), Some(Point::new(40, 60)));
}
