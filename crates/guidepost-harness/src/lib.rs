#![forbid(unsafe_code)]

//! Recording host for Guidepost tests.
//!
//! [`RecordingHost`] is an in-memory [`Host`]: a flat list of simulated views
//! with rectangles, a measured flag and a parent link. Every call the tour
//! makes is appended to a [`HostCall`] log so tests can assert on exactly what
//! was asked of the host.
//!
//! Nothing is laid out until [`RecordingHost::layout_pass`] runs. A pass marks
//! every view measured, gives each tip overlay its simulated size and returns
//! the layout tokens whose observed view took part. [`RecordingHost::settle`]
//! does the same and feeds the tokens to a [`Tour`].

use std::collections::BTreeMap;

use guidepost::{
    EventOutcome, Host, LayoutToken, OverlayFlags, OverlaySpec, Surface, TipUpdate, Tour,
    TourEvent, ViewId, ViewRef,
};
use guidepost_layout::{Point, PointerAnimation, Rect, Size};

// ============================================================================
// Call log
// ============================================================================

/// One request the tour made of the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    AddOverlay {
        view: ViewRef,
        spec: OverlaySpec,
        rect: Rect,
        flags: OverlayFlags,
    },
    UpdatePosition {
        view: ViewRef,
        at: Point,
    },
    UpdateBounds {
        view: ViewRef,
        bounds: Rect,
    },
    UpdateFlags {
        view: ViewRef,
        flags: OverlayFlags,
    },
    UpdateTip {
        view: ViewRef,
        update: TipUpdate,
    },
    StartPointerAnimation {
        view: ViewRef,
        animation: PointerAnimation,
    },
    RemoveOverlay {
        view: ViewRef,
    },
    ObserveNextLayout {
        view: ViewRef,
        token: LayoutToken,
    },
    CancelLayout {
        token: LayoutToken,
    },
    CaptureHighlight {
        target: ViewRef,
        into: ViewRef,
    },
}

impl HostCall {
    /// Whether this call changes what is on screen.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::ObserveNextLayout { .. } | Self::CancelLayout { .. }
        )
    }
}

// ============================================================================
// Simulated views
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum ViewKind {
    Plain,
    Container,
    Highlight,
    Tip { text: String },
}

#[derive(Debug, Clone)]
struct SimView {
    kind: ViewKind,
    rect: Rect,
    measured: bool,
    parent: Option<ViewRef>,
    flags: OverlayFlags,
}

/// In-memory host that records every call.
#[derive(Debug)]
pub struct RecordingHost {
    bounds: Rect,
    next_ref: u64,
    views: BTreeMap<ViewRef, SimView>,
    ids: BTreeMap<ViewId, ViewRef>,
    pending: Vec<(ViewRef, LayoutToken)>,
    calls: Vec<HostCall>,
    tip_size: Size,
    tip_sizes: BTreeMap<String, Size>,
}

impl RecordingHost {
    /// Default measured size of a tip view.
    pub const DEFAULT_TIP_SIZE: Size = Size::new(80, 40);

    /// A host whose visible surface is `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            next_ref: 1,
            views: BTreeMap::new(),
            ids: BTreeMap::new(),
            pending: Vec::new(),
            calls: Vec::new(),
            tip_size: Self::DEFAULT_TIP_SIZE,
            tip_sizes: BTreeMap::new(),
        }
    }

    fn insert(&mut self, view: SimView) -> ViewRef {
        let handle = ViewRef::new(self.next_ref);
        self.next_ref += 1;
        self.views.insert(handle, view);
        handle
    }

    fn plain(rect: Rect, measured: bool) -> SimView {
        SimView {
            kind: ViewKind::Plain,
            rect,
            measured,
            parent: None,
            flags: OverlayFlags::empty(),
        }
    }

    // ── Scene setup ─────────────────────────────────────────────────────

    /// Add an already laid out view findable by `id`.
    pub fn add_view(&mut self, id: u32, rect: Rect) -> ViewRef {
        let view = self.insert(Self::plain(rect, true));
        self.ids.insert(ViewId(id), view);
        view
    }

    /// Add a view that won't be measured until the next layout pass.
    pub fn add_unmeasured_view(&mut self, id: u32, rect: Rect) -> ViewRef {
        let view = self.insert(Self::plain(rect, false));
        self.ids.insert(ViewId(id), view);
        view
    }

    /// Add a view that can only be reached by handle.
    pub fn add_anonymous_view(&mut self, rect: Rect) -> ViewRef {
        self.insert(Self::plain(rect, true))
    }

    /// Detach a view (and its children) from the tree.
    pub fn detach(&mut self, view: ViewRef) {
        self.views.remove(&view);
        self.views.retain(|_, v| v.parent != Some(view));
        self.ids.retain(|_, v| *v != view);
        self.pending.retain(|(v, _)| *v != view);
    }

    pub fn move_view(&mut self, view: ViewRef, rect: Rect) {
        if let Some(v) = self.views.get_mut(&view) {
            v.rect = rect;
        }
    }

    /// Size every tip view gets from a layout pass.
    pub fn set_tip_size(&mut self, size: Size) {
        self.tip_size = size;
    }

    /// Size for tips showing exactly `text`; overrides [`set_tip_size`](Self::set_tip_size).
    pub fn set_tip_size_for(&mut self, text: impl Into<String>, size: Size) {
        self.tip_sizes.insert(text.into(), size);
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Run one layout pass and return the tokens it releases.
    pub fn layout_pass(&mut self) -> Vec<LayoutToken> {
        for view in self.views.values_mut() {
            if let ViewKind::Tip { text } = &view.kind {
                let size = self.tip_sizes.get(text).copied().unwrap_or(self.tip_size);
                view.rect = Rect::from_parts(view.rect.origin(), size);
            }
            view.measured = true;
        }
        let released: Vec<_> = self
            .pending
            .drain(..)
            .filter(|(view, _)| self.views.contains_key(view))
            .map(|(_, token)| token)
            .collect();
        tracing::trace!(released = released.len(), "harness.layout_pass");
        released
    }

    /// Run a layout pass and deliver its tokens to `tour`.
    pub fn settle(&mut self, tour: &mut Tour) -> guidepost::Result<Vec<EventOutcome>> {
        self.layout_pass()
            .into_iter()
            .map(|token| tour.handle_event(&mut *self, TourEvent::Layout(token)))
            .collect()
    }

    /// Tokens waiting for a layout pass.
    pub fn pending_layouts(&self) -> Vec<LayoutToken> {
        self.pending.iter().map(|(_, token)| *token).collect()
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_live(&self, view: ViewRef) -> bool {
        self.views.contains_key(&view)
    }

    pub fn rect_of(&self, view: ViewRef) -> Option<Rect> {
        self.views.get(&view).map(|v| v.rect)
    }

    pub fn flags_of(&self, view: ViewRef) -> Option<OverlayFlags> {
        self.views.get(&view).map(|v| v.flags)
    }

    pub fn parent_of(&self, view: ViewRef) -> Option<ViewRef> {
        self.views.get(&view).and_then(|v| v.parent)
    }

    /// Live tip overlays in creation order.
    pub fn tip_views(&self) -> Vec<ViewRef> {
        self.views_where(|k| matches!(k, ViewKind::Tip { .. }))
    }

    /// Live highlight overlays in creation order.
    pub fn highlight_views(&self) -> Vec<ViewRef> {
        self.views_where(|k| *k == ViewKind::Highlight)
    }

    /// Live container overlays.
    pub fn containers(&self) -> Vec<ViewRef> {
        self.views_where(|k| *k == ViewKind::Container)
    }

    /// Text of a live tip overlay.
    pub fn tip_text(&self, view: ViewRef) -> Option<&str> {
        match &self.views.get(&view)?.kind {
            ViewKind::Tip { text } => Some(text),
            _ => None,
        }
    }

    /// Number of overlays currently on screen.
    pub fn overlay_count(&self) -> usize {
        self.views.values().filter(|v| v.kind != ViewKind::Plain).count()
    }

    fn views_where(&self, pred: impl Fn(&ViewKind) -> bool) -> Vec<ViewRef> {
        self.views
            .iter()
            .filter(|(_, v)| pred(&v.kind))
            .map(|(handle, _)| *handle)
            .collect()
    }
}

// ============================================================================
// Host protocol
// ============================================================================

impl Surface for RecordingHost {
    fn find_by_id(&self, id: ViewId) -> Option<ViewRef> {
        self.ids.get(&id).copied()
    }

    fn view_rect(&self, view: ViewRef) -> Option<Rect> {
        self.rect_of(view)
    }

    fn is_measured(&self, view: ViewRef) -> bool {
        self.views.get(&view).is_some_and(|v| v.measured)
    }

    fn visible_bounds(&self) -> Rect {
        self.bounds
    }
}

impl Host for RecordingHost {
    fn add_overlay(&mut self, spec: &OverlaySpec, rect: Rect, flags: OverlayFlags) -> ViewRef {
        let (kind, parent) = match spec {
            OverlaySpec::Container { .. } => (ViewKind::Container, None),
            OverlaySpec::Highlight { parent } => (ViewKind::Highlight, Some(*parent)),
            OverlaySpec::Tip { parent, view } => (
                ViewKind::Tip {
                    text: view.text.clone(),
                },
                *parent,
            ),
        };
        let view = self.insert(SimView {
            kind,
            rect,
            measured: false,
            parent,
            flags,
        });
        self.calls.push(HostCall::AddOverlay {
            view,
            spec: spec.clone(),
            rect,
            flags,
        });
        view
    }

    fn update_overlay_position(&mut self, view: ViewRef, at: Point) {
        if let Some(v) = self.views.get_mut(&view) {
            v.rect = v.rect.with_origin(at);
        }
        self.calls.push(HostCall::UpdatePosition { view, at });
    }

    fn update_overlay_bounds(&mut self, view: ViewRef, bounds: Rect) {
        if let Some(v) = self.views.get_mut(&view) {
            v.rect = bounds;
        }
        self.calls.push(HostCall::UpdateBounds { view, bounds });
    }

    fn update_overlay_flags(&mut self, view: ViewRef, flags: OverlayFlags) {
        if let Some(v) = self.views.get_mut(&view) {
            v.flags = flags;
        }
        self.calls.push(HostCall::UpdateFlags { view, flags });
    }

    fn update_tip(&mut self, view: ViewRef, update: &TipUpdate) {
        self.calls.push(HostCall::UpdateTip {
            view,
            update: *update,
        });
    }

    fn start_pointer_animation(&mut self, view: ViewRef, animation: PointerAnimation) {
        self.calls
            .push(HostCall::StartPointerAnimation { view, animation });
    }

    fn remove_overlay(&mut self, view: ViewRef) {
        self.detach(view);
        self.calls.push(HostCall::RemoveOverlay { view });
    }

    fn observe_next_layout(&mut self, view: ViewRef, token: LayoutToken) {
        self.pending.push((view, token));
        self.calls.push(HostCall::ObserveNextLayout { view, token });
    }

    fn cancel_layout(&mut self, token: LayoutToken) {
        self.pending.retain(|(_, t)| *t != token);
        self.calls.push(HostCall::CancelLayout { token });
    }

    fn capture_highlight(&mut self, target: ViewRef, into: ViewRef) {
        self.calls.push(HostCall::CaptureHighlight { target, into });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidepost::{PointerSpec, SizeConstraints, TextGravity, TipViewSpec};

    fn tip_spec(text: &str) -> OverlaySpec {
        OverlaySpec::Tip {
            parent: None,
            view: TipViewSpec {
                text: text.to_string(),
                mode: None,
                constraints: SizeConstraints::default(),
                padding: 0,
                gravity: TextGravity::Center,
                pointer: PointerSpec::default(),
                pointer_size: 0,
            },
        }
    }

    #[test]
    fn views_are_found_by_id() {
        let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
        let view = host.add_view(3, Rect::new(1, 2, 3, 4));
        assert_eq!(host.find_by_id(ViewId(3)), Some(view));
        assert_eq!(host.find_by_id(ViewId(4)), None);
        assert_eq!(host.view_rect(view), Some(Rect::new(1, 2, 3, 4)));
        assert!(host.is_measured(view));
    }

    #[test]
    fn layout_pass_sizes_tips_and_releases_tokens() {
        let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
        host.set_tip_size_for("big", Size::new(60, 30));
        let small = host.add_overlay(&tip_spec("small"), Rect::new(5, 5, 0, 0), OverlayFlags::empty());
        let big = host.add_overlay(&tip_spec("big"), Rect::new(0, 0, 0, 0), OverlayFlags::empty());
        assert!(!host.is_measured(small));
        host.observe_next_layout(small, LayoutToken::new(9));

        assert_eq!(host.layout_pass(), vec![LayoutToken::new(9)]);
        assert_eq!(host.rect_of(small), Some(Rect::new(5, 5, 80, 40)));
        assert_eq!(host.rect_of(big), Some(Rect::new(0, 0, 60, 30)));
        assert!(host.layout_pass().is_empty());
    }

    #[test]
    fn cancelled_and_detached_observations_never_release() {
        let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
        let a = host.add_view(1, Rect::new(0, 0, 1, 1));
        let b = host.add_view(2, Rect::new(0, 0, 1, 1));
        host.observe_next_layout(a, LayoutToken::new(1));
        host.observe_next_layout(b, LayoutToken::new(2));
        host.cancel_layout(LayoutToken::new(1));
        host.detach(b);
        assert!(host.layout_pass().is_empty());
    }

    #[test]
    fn removing_a_container_removes_children() {
        let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
        let container = host.add_overlay(
            &OverlaySpec::Container { dim_amount: 0.3 },
            Rect::new(0, 0, 100, 100),
            OverlayFlags::container(),
        );
        let child = host.add_overlay(
            &OverlaySpec::Highlight { parent: container },
            Rect::default(),
            OverlayFlags::NOT_FOCUSABLE,
        );
        assert_eq!(host.parent_of(child), Some(container));
        host.remove_overlay(container);
        assert!(!host.is_live(child));
        assert_eq!(host.overlay_count(), 0);
    }

    proptest::proptest! {
        #[test]
        fn released_tokens_match_live_observations(
            observed in proptest::collection::vec((0usize..4, proptest::prelude::any::<bool>()), 0..12),
        ) {
            let mut host = RecordingHost::new(Rect::new(0, 0, 100, 100));
            let views: Vec<_> = (0..4u32)
                .map(|id| host.add_unmeasured_view(id, Rect::new(0, 0, 1, 1)))
                .collect();
            let mut expected = Vec::new();
            for (i, &(slot, cancel)) in observed.iter().enumerate() {
                let token = LayoutToken::new(i as u64 + 1);
                host.observe_next_layout(views[slot], token);
                if cancel {
                    host.cancel_layout(token);
                } else {
                    expected.push(token);
                }
            }
            proptest::prop_assert_eq!(host.layout_pass(), expected);
            proptest::prop_assert!(views.iter().all(|&v| host.is_measured(v)));
            proptest::prop_assert!(host.layout_pass().is_empty());
        }
    }
}
