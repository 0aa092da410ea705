#![forbid(unsafe_code)]

//! The tip sequencer.
//!
//! A [`Tour`] owns an ordered list of [`TipGroup`]s and shows them one at a
//! time on a [`Host`]. Only one group is ever on screen; moving on tears the
//! old group down completely before the next one is built.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --show()--> ShowingGroup(i)
//! ShowingGroup(i) --show_next / outside touch / all tips dismissed--> ShowingGroup(i + 1)
//! ShowingGroup(last) --advance--> Idle        on_closed(false), index back to 0
//! ShowingGroup(i) --close() / reset()--> Idle on_closed(true)
//! ```
//!
//! Showing a group is split in two. [`Tour::show`] resolves every anchor of
//! the group, adds the overlays and arms a [`LayoutGate`]. Placement happens
//! later, when the host delivers the gate's token through
//! [`Tour::handle_event`]: by then both the targets and the tip views have
//! been measured, so every sibling is positioned in the same callback.
//!
//! Anchors are located before anything on screen changes. If one can't be
//! found the call fails with [`TourError::TargetNotFound`] and the previous
//! group stays exactly as it was.

use ahash::AHashMap;
use guidepost_layout::{
    Placement, Point, PointerAnimation, PointerMode, Rect, Size, compute_position,
    constraints_for_mode, select_placement,
};

use crate::anchor::{self, AnchorResolver, AnchorTarget};
use crate::config::TourConfig;
use crate::error::{Result, TourError};
use crate::gate::{LayoutGate, observation_target};
use crate::host::{
    Host, LayoutToken, OverlayFlags, OverlaySpec, Surface, TipUpdate, TipViewSpec, ViewRef,
};
use crate::tip::{Tip, TipGroup};
use crate::touch::{PressTracker, Touch, TouchKind};

const LOG_TARGET: &str = "guidepost.tour";

/// Where the sequencer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    /// The group at this index is on screen.
    ShowingGroup(usize),
    /// Set while closure callbacks run.
    Closing,
}

/// Host input fed back into the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    /// A layout pass requested through [`Host::observe_next_layout`] happened.
    Layout(LayoutToken),
    /// A touch landed on a tip view; coordinates are local to it.
    Touch { view: ViewRef, touch: Touch },
    /// A touch landed outside the overlay that watches for them.
    OutsideTouch,
    /// The dimmed container of a highlighted group was touched.
    ContainerTouch(TouchKind),
    /// A highlight cut-out was clicked.
    HighlightClicked(ViewRef),
    /// The host dismissed a tip view on its own (accessibility action, say).
    TipDismissed(ViewRef),
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    /// Not for this tour, or stale.
    Ignored,
    /// Handled without moving to another group.
    Consumed,
    /// The next group is being shown.
    Advanced,
    /// The last group was left; the tour is idle again.
    Finished,
}

type ClosedCallback = Box<dyn FnMut(bool)>;
type TipChangedCallback = Box<dyn FnMut(usize, Rect)>;

#[derive(Debug)]
struct LiveTip {
    view: ViewRef,
    highlight: Option<ViewRef>,
    resolver: AnchorResolver,
    placement: Option<Placement>,
    press: PressTracker,
    dismissed: bool,
}

#[derive(Debug)]
struct ActiveGroup {
    index: usize,
    container: Option<ViewRef>,
    tips: Vec<LiveTip>,
    /// Tip and highlight views to their slot in `tips`.
    handles: AHashMap<ViewRef, usize>,
    /// Slot of the tip that watches outside touches (separate mode only).
    watcher: Option<usize>,
}

impl ActiveGroup {
    fn live(&self) -> impl Iterator<Item = (usize, &LiveTip)> {
        self.tips.iter().enumerate().filter(|(_, t)| !t.dismissed)
    }

    fn live_count(&self) -> usize {
        self.live().count()
    }
}

struct Plan {
    slot: usize,
    placement: Placement,
    mode: PointerMode,
    origin: Point,
    fraction: f32,
    target: Rect,
}

/// Sequenced tip groups over a host.
pub struct Tour {
    config: TourConfig,
    groups: Vec<TipGroup>,
    index: usize,
    state: SequencerState,
    presented: bool,
    active: Option<ActiveGroup>,
    gate: LayoutGate,
    on_closed: Option<ClosedCallback>,
    on_tip_changed: Option<TipChangedCallback>,
}

impl Default for Tour {
    fn default() -> Self {
        Self::new(TourConfig::default())
    }
}

impl std::fmt::Debug for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("groups", &self.groups.len())
            .field("index", &self.index)
            .field("state", &self.state)
            .field("presented", &self.presented)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Tour {
    pub fn new(config: TourConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
            index: 0,
            state: SequencerState::Idle,
            presented: false,
            active: None,
            gate: LayoutGate::new(),
            on_closed: None,
            on_tip_changed: None,
        }
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// Called once per episode: `true` when closed early, `false` after the
    /// last group.
    pub fn set_on_closed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_closed = Some(Box::new(callback));
    }

    /// Called once per shown group, after all its tips are placed, with the
    /// group index and the head tip's target rectangle.
    pub fn set_on_tip_changed(&mut self, callback: impl FnMut(usize, Rect) + 'static) {
        self.on_tip_changed = Some(Box::new(callback));
    }

    /// Append a single tip as its own group.
    pub fn add_tip(&mut self, tip: Tip) -> Result<()> {
        self.check_mutable()?;
        let highlighting = tip
            .highlighting
            .unwrap_or(self.config.tip_defaults.highlighting);
        let group = TipGroup::new(highlighting, vec![tip.with_defaults(&self.config.tip_defaults)])?;
        self.groups.push(group);
        Ok(())
    }

    /// Append tips that are shown and dismissed together.
    pub fn add_group(&mut self, highlighting: bool, tips: impl IntoIterator<Item = Tip>) -> Result<()> {
        self.check_mutable()?;
        let defaults = &self.config.tip_defaults;
        let tips = tips.into_iter().map(|tip| tip.with_defaults(defaults)).collect();
        let group = TipGroup::new(highlighting, tips).inspect_err(|err| {
            tracing::warn!(target: LOG_TARGET, error = %err, "tour.rejected");
        })?;
        self.groups.push(group);
        Ok(())
    }

    pub fn groups(&self) -> &[TipGroup] {
        &self.groups
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the current group has at least one tip on screen.
    pub fn is_shown(&self) -> bool {
        self.active.as_ref().is_some_and(|g| g.live_count() > 0)
    }

    /// Show the group at the current index. Does nothing if already shown.
    pub fn show<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.is_shown() {
            return Ok(());
        }
        if self.groups.is_empty() {
            let err = TourError::state("show() called before any tip was added");
            tracing::warn!(target: LOG_TARGET, error = %err, "tour.rejected");
            return Err(err);
        }
        if self.index >= self.groups.len() {
            self.index = 0;
        }
        self.present(host, self.index)?;
        self.presented = true;
        tracing::debug!(
            target: LOG_TARGET,
            index = self.index,
            groups = self.groups.len(),
            "tour.show"
        );
        Ok(())
    }

    /// Move to the next group, or finish after the last one. With nothing on
    /// screen the tour starts over from the first group; use
    /// [`show`](Self::show) to resume where a [`close`](Self::close) stopped.
    pub fn show_next<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if !self.is_shown() {
            self.index = 0;
            return self.show(host);
        }
        self.advance(host).map(|_| ())
    }

    /// Tear the current group down and report a cancelled episode. The index
    /// is kept, so a later [`show`](Self::show) resumes here.
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        let was_shown = self.is_shown();
        self.teardown(host);
        if was_shown {
            tracing::debug!(target: LOG_TARGET, index = self.index, "tour.close");
            self.notify_closed(true);
        }
        self.state = SequencerState::Idle;
    }

    /// Close and rewind to the first group. Tips may be added again afterwards.
    pub fn reset<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.close(host);
        self.index = 0;
        self.presented = false;
        tracing::debug!(target: LOG_TARGET, "tour.reset");
    }

    /// Dismiss one tip of the current group by its view.
    pub fn dismiss_tip<H: Host + ?Sized>(&mut self, host: &mut H, view: ViewRef) -> Result<EventOutcome> {
        let slot = self
            .active
            .as_ref()
            .and_then(|g| g.handles.get(&view).copied());
        match slot {
            Some(slot) => self.dismiss_slot(host, slot),
            None => Ok(EventOutcome::Ignored),
        }
    }

    /// Feed a host event.
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: TourEvent) -> Result<EventOutcome> {
        match event {
            TourEvent::Layout(token) => self.on_layout(host, token),
            TourEvent::Touch { view, touch } => self.on_touch(host, view, touch),
            TourEvent::OutsideTouch => {
                if self.is_shown() {
                    self.advance(host)
                } else {
                    Ok(EventOutcome::Ignored)
                }
            }
            TourEvent::ContainerTouch(kind) => {
                let wrapped = self.active.as_ref().is_some_and(|g| g.container.is_some());
                if wrapped && kind == TouchKind::Down {
                    self.advance(host)
                } else {
                    Ok(EventOutcome::Ignored)
                }
            }
            TourEvent::HighlightClicked(view) => {
                let is_highlight = self.active.as_ref().is_some_and(|g| {
                    g.handles
                        .get(&view)
                        .is_some_and(|&slot| g.tips[slot].highlight == Some(view))
                });
                if is_highlight {
                    self.dismiss_tip(host, view)
                } else {
                    Ok(EventOutcome::Ignored)
                }
            }
            TourEvent::TipDismissed(view) => self.dismiss_tip(host, view),
        }
    }

    fn check_mutable(&self) -> Result<()> {
        if self.presented {
            let err = TourError::state("tips cannot be added after the tour was shown; reset it first");
            tracing::warn!(target: LOG_TARGET, error = %err, "tour.rejected");
            return Err(err);
        }
        Ok(())
    }

    fn advance<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<EventOutcome> {
        let from = self.index;
        let to = from + 1;
        if to >= self.groups.len() {
            self.finish(host);
            return Ok(EventOutcome::Finished);
        }
        self.present(host, to)?;
        tracing::debug!(target: LOG_TARGET, from, to, "tour.advance");
        Ok(EventOutcome::Advanced)
    }

    fn finish<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.teardown(host);
        tracing::debug!(target: LOG_TARGET, groups = self.groups.len(), "tour.finish");
        self.index = 0;
        self.notify_closed(false);
        self.state = SequencerState::Idle;
    }

    fn notify_closed(&mut self, cancelled: bool) {
        self.state = SequencerState::Closing;
        if let Some(callback) = self.on_closed.as_mut() {
            callback(cancelled);
        }
    }

    /// Locate every anchor of `index`, then replace whatever is on screen
    /// with it.
    fn present<H: Host + ?Sized>(&mut self, host: &mut H, index: usize) -> Result<()> {
        let targets = self.groups[index]
            .tips
            .iter()
            .map(|tip| anchor::locate(tip.anchor, &*host))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|err| {
                tracing::warn!(target: LOG_TARGET, index, error = %err, "tour.rejected");
            })?;
        self.teardown(host);
        self.materialize(host, index, targets);
        self.index = index;
        self.state = SequencerState::ShowingGroup(index);
        Ok(())
    }

    fn materialize<H: Host + ?Sized>(&mut self, host: &mut H, index: usize, targets: Vec<AnchorTarget>) {
        let group = &self.groups[index];
        let bounds = host.visible_bounds();
        let parked = Rect::at_point(bounds.origin());
        let container = group.highlighting.then(|| {
            host.add_overlay(
                &OverlaySpec::Container {
                    dim_amount: self.config.dim_amount,
                },
                bounds,
                OverlayFlags::container(),
            )
        });

        let mut tips = Vec::with_capacity(group.tips.len());
        let mut handles = AHashMap::with_capacity(group.tips.len() * 2);
        for (slot, (tip, target)) in group.tips.iter().zip(targets).enumerate() {
            let highlight = match (container, target.view()) {
                (Some(parent), Some(_)) => Some(host.add_overlay(
                    &OverlaySpec::Highlight { parent },
                    parked,
                    OverlayFlags::NOT_FOCUSABLE,
                )),
                _ => None,
            };
            let flags = match container {
                Some(_) => OverlayFlags::NOT_FOCUSABLE,
                None if slot == 0 => OverlayFlags::standalone_tip() | OverlayFlags::WATCH_OUTSIDE_TOUCH,
                None => OverlayFlags::standalone_tip(),
            };
            let spec = OverlaySpec::Tip {
                parent: container,
                view: self.view_spec(tip),
            };
            let view = host.add_overlay(&spec, parked, flags);

            handles.insert(view, slot);
            if let Some(h) = highlight {
                handles.insert(h, slot);
            }
            let mut resolver = AnchorResolver::new();
            resolver.prime(target);
            tips.push(LiveTip {
                view,
                highlight,
                resolver,
                placement: None,
                press: PressTracker::new(),
                dismissed: false,
            });
        }

        let fallback = container
            .or_else(|| tips.last().map(|t| t.view))
            .unwrap_or_else(|| ViewRef::new(0));
        let observe = observation_target(
            &*host,
            tips.iter().filter_map(|tip| tip.resolver.target().and_then(|target| target.view())),
            fallback,
        );
        self.gate.arm(host, observe);

        self.active = Some(ActiveGroup {
            index,
            container,
            tips,
            handles,
            watcher: container.is_none().then_some(0),
        });
    }

    fn view_spec(&self, tip: &Tip) -> TipViewSpec {
        let mode = tip.resolved_align().placement().map(Placement::pointer_mode);
        let base = tip.resolved_constraints();
        let constraints = match mode {
            Some(mode) => constraints_for_mode(base, mode, self.config.pointer_size),
            None => base,
        };
        TipViewSpec {
            text: tip.text.clone(),
            mode,
            constraints,
            padding: tip.padding.unwrap_or(self.config.tip_defaults.padding),
            gravity: tip.gravity,
            pointer: tip.resolved_pointer(),
            pointer_size: self.config.pointer_size,
        }
    }

    /// Release every overlay of the current group and revoke its gate.
    fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.gate.cancel(host);
        let Some(group) = self.active.take() else {
            return;
        };
        match group.container {
            Some(container) => host.remove_overlay(container),
            None => {
                for (_, tip) in group.live() {
                    host.remove_overlay(tip.view);
                }
            }
        }
    }

    /// Place every live tip of the current group.
    ///
    /// The gate's token is spent once this runs, so a group whose geometry
    /// can't be read is closed rather than left parked with no pass coming.
    fn on_layout<H: Host + ?Sized>(&mut self, host: &mut H, token: LayoutToken) -> Result<EventOutcome> {
        if !self.gate.fire(token) {
            tracing::debug!(target: LOG_TARGET, token = token.raw(), "tour.layout.stale");
            return Ok(EventOutcome::Ignored);
        }
        let Some(active) = self.active.as_mut() else {
            return Ok(EventOutcome::Ignored);
        };
        let _span = tracing::debug_span!(
            "tour.layout",
            group = active.index,
            tips = active.live_count()
        )
        .entered();

        let group = &self.groups[active.index];
        let plans = match plan_layout(active, group, &*host, self.config.pointer_size) {
            Ok(plans) => plans,
            Err(err) => {
                tracing::warn!(target: LOG_TARGET, error = %err, "tour.rejected");
                self.close(host);
                return Err(err);
            }
        };

        let pointer_size = self.config.pointer_size;
        for plan in &plans {
            let tip = &group.tips[plan.slot];
            let live = &mut active.tips[plan.slot];
            live.placement = Some(plan.placement);
            host.update_tip(
                live.view,
                &TipUpdate {
                    mode: plan.mode,
                    constraints: constraints_for_mode(tip.resolved_constraints(), plan.mode, pointer_size),
                    pointer_fraction: plan.fraction,
                },
            );
            host.update_overlay_position(live.view, plan.origin);
            if let (Some(highlight), Some(target)) =
                (live.highlight, live.resolver.target().and_then(|t| t.view()))
            {
                host.update_overlay_bounds(highlight, plan.target);
                host.capture_highlight(target, highlight);
            }
            if self.config.pointer_animation && tip.resolved_pointer().animated {
                host.start_pointer_animation(live.view, PointerAnimation::settle_at(plan.fraction));
            }
        }

        let index = active.index;
        tracing::debug!(target: LOG_TARGET, group = index, placed = plans.len(), "tour.layout");
        if let (Some(head), Some(callback)) = (plans.first(), self.on_tip_changed.as_mut()) {
            callback(index, head.target);
        }
        Ok(EventOutcome::Consumed)
    }

    fn on_touch<H: Host + ?Sized>(&mut self, host: &mut H, view: ViewRef, touch: Touch) -> Result<EventOutcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(EventOutcome::Ignored);
        };
        let Some(&slot) = active.handles.get(&view) else {
            return Ok(EventOutcome::Ignored);
        };
        let live = &mut active.tips[slot];
        if live.view != view {
            return Ok(EventOutcome::Ignored);
        }
        let size = host.view_rect(view).map(|r| r.size()).unwrap_or_default();
        if live.press.feed(touch, size) {
            self.dismiss_slot(host, slot)
        } else {
            Ok(EventOutcome::Consumed)
        }
    }

    fn dismiss_slot<H: Host + ?Sized>(&mut self, host: &mut H, slot: usize) -> Result<EventOutcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(EventOutcome::Ignored);
        };
        if active.tips[slot].dismissed {
            return Ok(EventOutcome::Ignored);
        }
        let group = active.index;
        // The last live tip goes down with its group, and only once the next
        // group's anchors were found.
        if active.live_count() == 1 {
            let outcome = self.advance(host)?;
            tracing::debug!(target: LOG_TARGET, group, slot, remaining = 0, "tour.tip.dismissed");
            return Ok(outcome);
        }

        let live = &mut active.tips[slot];
        live.dismissed = true;
        let (view, highlight) = (live.view, live.highlight);
        host.remove_overlay(view);
        active.handles.remove(&view);
        if let Some(h) = highlight {
            host.remove_overlay(h);
            active.handles.remove(&h);
        }
        let remaining = active.live_count();
        tracing::debug!(target: LOG_TARGET, group, slot, remaining, "tour.tip.dismissed");

        if active.watcher == Some(slot) {
            let next = active.live().next().map(|(s, t)| (s, t.view));
            if let Some((next_slot, next_view)) = next {
                host.update_overlay_flags(
                    next_view,
                    OverlayFlags::standalone_tip() | OverlayFlags::WATCH_OUTSIDE_TOUCH,
                );
                active.watcher = Some(next_slot);
            }
        }
        Ok(EventOutcome::Consumed)
    }
}

/// Compute where every live tip of `active` goes, without touching the host.
fn plan_layout<S: Surface + ?Sized>(
    active: &mut ActiveGroup,
    group: &TipGroup,
    surface: &S,
    pointer_size: i32,
) -> Result<Vec<Plan>> {
    let bounds = surface.visible_bounds();
    let mut plans = Vec::with_capacity(active.tips.len());
    for (slot, live) in active.tips.iter_mut().enumerate() {
        if live.dismissed {
            continue;
        }
        let tip = &group.tips[slot];
        let target = live.resolver.resolve(tip.anchor, surface).map_err(|_| {
            let view = live.resolver.target().and_then(|t| t.view()).unwrap_or(live.view);
            TourError::MissingGeometry { view }
        })?;
        let size: Size = surface
            .view_rect(live.view)
            .ok_or(TourError::MissingGeometry { view: live.view })?
            .size();
        let placement = live
            .placement
            .unwrap_or_else(|| select_placement(tip.resolved_align(), target, size, bounds, tip.margins));
        let mode = placement.pointer_mode();
        plans.push(Plan {
            slot,
            placement,
            mode,
            origin: compute_position(target, size, placement, tip.margins, pointer_size),
            fraction: tip.resolved_pointer().fraction(size, mode),
            target,
        });
    }
    Ok(plans)
}
