#![forbid(unsafe_code)]

//! One-shot deferral until the host's next layout pass.
//!
//! A [`LayoutGate`] holds at most one pending [`LayoutToken`]. Arming it asks
//! the host to report the next layout pass of a chosen view; the host later
//! hands the token back and [`LayoutGate::fire`] accepts it exactly once.
//! Cancelling revokes the observation on the host side as well, and any token
//! that shows up after that (or after a re-arm) is rejected as stale.
//!
//! Arming never fires synchronously, even when every view is already measured:
//! the tour always waits for a pass in which all siblings have final geometry.

use crate::host::{Host, LayoutToken, Surface, ViewRef};

#[derive(Debug, Default)]
pub struct LayoutGate {
    issued: u64,
    pending: Option<LayoutToken>,
}

impl LayoutGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the next layout pass of `view`. Replaces (and revokes) any
    /// observation still pending.
    pub fn arm<H: Host + ?Sized>(&mut self, host: &mut H, view: ViewRef) -> LayoutToken {
        self.cancel(host);
        self.issued += 1;
        let token = LayoutToken::new(self.issued);
        self.pending = Some(token);
        host.observe_next_layout(view, token);
        tracing::debug!(
            target: "guidepost.gate",
            token = token.raw(),
            view = %view,
            "gate.armed"
        );
        token
    }

    /// Accept `token` if it is the pending one. Returns `true` at most once per
    /// [`arm`](Self::arm).
    pub fn fire(&mut self, token: LayoutToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Revoke the pending observation, if any.
    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<LayoutToken> {
        let token = self.pending.take()?;
        host.cancel_layout(token);
        tracing::debug!(target: "guidepost.gate", token = token.raw(), "gate.cancelled");
        Some(token)
    }
}

/// Which view to observe for a group.
///
/// The first anchor view the host hasn't measured yet wins, since no tip can
/// be placed before its target has geometry. With every anchor measured the
/// group's own overlay (`fallback`) is observed instead, because the tip sizes
/// are only known after it has been laid out.
pub fn observation_target<S, I>(surface: &S, anchors: I, fallback: ViewRef) -> ViewRef
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = ViewRef>,
{
    anchors
        .into_iter()
        .find(|view| !surface.is_measured(*view))
        .unwrap_or(fallback)
}
