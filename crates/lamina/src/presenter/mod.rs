//! Presenter strategies for action sheets.
//!
//! A presenter owns how a sheet appears and disappears; the sheet itself is
//! presenter-agnostic and only relies on the [`SheetPresenter`] contract.
//! Two strategies ship with the crate:
//!
//! - [`StandardPresenter`]: the sheet slides up from the bottom edge of the
//!   containing context, dimming the background. The anchor is ignored.
//! - [`PopoverPresenter`]: the sheet floats in a panel anchored to a view or
//!   bar-item rect, with an arrow pointing at the anchor.
//!
//! Which strategy a sheet gets is a host-environment decision, typically by
//! device class, made at construction time via [`default_presenter`].
//!
//! Presentation and dismissal are asynchronous with respect to the caller:
//! completions fire when the presenter's transition finishes, driven by the
//! host's frame tick ([`ActionSheet::update`](crate::ActionSheet::update)).
//! A zero-duration transition completes synchronously, but the completion is
//! still invoked exactly once either way.

mod animation;
mod popover;
mod standard;

pub use animation::{ease, Easing, Transition, TransitionState};
pub use popover::{ArrowDirection, PopoverPresenter};
pub use standard::StandardPresenter;

use std::sync::Arc;
use std::time::Duration;

use lamina_core::{EdgeInsets, Rect};
use parking_lot::Mutex;

use crate::sheet::ActionSheet;

/// A one-shot continuation invoked when a presentation or dismissal
/// finishes. Invoked exactly once, on the context that drives the presenter.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// The screen element a presentation is anchored at.
///
/// Standard presentations ignore the anchor entirely; popovers point their
/// arrow at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// A regular view's frame, in container coordinates.
    View(Rect),
    /// A bar item's frame, in container coordinates. Popovers keep their
    /// arrow vertical for bar items, matching how bars sit at container
    /// edges.
    BarItem(Rect),
}

impl Anchor {
    /// The anchor's frame in container coordinates.
    pub fn rect(&self) -> Rect {
        match self {
            Anchor::View(rect) | Anchor::BarItem(rect) => *rect,
        }
    }

    /// Whether this anchor is a bar item.
    pub fn is_bar_item(&self) -> bool {
        matches!(self, Anchor::BarItem(_))
    }
}

/// The host context a sheet is presented in: current container bounds plus
/// the safe-area insets available at each edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationContext {
    /// Bounds of the containing context, in its own coordinate space.
    pub container: Rect,
    /// Space the host reserves at each edge (safe areas, bars). May be
    /// negative in degenerate geometries; margin computation clamps.
    pub safe_insets: EdgeInsets,
}

impl PresentationContext {
    /// Create a context with no reserved edge space.
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            safe_insets: EdgeInsets::ZERO,
        }
    }

    /// Set the safe-area insets using builder pattern.
    pub fn with_safe_insets(mut self, insets: EdgeInsets) -> Self {
        self.safe_insets = insets;
        self
    }

    /// Whether the context can host a presentation at all.
    ///
    /// Presenting into an empty container is a precondition violation; there
    /// is no way to present in nothing.
    pub fn is_usable(&self) -> bool {
        !self.container.is_empty()
    }
}

/// Strategy contract for showing and dismissing a sheet.
///
/// Presenters are stateless with respect to sheet content; they hold
/// transient geometry only while a presentation is in flight. The sheet
/// notifies its presenter from [`refresh`](crate::ActionSheet::refresh) so
/// the strategy can reposition after content changes.
///
/// A second `present` while one presentation is in flight is a caller error;
/// implementations guard it (warn and return) rather than stacking
/// presentations.
pub trait SheetPresenter: Send {
    /// Show the sheet in `context`, anchored at `anchor`.
    ///
    /// `completion` fires when the show transition finishes.
    fn present(
        &mut self,
        sheet: &ActionSheet,
        context: PresentationContext,
        anchor: Anchor,
        completion: Completion,
    );

    /// Dismiss whatever is currently presented.
    ///
    /// `completion` fires exactly once when teardown finishes, immediately
    /// if nothing is presented. Once initiated, dismissal always runs to
    /// completion; there is no cancellation.
    fn dismiss(&mut self, completion: Completion);

    /// The sheet's layout changed; recompute any geometry derived from it.
    fn refresh(&mut self, sheet: &ActionSheet);

    /// Advance in-flight transitions. Hosts call this once per frame; it is
    /// where deferred completions fire.
    fn update(&mut self);

    /// Whether a presentation is currently in flight or on screen.
    fn is_presenting(&self) -> bool;
}

/// Host device class, used to pick a default presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Compact devices get the slide-up presentation.
    Phone,
    /// Regular-size devices get the popover presentation.
    Pad,
}

/// The default presenter for a device class.
pub fn default_presenter(device: DeviceClass) -> Arc<Mutex<dyn SheetPresenter>> {
    match device {
        DeviceClass::Phone => Arc::new(Mutex::new(StandardPresenter::new())),
        DeviceClass::Pad => Arc::new(Mutex::new(PopoverPresenter::new())),
    }
}

/// Shared guard for the present-while-presenting precondition.
///
/// Returns `true` when the call must be rejected.
pub(crate) fn reject_reentrant_present(presenting: bool, strategy: &'static str) -> bool {
    if presenting {
        tracing::warn!(
            target: "lamina::presenter",
            strategy,
            "present() called while a presentation is in flight; ignoring"
        );
    }
    presenting
}

/// Shared guard for presenting into an unusable context.
pub(crate) fn reject_unusable_context(
    context: &PresentationContext,
    strategy: &'static str,
) -> bool {
    let unusable = !context.is_usable();
    if unusable {
        tracing::warn!(
            target: "lamina::presenter",
            strategy,
            ?context,
            "present() called with an empty container context; ignoring"
        );
    }
    unusable
}

/// Duration presenters default to for show/dismiss transitions.
pub(crate) const DEFAULT_TRANSITION: Duration = Duration::from_millis(250);
