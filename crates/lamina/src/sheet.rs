//! The action sheet composition root.
//!
//! [`ActionSheet`] composes a header, an ordered items section, and an
//! ordered buttons section, and delegates how the whole thing appears and
//! disappears to a pluggable [`SheetPresenter`]. Rows are partitioned into
//! the two sections once, at setup, by their kind.
//!
//! The sheet owns the computed [`SheetLayout`] and is its single writer:
//! [`refresh`](ActionSheet::refresh) is the only path that recomputes it,
//! and both [`setup`](ActionSheet::setup) and
//! [`present`](ActionSheet::present) run it so the presenter never reads a
//! stale snapshot.
//!
//! Everything runs on the UI-owning context. Presentation and dismissal are
//! asynchronous with respect to the caller (their completions fire from the
//! presenter's transition pump), but never concurrent with each other for
//! the same sheet; callers serialize them.
//!
//! # Example
//!
//! ```
//! use lamina::{
//!     default_presenter, ActionSheet, Anchor, DeviceClass, PresentationContext, Rect, Row,
//! };
//!
//! let mut sheet = ActionSheet::new(
//!     vec![
//!         Row::item("Copy"),
//!         Row::item("Paste"),
//!         Row::cancel_button("Cancel"),
//!     ],
//!     default_presenter(DeviceClass::Phone),
//! );
//!
//! sheet.row_selected.connect(|row| {
//!     println!("selected {}", row.title());
//! });
//!
//! let context = PresentationContext::new(Rect::new(0.0, 0.0, 320.0, 640.0));
//! sheet.present(context, Anchor::View(Rect::ZERO), || {});
//! ```

use std::sync::Arc;

use lamina_core::{Edge, EdgeInsets, Signal};
use parking_lot::Mutex;

use crate::appearance::Appearance;
use crate::dispatch::{DispatchState, TapDispatcher};
use crate::layout::{section_height, SheetLayout};
use crate::presenter::{Anchor, Completion, PresentationContext, SheetPresenter};
use crate::render::{RowCellFactory, SectionCells};
use crate::row::{Row, RowId, TapBehavior};

/// A modal sheet of selectable items and action buttons.
///
/// See the [module documentation](self) for the composition model.
pub struct ActionSheet {
    items: Vec<Row>,
    buttons: Vec<Row>,
    presenter: Arc<Mutex<dyn SheetPresenter>>,
    header_height: Option<f32>,
    appearance: Appearance,
    minimum_insets: EdgeInsets,
    section_spacing: f32,
    preferred_popover_width: f32,
    layout: SheetLayout,
    dispatcher: TapDispatcher,
    /// Completions handed to the presenter are relayed through this queue so
    /// they run after the presenter lock is released; a completion may then
    /// safely query or drive the presenter again.
    deferred: Arc<Mutex<Vec<Completion>>>,

    // Signals
    /// Emitted when a row is selected: synchronously for stay-open rows,
    /// from the dismissal-completion continuation for dismiss rows. At most
    /// once per tap per row.
    pub row_selected: Arc<Signal<Row>>,
    /// Emitted when both sections must be re-rendered from current rows.
    pub reload_requested: Signal<()>,
    /// Emitted when the computed layout changed.
    pub layout_changed: Signal<SheetLayout>,
}

impl ActionSheet {
    /// Create a sheet with an initial row set and a presenter.
    ///
    /// The presenter reference is shared, not owned; its lifetime is
    /// independent of the sheet's.
    pub fn new(rows: Vec<Row>, presenter: Arc<Mutex<dyn SheetPresenter>>) -> Self {
        let mut sheet = Self {
            items: Vec::new(),
            buttons: Vec::new(),
            presenter,
            header_height: None,
            appearance: Appearance::default(),
            minimum_insets: EdgeInsets::uniform(15.0),
            section_spacing: 15.0,
            preferred_popover_width: 300.0,
            layout: SheetLayout::default(),
            dispatcher: TapDispatcher::new(),
            deferred: Arc::new(Mutex::new(Vec::new())),
            row_selected: Arc::new(Signal::new()),
            reload_requested: Signal::new(),
            layout_changed: Signal::new(),
        };
        sheet.setup(rows);
        sheet
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the sheet's rows wholesale.
    ///
    /// Partitions the input into items (non-button kinds) and buttons
    /// (button kinds), preserving relative order within each partition, then
    /// reloads both sections and refreshes layout. Empty input yields two
    /// empty sections; there is no error case.
    pub fn setup(&mut self, rows: Vec<Row>) {
        let (buttons, items) = rows.into_iter().partition(|row| row.is_button());
        self.buttons = buttons;
        self.items = items;
        tracing::debug!(
            target: "lamina::sheet",
            items = self.items.len(),
            buttons = self.buttons.len(),
            "rows replaced"
        );
        self.reload();
        self.refresh();
    }

    /// The items section, in display order.
    pub fn items(&self) -> &[Row] {
        &self.items
    }

    /// The buttons section, in display order.
    pub fn buttons(&self) -> &[Row] {
        &self.buttons
    }

    /// Look up a row in either section.
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.items
            .iter()
            .chain(self.buttons.iter())
            .find(|row| row.id() == id)
    }

    /// Mutable row lookup, for enable/appearance changes.
    ///
    /// Changes take visible effect on the next [`refresh`](Self::refresh).
    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.items
            .iter_mut()
            .chain(self.buttons.iter_mut())
            .find(|row| row.id() == id)
    }

    /// Ask the renderer to re-render both sections.
    pub fn reload(&self) {
        self.reload_requested.emit(());
    }

    /// Produce renderer cells for every row, in display order.
    pub fn build_cells<F: RowCellFactory>(&self, factory: &mut F) -> SectionCells<F::Cell> {
        SectionCells {
            items: self
                .items
                .iter()
                .map(|row| factory.make_cell(row, row.reuse_key()))
                .collect(),
            buttons: self
                .buttons
                .iter()
                .map(|row| factory.make_cell(row, row.reuse_key()))
                .collect(),
        }
    }

    // =========================================================================
    // Appearance and Geometry
    // =========================================================================

    /// The sheet-level appearance defaults.
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// Replace the sheet-level appearance.
    ///
    /// Call [`refresh`](Self::refresh) afterwards for the change to take
    /// visible effect.
    pub fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
    }

    /// The header section's height, or `None` when the host supplies no
    /// header view.
    pub fn header_height(&self) -> Option<f32> {
        self.header_height
    }

    /// Set the header section's height.
    ///
    /// The header view itself belongs to the host; the core only tracks its
    /// height. `None` hides the section entirely. Call
    /// [`refresh`](Self::refresh) afterwards.
    pub fn set_header_height(&mut self, height: Option<f32>) {
        self.header_height = height;
    }

    /// Minimum content insets around the sheet.
    pub fn minimum_insets(&self) -> EdgeInsets {
        self.minimum_insets
    }

    /// Set the minimum content insets.
    pub fn set_minimum_insets(&mut self, insets: EdgeInsets) {
        self.minimum_insets = insets;
    }

    /// Spacing between adjacent visible sections.
    pub fn section_spacing(&self) -> f32 {
        self.section_spacing
    }

    /// Set the spacing between adjacent visible sections.
    pub fn set_section_spacing(&mut self, spacing: f32) {
        self.section_spacing = spacing;
    }

    /// Preferred width when presented as a popover.
    pub fn preferred_popover_width(&self) -> f32 {
        self.preferred_popover_width
    }

    /// Set the preferred popover width.
    pub fn set_preferred_popover_width(&mut self, width: f32) {
        self.preferred_popover_width = width;
    }

    /// Total height of the items section, recomputed on demand.
    pub fn items_height(&self) -> f32 {
        section_height(&self.items, &self.appearance)
    }

    /// Total height of the buttons section, recomputed on demand.
    pub fn buttons_height(&self) -> f32 {
        section_height(&self.buttons, &self.appearance)
    }

    /// The last layout published by [`refresh`](Self::refresh).
    pub fn layout(&self) -> SheetLayout {
        self.layout
    }

    /// Effective inset for an edge in the given context.
    ///
    /// The larger of the configured minimum and the space the host actually
    /// reserves at that edge; degenerate (negative) available space clamps
    /// to the minimum.
    pub fn margin(&self, edge: Edge, context: &PresentationContext) -> f32 {
        self.minimum_insets
            .edge(edge)
            .max(context.safe_insets.edge(edge))
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// The presenter this sheet delegates to.
    pub fn presenter(&self) -> Arc<Mutex<dyn SheetPresenter>> {
        self.presenter.clone()
    }

    /// Whether a presentation is in flight or on screen.
    pub fn is_presented(&self) -> bool {
        self.presenter.lock().is_presenting()
    }

    /// Present the sheet in `context`, anchored at `anchor`.
    ///
    /// Refreshes layout, then delegates to the presenter; `completion` fires
    /// when the show transition finishes. Calling while already presented is
    /// a caller error (the presenter ignores the call); callers serialize
    /// presentations.
    pub fn present(
        &mut self,
        context: PresentationContext,
        anchor: Anchor,
        completion: impl FnOnce() + Send + 'static,
    ) {
        tracing::debug!(
            target: "lamina::sheet",
            items = self.items.len(),
            buttons = self.buttons.len(),
            ?anchor,
            "present requested"
        );
        self.refresh();
        let presenter = self.presenter.clone();
        let completion = self.defer(completion);
        presenter.lock().present(self, context, anchor, completion);
        self.run_deferred();
    }

    /// Dismiss the sheet.
    ///
    /// `completion` fires exactly once, after teardown finishes, on the
    /// context that drives the presenter — immediately when there is nothing
    /// to animate.
    pub fn dismiss(&self, completion: impl FnOnce() + Send + 'static) {
        tracing::debug!(target: "lamina::sheet", "dismiss requested");
        let completion = self.defer(completion);
        self.presenter.lock().dismiss(completion);
        self.run_deferred();
    }

    /// Recompute layout from current content and notify collaborators.
    ///
    /// This is the single source of truth for layout — there is no
    /// incremental path. Header height/visibility, per-row heights from
    /// current appearance, section heights, and spacing are all re-derived,
    /// the new snapshot is published to `layout_changed`, and the presenter
    /// is told so it may reposition or resize. Call it after any content or
    /// size mutation that did not go through [`setup`](Self::setup) or
    /// [`present`](Self::present).
    pub fn refresh(&mut self) {
        self.layout = SheetLayout::compute(
            &self.items,
            &self.buttons,
            self.header_height,
            &self.appearance,
            self.section_spacing,
        );
        tracing::trace!(target: "lamina::sheet", layout = ?self.layout, "layout refreshed");
        self.layout_changed.emit(self.layout);
        let presenter = self.presenter.clone();
        presenter.lock().refresh(self);
    }

    /// Advance in-flight presenter transitions.
    ///
    /// Hosts call this once per frame; deferred present/dismiss completions
    /// (including deferred selection callbacks) fire from here.
    pub fn update(&self) {
        self.presenter.lock().update();
        self.run_deferred();
    }

    /// Wrap a completion so the presenter only enqueues it; the queue is
    /// drained once the presenter lock has been released.
    fn defer(&self, completion: impl FnOnce() + Send + 'static) -> Completion {
        let queue = self.deferred.clone();
        Box::new(move || queue.lock().push(Box::new(completion)))
    }

    /// Run completions the presenter finished while locked.
    ///
    /// A completion may itself present or dismiss, pushing more work onto
    /// the queue; keep draining until it stays empty.
    fn run_deferred(&self) {
        loop {
            let ready = std::mem::take(&mut *self.deferred.lock());
            if ready.is_empty() {
                break;
            }
            for complete in ready {
                complete();
            }
        }
    }

    // =========================================================================
    // Tap Dispatch
    // =========================================================================

    /// Current tap-dispatch state.
    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Dispatch a tap on a row.
    ///
    /// A reload is requested before the behavior branch, so visual row state
    /// is fresh whether or not the sheet stays open. Then:
    ///
    /// - [`TapBehavior::Dismiss`]: dismissal is initiated first and
    ///   `row_selected` fires from the dismissal-completion continuation,
    ///   observing post-dismissal state.
    /// - [`TapBehavior::Stay`]: `row_selected` fires synchronously and the
    ///   sheet stays open; the reload covers toggled row state.
    ///
    /// Taps on unknown rows, and taps arriving while another tap-driven
    /// transition is in flight, are ignored.
    pub fn handle_tap(&mut self, id: RowId) {
        let Some(row) = self.row(id).cloned() else {
            tracing::debug!(target: "lamina::sheet", ?id, "tap on unknown row ignored");
            return;
        };
        if !self.dispatcher.begin_tap() {
            return;
        }

        tracing::debug!(
            target: "lamina::sheet",
            title = row.title(),
            behavior = ?row.tap_behavior(),
            "row tapped"
        );
        self.reload();

        match row.tap_behavior() {
            TapBehavior::Stay => {
                self.row_selected.emit(row);
                self.dispatcher.settle();
            }
            TapBehavior::Dismiss => {
                self.dispatcher.begin_dismissal();
                let dispatcher = self.dispatcher.clone();
                let selected = self.row_selected.clone();
                self.dismiss(move || {
                    let _settle = dispatcher.dismissal_finished();
                    selected.emit(row);
                });
            }
        }
    }
}

impl std::fmt::Debug for ActionSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSheet")
            .field("items", &self.items.len())
            .field("buttons", &self.buttons.len())
            .field("header_height", &self.header_height)
            .field("layout", &self.layout)
            .field("dispatch_state", &self.dispatcher.state())
            .finish()
    }
}
