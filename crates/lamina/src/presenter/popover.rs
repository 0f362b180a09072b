//! Popover presenter.

use std::time::Duration;

use lamina_core::{EdgeInsets, Rect};

use crate::sheet::ActionSheet;

use super::animation::{Easing, Transition, TransitionState};
use super::{
    reject_reentrant_present, reject_unusable_context, Anchor, Completion, PresentationContext,
    SheetPresenter, DEFAULT_TRANSITION,
};

/// Which way the popover's arrow points, toward the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Panel sits below the anchor, arrow points up at it.
    Up,
    /// Panel sits above the anchor, arrow points down at it.
    Down,
    /// Panel sits right of the anchor, arrow points left at it.
    Left,
    /// Panel sits left of the anchor, arrow points right at it.
    Right,
}

/// Lifecycle of a popover presentation.
enum Phase {
    Idle,
    Presenting {
        transition: Transition,
        completion: Option<Completion>,
    },
    Presented,
    Dismissing {
        transition: Transition,
        completion: Option<Completion>,
    },
}

/// Presents a sheet as a floating panel anchored to a view or bar item,
/// with an arrow pointing at the anchor.
///
/// Placement prefers the space below the anchor, flips above when the panel
/// would overflow the container, and shifts sideways to stay inside bounds.
/// View anchors may fall back to a horizontal side when neither vertical
/// slot fits; bar items keep the arrow vertical, matching how bars hug
/// container edges. Content height feeds the panel size, so
/// [`refresh`](SheetPresenter::refresh) recomputes the whole rect.
pub struct PopoverPresenter {
    duration: Duration,
    easing: Easing,
    arrow_size: f32,
    phase: Phase,
    context: Option<PresentationContext>,
    anchor: Option<Anchor>,
    panel_frame: Rect,
    arrow: ArrowDirection,
    /// Fade progress: 0.0 invisible, 1.0 fully shown.
    progress: f32,
}

impl Default for PopoverPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PopoverPresenter {
    /// Create a popover presenter with default timing.
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_TRANSITION,
            easing: Easing::default(),
            arrow_size: 8.0,
            phase: Phase::Idle,
            context: None,
            anchor: None,
            panel_frame: Rect::ZERO,
            arrow: ArrowDirection::Up,
            progress: 0.0,
        }
    }

    /// Set the fade transition duration using builder pattern.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the transition easing using builder pattern.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the arrow length using builder pattern.
    pub fn with_arrow_size(mut self, size: f32) -> Self {
        self.arrow_size = size.max(0.0);
        self
    }

    /// The panel's frame, or `None` when nothing is presented.
    pub fn panel_frame(&self) -> Option<Rect> {
        self.context.map(|_| self.panel_frame)
    }

    /// The arrow direction, or `None` when nothing is presented.
    pub fn arrow_direction(&self) -> Option<ArrowDirection> {
        self.context.map(|_| self.arrow)
    }

    /// Current panel opacity, following presentation progress.
    pub fn opacity(&self) -> f32 {
        self.progress
    }

    /// Bounds the panel must stay inside: the container minus any
    /// non-negative safe-area insets.
    fn usable_bounds(context: &PresentationContext) -> Rect {
        let insets = context.safe_insets;
        context.container.inset_by(EdgeInsets::new(
            insets.top.max(0.0),
            insets.left.max(0.0),
            insets.right.max(0.0),
            insets.bottom.max(0.0),
        ))
    }

    /// Compute the panel rect and arrow direction for the current content.
    fn compute_panel(
        &self,
        sheet: &ActionSheet,
        context: &PresentationContext,
        anchor: &Anchor,
    ) -> (Rect, ArrowDirection) {
        let bounds = Self::usable_bounds(context);
        let anchor_rect = anchor.rect();

        let width = sheet.preferred_popover_width().min(bounds.width());
        let height = sheet.layout().content_height().min(bounds.height());

        let below_y = anchor_rect.bottom() + self.arrow_size;
        let above_y = anchor_rect.origin.y - self.arrow_size - height;

        let fits_below = below_y + height <= bounds.bottom();
        let fits_above = above_y >= bounds.origin.y;

        let (mut x, y, arrow) = if fits_below || (!fits_above && anchor.is_bar_item()) {
            (
                anchor_rect.center().x - width / 2.0,
                below_y.min(bounds.bottom() - height),
                ArrowDirection::Up,
            )
        } else if fits_above || anchor.is_bar_item() {
            (
                anchor_rect.center().x - width / 2.0,
                above_y.max(bounds.origin.y),
                ArrowDirection::Down,
            )
        } else {
            // Neither vertical slot fits a view anchor; fall back to a side.
            let right_x = anchor_rect.right() + self.arrow_size;
            let side_y = (anchor_rect.center().y - height / 2.0)
                .clamp(bounds.origin.y, (bounds.bottom() - height).max(bounds.origin.y));
            if right_x + width <= bounds.right() {
                return (Rect::new(right_x, side_y, width, height), ArrowDirection::Left);
            }
            let left_x = (anchor_rect.origin.x - self.arrow_size - width).max(bounds.origin.x);
            return (Rect::new(left_x, side_y, width, height), ArrowDirection::Right);
        };

        // Shift horizontally to stay within bounds.
        if x < bounds.origin.x {
            x = bounds.origin.x;
        } else if x + width > bounds.right() {
            x = bounds.right() - width;
        }

        (Rect::new(x, y, width, height), arrow)
    }

    fn pump(&mut self) {
        match &mut self.phase {
            Phase::Presenting {
                transition,
                completion,
            } => match transition.poll() {
                TransitionState::Running { progress } => self.progress = progress,
                TransitionState::Finished => {
                    let completion = completion.take();
                    self.phase = Phase::Presented;
                    self.progress = 1.0;
                    tracing::debug!(target: "lamina::presenter", "popover presentation finished");
                    if let Some(complete) = completion {
                        complete();
                    }
                }
                TransitionState::Idle => {}
            },
            Phase::Dismissing {
                transition,
                completion,
            } => match transition.poll() {
                TransitionState::Running { progress } => self.progress = 1.0 - progress,
                TransitionState::Finished => {
                    let completion = completion.take();
                    self.phase = Phase::Idle;
                    self.context = None;
                    self.anchor = None;
                    self.progress = 0.0;
                    tracing::debug!(target: "lamina::presenter", "popover dismissal finished");
                    if let Some(complete) = completion {
                        complete();
                    }
                }
                TransitionState::Idle => {}
            },
            Phase::Idle | Phase::Presented => {}
        }
    }
}

impl SheetPresenter for PopoverPresenter {
    fn present(
        &mut self,
        sheet: &ActionSheet,
        context: PresentationContext,
        anchor: Anchor,
        completion: Completion,
    ) {
        if reject_reentrant_present(self.is_presenting(), "popover") {
            return;
        }
        if reject_unusable_context(&context, "popover") {
            return;
        }

        let (panel, arrow) = self.compute_panel(sheet, &context, &anchor);
        self.panel_frame = panel;
        self.arrow = arrow;
        self.context = Some(context);
        self.anchor = Some(anchor);
        self.progress = 0.0;

        let mut transition = Transition::new(self.duration).with_easing(self.easing);
        transition.start();
        self.phase = Phase::Presenting {
            transition,
            completion: Some(completion),
        };
        tracing::debug!(
            target: "lamina::presenter",
            panel = ?self.panel_frame,
            arrow = ?self.arrow,
            "popover presentation started"
        );

        self.pump();
    }

    fn dismiss(&mut self, completion: Completion) {
        match &mut self.phase {
            Phase::Idle => {
                tracing::debug!(target: "lamina::presenter", "dismiss with nothing presented");
                completion();
                return;
            }
            Phase::Presenting {
                completion: pending,
                ..
            } => {
                tracing::warn!(
                    target: "lamina::presenter",
                    "dismiss() during an in-flight presentation; settling presentation first"
                );
                if let Some(pending) = pending.take() {
                    pending();
                }
                self.phase = Phase::Presented;
                self.progress = 1.0;
            }
            Phase::Dismissing {
                completion: pending,
                ..
            } => {
                let previous = pending.take();
                *pending = Some(Box::new(move || {
                    if let Some(previous) = previous {
                        previous();
                    }
                    completion();
                }));
                return;
            }
            Phase::Presented => {}
        }

        let mut transition = Transition::new(self.duration).with_easing(self.easing);
        transition.start();
        self.phase = Phase::Dismissing {
            transition,
            completion: Some(completion),
        };
        tracing::debug!(target: "lamina::presenter", "popover dismissal started");

        self.pump();
    }

    fn refresh(&mut self, sheet: &ActionSheet) {
        if let (Some(context), Some(anchor)) = (self.context, self.anchor) {
            let (panel, arrow) = self.compute_panel(sheet, &context, &anchor);
            self.panel_frame = panel;
            self.arrow = arrow;
            tracing::trace!(
                target: "lamina::presenter",
                panel = ?self.panel_frame,
                "popover repositioned"
            );
        }
    }

    fn update(&mut self) {
        self.pump();
    }

    fn is_presenting(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::appearance::RowAppearance;
    use crate::row::Row;

    use super::*;

    fn test_sheet() -> ActionSheet {
        let rows = vec![
            Row::item("a").with_appearance(RowAppearance::with_height(44.0)),
            Row::item("b").with_appearance(RowAppearance::with_height(44.0)),
        ];
        ActionSheet::new(rows, Arc::new(parking_lot::Mutex::new(PopoverPresenter::new())))
    }

    fn context() -> PresentationContext {
        PresentationContext::new(Rect::new(0.0, 0.0, 768.0, 1024.0))
    }

    fn present(
        presenter: &mut PopoverPresenter,
        sheet: &ActionSheet,
        context: PresentationContext,
        anchor: Anchor,
    ) {
        presenter.present(sheet, context, anchor, Box::new(|| {}));
    }

    #[test]
    fn test_panel_prefers_below_anchor() {
        let sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        let anchor = Anchor::View(Rect::new(350.0, 100.0, 60.0, 40.0));

        present(&mut presenter, &sheet, context(), anchor);

        let panel = presenter.panel_frame().unwrap();
        assert_eq!(presenter.arrow_direction(), Some(ArrowDirection::Up));
        assert_eq!(panel.origin.y, 140.0 + 8.0);
        assert_eq!(panel.width(), 300.0);
        assert_eq!(panel.height(), 88.0);
        // Centered on the anchor's midpoint.
        assert_eq!(panel.center().x, 380.0);
    }

    #[test]
    fn test_panel_flips_above_when_below_overflows() {
        let sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        let anchor = Anchor::View(Rect::new(350.0, 980.0, 60.0, 40.0));

        present(&mut presenter, &sheet, context(), anchor);

        let panel = presenter.panel_frame().unwrap();
        assert_eq!(presenter.arrow_direction(), Some(ArrowDirection::Down));
        assert_eq!(panel.bottom(), 980.0 - 8.0);
    }

    #[test]
    fn test_panel_shifts_to_stay_inside_bounds() {
        let sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        let anchor = Anchor::View(Rect::new(10.0, 100.0, 40.0, 40.0));

        present(&mut presenter, &sheet, context(), anchor);

        let panel = presenter.panel_frame().unwrap();
        assert_eq!(panel.origin.x, 0.0);
    }

    #[test]
    fn test_bar_item_keeps_arrow_vertical() {
        let sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        // A bar item at the very bottom edge: below never fits, above does not
        // fit the anchor's own height either, yet the arrow stays vertical.
        let anchor = Anchor::BarItem(Rect::new(700.0, 1000.0, 44.0, 24.0));
        let short = PresentationContext::new(Rect::new(0.0, 0.0, 768.0, 1024.0));

        present(&mut presenter, &sheet, short, anchor);

        let arrow = presenter.arrow_direction().unwrap();
        assert!(matches!(arrow, ArrowDirection::Up | ArrowDirection::Down));
    }

    #[test]
    fn test_refresh_resizes_panel_after_content_change() {
        let mut sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        let anchor = Anchor::View(Rect::new(350.0, 100.0, 60.0, 40.0));
        present(&mut presenter, &sheet, context(), anchor);
        assert_eq!(presenter.panel_frame().unwrap().height(), 88.0);

        sheet.setup(vec![
            Row::item("only").with_appearance(RowAppearance::with_height(44.0)),
        ]);
        presenter.refresh(&sheet);

        assert_eq!(presenter.panel_frame().unwrap().height(), 44.0);
    }

    #[test]
    fn test_safe_insets_constrain_panel_bounds() {
        let sheet = test_sheet();
        let mut presenter = PopoverPresenter::new().with_duration(Duration::ZERO);
        let anchor = Anchor::View(Rect::new(10.0, 100.0, 40.0, 40.0));
        let context = context().with_safe_insets(EdgeInsets::uniform(20.0));

        present(&mut presenter, &sheet, context, anchor);

        let panel = presenter.panel_frame().unwrap();
        assert_eq!(panel.origin.x, 20.0);
    }
}
