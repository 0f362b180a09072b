//! Standard (slide-up) presenter.

use std::time::Duration;

use lamina_core::{Edge, Rect};

use crate::sheet::ActionSheet;

use super::animation::{Easing, Transition, TransitionState};
use super::{
    reject_reentrant_present, reject_unusable_context, Anchor, Completion, PresentationContext,
    SheetPresenter, DEFAULT_TRANSITION,
};

/// Lifecycle of a standard presentation.
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

/// Presents a sheet sliding up from the bottom edge of the containing
/// context, dimming the background behind it. Dismissal reverses the
/// animation. The anchor is ignored entirely; the sheet is always
/// bottom-anchored.
///
/// The renderer samples [`sheet_frame`](Self::sheet_frame) and
/// [`backdrop_opacity`](Self::backdrop_opacity) each frame while
/// [`ActionSheet::update`](crate::ActionSheet::update) drives the
/// transition.
pub struct StandardPresenter {
    duration: Duration,
    easing: Easing,
    backdrop_max_opacity: f32,
    phase: Phase,
    context: Option<PresentationContext>,
    /// Final on-screen frame of the sheet content.
    content_frame: Rect,
    /// Presentation progress: 0.0 fully off-screen, 1.0 fully on-screen.
    progress: f32,
}

impl Default for StandardPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardPresenter {
    /// Create a standard presenter with default timing.
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_TRANSITION,
            easing: Easing::default(),
            backdrop_max_opacity: 0.4,
            phase: Phase::Idle,
            context: None,
            content_frame: Rect::ZERO,
            progress: 0.0,
        }
    }

    /// Set the show/dismiss transition duration using builder pattern.
    ///
    /// `Duration::ZERO` makes present/dismiss complete synchronously.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the transition easing using builder pattern.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the fully-presented backdrop opacity using builder pattern.
    pub fn with_backdrop_opacity(mut self, opacity: f32) -> Self {
        self.backdrop_max_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// The sheet's current frame, slide offset applied, or `None` when
    /// nothing is presented.
    pub fn sheet_frame(&self) -> Option<Rect> {
        let context = self.context?;
        let off_screen_y = context.container.bottom();
        let y = off_screen_y + (self.content_frame.origin.y - off_screen_y) * self.progress;
        Some(Rect::new(
            self.content_frame.origin.x,
            y,
            self.content_frame.width(),
            self.content_frame.height(),
        ))
    }

    /// Current backdrop opacity, following presentation progress.
    pub fn backdrop_opacity(&self) -> f32 {
        self.backdrop_max_opacity * self.progress
    }

    /// Compute the sheet's resting frame from current layout and margins.
    fn compute_frame(sheet: &ActionSheet, context: &PresentationContext) -> Rect {
        let left = sheet.margin(Edge::Left, context);
        let right = sheet.margin(Edge::Right, context);
        let top = sheet.margin(Edge::Top, context);
        let bottom = sheet.margin(Edge::Bottom, context);

        let container = context.container;
        let width = (container.width() - left - right).max(0.0);
        let available = (container.height() - top - bottom).max(0.0);
        let height = sheet.layout().content_height().min(available);

        Rect::new(
            container.origin.x + left,
            container.bottom() - bottom - height,
            width,
            height,
        )
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
                    tracing::debug!(target: "lamina::presenter", "standard presentation finished");
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
                    self.progress = 0.0;
                    tracing::debug!(target: "lamina::presenter", "standard dismissal finished");
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

impl SheetPresenter for StandardPresenter {
    fn present(
        &mut self,
        sheet: &ActionSheet,
        context: PresentationContext,
        _anchor: Anchor,
        completion: Completion,
    ) {
        if reject_reentrant_present(self.is_presenting(), "standard") {
            return;
        }
        if reject_unusable_context(&context, "standard") {
            return;
        }

        self.content_frame = Self::compute_frame(sheet, &context);
        self.context = Some(context);
        self.progress = 0.0;

        let mut transition = Transition::new(self.duration).with_easing(self.easing);
        transition.start();
        self.phase = Phase::Presenting {
            transition,
            completion: Some(completion),
        };
        tracing::debug!(
            target: "lamina::presenter",
            frame = ?self.content_frame,
            "standard presentation started"
        );

        self.pump();
    }

    fn dismiss(&mut self, completion: Completion) {
        match &mut self.phase {
            Phase::Idle => {
                // Nothing on screen; teardown is a no-op but the completion
                // contract still holds.
                tracing::debug!(target: "lamina::presenter", "dismiss with nothing presented");
                completion();
                return;
            }
            Phase::Presenting {
                completion: pending,
                ..
            } => {
                // Caller error: dismiss raced an in-flight present. Settle
                // the presentation synchronously so its completion still
                // fires exactly once, then dismiss normally.
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
                // Second dismiss while dismissing: both completions fire
                // when the one teardown finishes.
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
        tracing::debug!(target: "lamina::presenter", "standard dismissal started");

        self.pump();
    }

    fn refresh(&mut self, sheet: &ActionSheet) {
        if let Some(context) = self.context {
            self.content_frame = Self::compute_frame(sheet, &context);
            tracing::trace!(
                target: "lamina::presenter",
                frame = ?self.content_frame,
                "standard presenter repositioned"
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
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use lamina_core::EdgeInsets;

    use crate::appearance::RowAppearance;
    use crate::row::Row;
    use crate::sheet::ActionSheet;

    use super::*;

    fn test_sheet() -> ActionSheet {
        let rows = vec![
            Row::item("a").with_appearance(RowAppearance::with_height(44.0)),
            Row::item("b").with_appearance(RowAppearance::with_height(44.0)),
            Row::ok_button("ok").with_appearance(RowAppearance::with_height(50.0)),
        ];
        ActionSheet::new(rows, Arc::new(parking_lot::Mutex::new(StandardPresenter::new())))
    }

    fn context() -> PresentationContext {
        PresentationContext::new(Rect::new(0.0, 0.0, 320.0, 640.0))
    }

    fn counter() -> (Arc<AtomicUsize>, Completion) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        (
            count,
            Box::new(move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_zero_duration_present_completes_synchronously() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        let (count, completion) = counter();

        presenter.present(&sheet, context(), Anchor::View(Rect::ZERO), completion);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(presenter.is_presenting());
        assert_eq!(presenter.backdrop_opacity(), 0.4);
    }

    #[test]
    fn test_resting_frame_respects_margins_and_content_height() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        presenter.present(
            &sheet,
            context(),
            Anchor::View(Rect::ZERO),
            Box::new(|| {}),
        );

        // 44 + 44 + 50 + one 15.0 inter-section gap
        let expected_height = 153.0;
        let frame = presenter.sheet_frame().unwrap();
        assert_eq!(frame.origin.x, 15.0);
        assert_eq!(frame.width(), 320.0 - 30.0);
        assert_eq!(frame.height(), expected_height);
        assert_eq!(frame.bottom(), 640.0 - 15.0);
    }

    #[test]
    fn test_dismiss_completion_fires_exactly_once() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        presenter.present(
            &sheet,
            context(),
            Anchor::View(Rect::ZERO),
            Box::new(|| {}),
        );

        let (count, completion) = counter();
        presenter.dismiss(completion);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!presenter.is_presenting());
        assert_eq!(presenter.sheet_frame(), None);
        presenter.update();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dismiss_with_nothing_presented_still_completes() {
        let mut presenter = StandardPresenter::new();
        let (count, completion) = counter();

        presenter.dismiss(completion);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_present_is_ignored() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        presenter.present(
            &sheet,
            context(),
            Anchor::View(Rect::ZERO),
            Box::new(|| {}),
        );

        let (count, completion) = counter();
        presenter.present(&sheet, context(), Anchor::View(Rect::ZERO), completion);

        // The rejected call's completion never fires.
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_present_into_empty_container_is_ignored() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        let (count, completion) = counter();

        presenter.present(
            &sheet,
            PresentationContext::new(Rect::ZERO),
            Anchor::View(Rect::ZERO),
            completion,
        );

        assert!(!presenter.is_presenting());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_animated_present_completes_after_updates() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::from_millis(5));
        let (count, completion) = counter();

        presenter.present(&sheet, context(), Anchor::View(Rect::ZERO), completion);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(presenter.backdrop_opacity() < 0.4);

        std::thread::sleep(Duration::from_millis(10));
        presenter.update();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(presenter.backdrop_opacity(), 0.4);
    }

    #[test]
    fn test_negative_safe_insets_clamp_to_minimum_margins() {
        let sheet = test_sheet();
        let mut presenter = StandardPresenter::new().with_duration(Duration::ZERO);
        let context = PresentationContext::new(Rect::new(0.0, 0.0, 320.0, 640.0))
            .with_safe_insets(EdgeInsets::uniform(-20.0));

        presenter.present(&sheet, context, Anchor::View(Rect::ZERO), Box::new(|| {}));

        let frame = presenter.sheet_frame().unwrap();
        // Minimum insets (15.0) win over the degenerate available space.
        assert_eq!(frame.origin.x, 15.0);
        assert_eq!(frame.bottom(), 640.0 - 15.0);
    }
}
