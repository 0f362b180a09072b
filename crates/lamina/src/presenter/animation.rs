//! Transition timing for presenters.
//!
//! Presenters own *when* a sheet is where, not how it is painted. A
//! [`Transition`] tracks the progress of one show or dismiss animation;
//! renderers sample the eased progress each frame to place the sheet and
//! fade the backdrop.

use std::time::{Duration, Instant};

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    #[default]
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
}

/// Apply an easing function to a progress value in `0.0..=1.0`.
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => t * (2.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
    }
}

/// Current state of a transition, as observed by one [`Transition::poll`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    /// No transition in progress.
    Idle,
    /// Transition is running; `progress` is eased, in `0.0..1.0`.
    Running {
        /// Eased progress from 0.0 to 1.0.
        progress: f32,
    },
    /// The transition crossed its end since the last poll. Reported exactly
    /// once per `start`.
    Finished,
}

/// A one-shot animation clock for a show or dismiss.
///
/// A zero [`Duration`] finishes on the first poll, which presenters issue
/// inline, so an unanimated presentation completes synchronously.
#[derive(Debug, Clone)]
pub struct Transition {
    easing: Easing,
    duration: Duration,
    start_time: Option<Instant>,
    running: bool,
}

impl Transition {
    /// Create a transition with the given duration and default easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            easing: Easing::default(),
            duration,
            start_time: None,
            running: false,
        }
    }

    /// Set the easing function using builder pattern.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Get the transition duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Check if the transition is currently running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the clock. Restarting an in-flight transition rewinds it.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.running = true;
    }

    /// Advance the transition and report its state.
    ///
    /// Returns `Finished` exactly once when the clock crosses its duration;
    /// subsequent polls report `Idle`.
    pub fn poll(&mut self) -> TransitionState {
        if !self.running {
            return TransitionState::Idle;
        }
        let Some(start_time) = self.start_time else {
            return TransitionState::Idle;
        };

        let raw_progress = if self.duration.is_zero() {
            1.0
        } else {
            (start_time.elapsed().as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        if raw_progress >= 1.0 {
            self.running = false;
            self.start_time = None;
            return TransitionState::Finished;
        }

        TransitionState::Running {
            progress: ease(self.easing, raw_progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(ease(easing, 0.0), 0.0);
            assert_eq!(ease(easing, 1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_shapes() {
        assert!(ease(Easing::EaseIn, 0.5) < 0.5);
        assert!(ease(Easing::EaseOut, 0.5) > 0.5);
        assert_eq!(ease(Easing::Linear, 0.25), 0.25);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_poll() {
        let mut transition = Transition::new(Duration::ZERO);
        assert_eq!(transition.poll(), TransitionState::Idle);

        transition.start();
        assert_eq!(transition.poll(), TransitionState::Finished);
        assert_eq!(transition.poll(), TransitionState::Idle);
        assert!(!transition.is_running());
    }

    #[test]
    fn test_nonzero_duration_runs_then_finishes() {
        let mut transition = Transition::new(Duration::from_millis(5));
        transition.start();

        match transition.poll() {
            TransitionState::Running { progress } => assert!((0.0..1.0).contains(&progress)),
            other => panic!("expected Running, got {other:?}"),
        }

        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(transition.poll(), TransitionState::Finished);
        assert_eq!(transition.poll(), TransitionState::Idle);
    }
}
