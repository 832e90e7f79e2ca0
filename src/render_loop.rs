//! Frame scheduling for the field: rate limiting, debounced resizes, and
//! pausing while the page is hidden.
//!
//! Timestamps are durations since the host started its clock, the same
//! convention as a browser's frame callback time. The loop never blocks; the
//! host asks [`RenderLoop::wants_next_frame`] after each tick to decide whether
//! to schedule another.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::{field::ParticleField, surface::Surface};

/// Caps how often the field updates, independent of the display refresh rate.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Duration,
    last: Duration,
}

impl FrameLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Duration::ZERO,
        }
    }

    /// Whether a frame at `now` should do work. A running frame keeps the
    /// leftover fraction of the interval so the cadence does not drift.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(elapsed) = now.checked_sub(self.last) else {
            return false;
        };
        if elapsed < self.interval {
            return false;
        }

        let leftover = Duration::from_nanos((elapsed.as_nanos() % self.interval.as_nanos().max(1)) as u64);
        self.last = now - leftover;
        true
    }
}

/// Holds the latest value until the trigger stream has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn trigger(&mut self, now: Duration, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.pending.take() {
            Some((deadline, value)) if now >= deadline => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Page hidden; nothing is scheduled until it becomes visible again.
    Paused,
    /// Reduced motion: a single motionless frame is drawn.
    Still { drawn: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Under the rate limit; nothing changed.
    Skipped,
    Rendered,
    /// Paused, or a still frame is already on screen.
    Idle,
}

pub struct RenderLoop<R> {
    field: ParticleField<R>,
    limiter: FrameLimiter,
    resizes: Debouncer<(f32, f32)>,
    state: LoopState,
    frames: u64,
}

impl<R: Rng> RenderLoop<R> {
    pub fn new(field: ParticleField<R>, reduced_motion: bool) -> Self {
        let config = field.config();
        let limiter = FrameLimiter::new(config.frame_interval());
        let resizes = Debouncer::new(config.resize_debounce());
        let state = if reduced_motion {
            LoopState::Still { drawn: false }
        } else {
            LoopState::Running
        };
        info!("energy field started with {} particles ({:?})", field.len(), state);

        Self {
            field,
            limiter,
            resizes,
            state,
            frames: 0,
        }
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames that ran an update and draw.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame<S: Surface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> FrameOutcome {
        if let Some((width, height)) = self.resizes.poll(now) {
            debug!("resizing surface to {width}x{height}");
            surface.set_size(width, height);
            self.field.resize(width, height);
            if let LoopState::Still { drawn } = &mut self.state {
                *drawn = false;
            }
        }

        match self.state {
            LoopState::Paused => FrameOutcome::Idle,
            LoopState::Still { drawn: true } => FrameOutcome::Idle,
            LoopState::Still { drawn: false } => {
                self.field.render(surface);
                self.state = LoopState::Still { drawn: true };
                FrameOutcome::Rendered
            }
            LoopState::Running => {
                if !self.limiter.tick(now) {
                    return FrameOutcome::Skipped;
                }
                self.field.step(surface);
                self.frames += 1;
                FrameOutcome::Rendered
            }
        }
    }

    /// Whether the host should schedule another frame after this one.
    pub fn wants_next_frame(&self) -> bool {
        matches!(self.state, LoopState::Running | LoopState::Still { drawn: false })
    }

    /// When the host must wake up even if it has no frame scheduled, so a
    /// pending resize still lands.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.resizes.deadline()
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        match (self.state, visibility) {
            (LoopState::Running, Visibility::Hidden) => {
                debug!("page hidden, pausing energy field");
                self.state = LoopState::Paused;
            }
            (LoopState::Paused, Visibility::Visible) => {
                debug!("page visible, resuming energy field");
                self.state = LoopState::Running;
            }
            _ => {}
        }
    }

    pub fn resize(&mut self, now: Duration, width: f32, height: f32) {
        self.resizes.trigger(now, (width, height));
    }
}
