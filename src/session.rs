//! One page session's background decoration.
//!
//! The session is the only owner of the render loop. Hosts call
//! [`Session::activate`] from wherever their startup path happens to run;
//! repeated calls are harmless and never start a second loop.

use std::time::Duration;

use log::{info, warn};
use rand::{Rng, rngs::StdRng};

use crate::{
    config::{DisplayClass, FieldConfig},
    field::ParticleField,
    render_loop::{FrameOutcome, RenderLoop, Visibility},
    surface::Surface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    AlreadyActive,
    /// No drawing surface; the session stays inert for good.
    Unavailable,
    Ended,
}

enum SessionState<R> {
    Fresh,
    Active(RenderLoop<R>),
    Inert,
    Ended,
}

pub struct Session<R = StdRng> {
    config: FieldConfig,
    // Forced display class; otherwise classified from the surface width.
    display_class: Option<DisplayClass>,
    state: SessionState<R>,
}

impl<R: Rng> Session<R> {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            display_class: None,
            state: SessionState::Fresh,
        }
    }

    pub fn with_display_class(mut self, class: DisplayClass) -> Self {
        self.display_class = Some(class);
        self
    }

    pub fn activate<S: Surface + ?Sized>(&mut self, surface: Option<&S>, reduced_motion: bool, rng: R) -> Activation {
        match self.state {
            SessionState::Fresh => {}
            SessionState::Active(_) => return Activation::AlreadyActive,
            SessionState::Inert => return Activation::Unavailable,
            SessionState::Ended => return Activation::Ended,
        }

        let Some(surface) = surface else {
            warn!("no drawing surface, energy field disabled");
            self.state = SessionState::Inert;
            return Activation::Unavailable;
        };

        let (width, height) = surface.size();
        let class = self
            .display_class
            .unwrap_or_else(|| DisplayClass::classify(width, &self.config));
        info!("activating energy field on {width}x{height} surface ({class:?})");
        let field = ParticleField::new(self.config.clone(), width, height, class, rng);
        self.state = SessionState::Active(RenderLoop::new(field, reduced_motion));
        Activation::Started
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn render_loop(&self) -> Option<&RenderLoop<R>> {
        match &self.state {
            SessionState::Active(render_loop) => Some(render_loop),
            _ => None,
        }
    }

    pub fn frame<S: Surface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> FrameOutcome {
        match &mut self.state {
            SessionState::Active(render_loop) => render_loop.frame(now, surface),
            _ => FrameOutcome::Idle,
        }
    }

    pub fn wants_next_frame(&self) -> bool {
        self.render_loop().is_some_and(RenderLoop::wants_next_frame)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.render_loop().and_then(RenderLoop::next_deadline)
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if let SessionState::Active(render_loop) = &mut self.state {
            render_loop.set_visibility(visibility);
        }
    }

    pub fn resize(&mut self, now: Duration, width: f32, height: f32) {
        if let SessionState::Active(render_loop) = &mut self.state {
            render_loop.resize(now, width, height);
        }
    }

    /// Drops the loop and its pool. The session cannot be reactivated.
    pub fn shutdown(&mut self) {
        if let SessionState::Active(render_loop) = std::mem::replace(&mut self.state, SessionState::Ended) {
            info!("energy field stopped after {} frames", render_loop.frames());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use rand::SeedableRng;

    fn session() -> Session<StdRng> {
        Session::new(FieldConfig::default())
    }

    #[test]
    fn activation_is_idempotent() {
        let mut session = session();
        let surface = RecordingSurface::new(1280.0, 720.0);

        assert_eq!(session.activate(Some(&surface), false, StdRng::seed_from_u64(1)), Activation::Started);
        let first = session.render_loop().unwrap().field().particles().to_vec();

        assert_eq!(session.activate(Some(&surface), false, StdRng::seed_from_u64(2)), Activation::AlreadyActive);
        assert_eq!(session.render_loop().unwrap().field().particles(), first.as_slice());
    }

    #[test]
    fn missing_surface_leaves_session_inert() {
        let mut session = session();
        assert_eq!(
            session.activate::<RecordingSurface>(None, false, StdRng::seed_from_u64(1)),
            Activation::Unavailable
        );

        let surface = RecordingSurface::new(1280.0, 720.0);
        assert_eq!(session.activate(Some(&surface), false, StdRng::seed_from_u64(1)), Activation::Unavailable);

        let mut surface = surface;
        assert_eq!(session.frame(Duration::from_secs(1), &mut surface), FrameOutcome::Idle);
        assert!(!session.wants_next_frame());
        assert_eq!(surface.clears(), 0);
    }

    #[test]
    fn narrow_surface_gets_constrained_pool() {
        let mut session = session();
        let surface = RecordingSurface::new(375.0, 812.0);
        session.activate(Some(&surface), false, StdRng::seed_from_u64(4));
        assert_eq!(session.render_loop().unwrap().field().len(), 25);
    }

    #[test]
    fn forced_display_class_wins_over_surface_width() {
        let mut session = session().with_display_class(DisplayClass::Constrained);
        let surface = RecordingSurface::new(1920.0, 1080.0);
        session.activate(Some(&surface), false, StdRng::seed_from_u64(4));
        assert_eq!(session.render_loop().unwrap().field().len(), 25);
    }

    #[test]
    fn visibility_pauses_and_resumes_through_the_session() {
        let mut session = session();
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        session.activate(Some(&surface), false, StdRng::seed_from_u64(8));
        assert_eq!(session.frame(Duration::from_millis(20), &mut surface), FrameOutcome::Rendered);

        session.set_visibility(Visibility::Hidden);
        assert!(!session.wants_next_frame());
        let frozen = session.render_loop().unwrap().field().particles().to_vec();
        assert_eq!(session.frame(Duration::from_millis(500), &mut surface), FrameOutcome::Idle);
        assert_eq!(session.render_loop().unwrap().field().particles(), frozen.as_slice());

        session.set_visibility(Visibility::Visible);
        assert!(session.wants_next_frame());
        assert_eq!(session.frame(Duration::from_millis(520), &mut surface), FrameOutcome::Rendered);
        assert_ne!(session.render_loop().unwrap().field().particles(), frozen.as_slice());
    }

    #[test]
    fn resize_reaches_the_surface_after_debounce() {
        let mut session = session();
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        session.activate(Some(&surface), false, StdRng::seed_from_u64(8));

        session.resize(Duration::from_millis(100), 640.0, 480.0);
        assert_eq!(session.next_deadline(), Some(Duration::from_millis(350)));
        session.frame(Duration::from_millis(200), &mut surface);
        assert_eq!(surface.size(), (1280.0, 720.0));

        session.frame(Duration::from_millis(350), &mut surface);
        assert_eq!(surface.size(), (640.0, 480.0));
        assert_eq!(session.render_loop().unwrap().field().bounds(), (640.0, 480.0));
    }

    #[test]
    fn shutdown_is_final() {
        let mut session = session();
        let surface = RecordingSurface::new(1280.0, 720.0);
        session.activate(Some(&surface), false, StdRng::seed_from_u64(1));
        session.shutdown();

        assert!(!session.is_active());
        assert_eq!(session.activate(Some(&surface), false, StdRng::seed_from_u64(1)), Activation::Ended);
    }
}
