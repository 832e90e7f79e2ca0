//! An ambient "energy field": a small pool of drifting, fading particles with
//! faint links between close neighbours, drawn behind a page.

pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod render_loop;
pub mod session;
pub mod surface;

pub use config::{DisplayClass, FieldConfig};
pub use error::{Error, Result};
pub use field::{Connection, ParticleField, link_alpha};
pub use particle::Particle;
pub use render_loop::{FrameLimiter, FrameOutcome, LoopState, RenderLoop, Visibility};
pub use session::{Activation, Session};
pub use surface::{DrawCommand, Fill, Glow, RecordingSurface, Stroke, Surface};
