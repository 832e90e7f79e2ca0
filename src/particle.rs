use cgmath::{Vector2, Vector3, vec2, vec3};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub size: f32,
    pub life: f32,
    /// Life lost per update.
    pub decay: f32,
    /// RGB in `0.0..=255.0`, fixed for the lifetime of the pool slot.
    pub color: Vector3<f32>,
}

impl Particle {
    /// Creates a particle with a fresh color and random transient state.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let color = vec3(
            rng.gen_range(0.0..100.0),
            rng.gen_range(150.0..250.0),
            rng.gen_range(200.0..255.0),
        );
        let mut particle = Particle {
            position: vec2(0.0, 0.0),
            velocity: vec2(0.0, 0.0),
            size: 0.0,
            life: 1.0,
            decay: 0.0,
            color,
        };
        particle.respawn(rng, width, height);
        particle
    }

    /// Reinitializes everything except the color.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.position = vec2(coordinate(rng, width), coordinate(rng, height));
        self.size = rng.gen_range(1.0..3.5);
        self.velocity = vec2(rng.gen_range(-0.75..0.75), rng.gen_range(-0.75..0.75));
        self.life = 1.0;
        self.decay = rng.gen_range(0.004..0.012);
    }

    pub fn advance(&mut self) {
        self.position += self.velocity;
        self.life -= self.decay;
    }

    /// Dead, or drifted more than `margin` outside `[0, width] x [0, height]`.
    pub fn is_spent(&self, width: f32, height: f32, margin: f32) -> bool {
        self.life <= 0.0
            || self.position.x < -margin
            || self.position.x > width + margin
            || self.position.y < -margin
            || self.position.y > height + margin
    }
}

// A zero-sized surface (e.g. a minimized window) has no valid range to sample from.
fn coordinate<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}
