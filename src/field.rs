//! The particle pool and its per-frame update and render passes.

use cgmath::{InnerSpace, Vector3};
use rand::{Rng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    config::{DisplayClass, FieldConfig},
    particle::Particle,
    surface::{Fill, Glow, Stroke, Surface},
};

/// A line between two particles closer than the link distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Line opacity for two particles `distance` apart, or `None` if they are too far to link.
pub fn link_alpha(distance: f32, link_distance: f32, max_alpha: f32) -> Option<f32> {
    if distance < link_distance {
        Some((1.0 - distance / link_distance) * max_alpha)
    } else {
        None
    }
}

pub struct ParticleField<R = StdRng> {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    config: FieldConfig,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    pub fn new(config: FieldConfig, width: f32, height: f32, class: DisplayClass, mut rng: R) -> Self {
        let count = config.pool_size(class);
        let particles = (0..count)
            .map(|_| Particle::spawn(&mut rng, width, height))
            .collect();

        Self {
            particles,
            width,
            height,
            config,
            rng,
        }
    }

    /// Builds a field around an explicit pool.
    pub fn from_particles(config: FieldConfig, particles: Vec<Particle>, width: f32, height: f32, rng: R) -> Self {
        Self {
            particles,
            width,
            height,
            config,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Adopts new surface bounds. Positions are left alone; strays respawn on their own.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Advances every particle one step, respawning the spent ones in place.
    /// Returns how many respawned.
    pub fn update(&mut self) -> usize {
        let (width, height, margin) = (self.width, self.height, self.config.respawn_margin);
        let mut respawned = 0;

        for particle in &mut self.particles {
            particle.advance();
            if particle.is_spent(width, height, margin) {
                particle.respawn(&mut self.rng, width, height);
                respawned += 1;
            }
        }

        respawned
    }

    /// All linked pairs `(i, j)` with `i < j`, ordered by `i` then `j`.
    pub fn connections(&self) -> Vec<Connection> {
        let particles = &self.particles;
        let link_distance = self.config.link_distance;
        let max_alpha = self.config.link_alpha;

        (0..particles.len())
            .into_par_iter()
            .flat_map_iter(|a| {
                (a + 1..particles.len()).filter_map(move |b| {
                    let distance = (particles[a].position - particles[b].position).magnitude();
                    link_alpha(distance, link_distance, max_alpha).map(|alpha| Connection {
                        a,
                        b,
                        distance,
                        alpha,
                    })
                })
            })
            .collect()
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();

        for particle in &self.particles {
            let alpha = particle.life * self.config.fill_alpha;
            surface.fill_circle(
                particle.position,
                particle.size,
                Fill {
                    color: particle.color,
                    alpha,
                    glow: Some(Glow {
                        blur: self.config.glow_blur,
                        alpha: particle.life * self.config.glow_alpha,
                    }),
                },
            );
        }

        let [r, g, b] = self.config.link_color;
        let color = Vector3::new(r as f32, g as f32, b as f32);
        for connection in self.connections() {
            surface.stroke_line(
                self.particles[connection.a].position,
                self.particles[connection.b].position,
                Stroke {
                    color,
                    alpha: connection.alpha,
                    width: self.config.link_width,
                },
            );
        }
    }

    /// One frame: update, then draw the state that update produced.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.update();
        self.render(surface);
    }
}
