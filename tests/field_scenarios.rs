use std::time::Duration;

use cgmath::{Vector3, vec2};
use energy_field::{
    DisplayClass, FieldConfig, FrameOutcome, Particle, ParticleField, RecordingSurface, RenderLoop, Visibility,
};
use pretty_assertions::assert_eq;
use rand::{SeedableRng, rngs::StdRng};

fn particle(x: f32, y: f32, life: f32, decay: f32) -> Particle {
    Particle {
        position: vec2(x, y),
        velocity: vec2(0.0, 0.0),
        size: 2.0,
        life,
        decay,
        color: Vector3::new(40.0, 180.0, 220.0),
    }
}

fn field_of(particles: Vec<Particle>) -> ParticleField {
    ParticleField::from_particles(FieldConfig::default(), particles, 800.0, 600.0, StdRng::seed_from_u64(99))
}

#[test]
fn two_close_particles_are_linked() {
    let mut field = field_of(vec![particle(0.0, 0.0, 1.0, 0.0), particle(50.0, 0.0, 1.0, 0.0)]);
    let mut surface = RecordingSurface::new(800.0, 600.0);
    field.step(&mut surface);

    let lines: Vec<_> = surface.lines().collect();
    assert_eq!(lines.len(), 1);
    let (from, to, stroke) = lines[0];
    assert_eq!((*from, *to), (vec2(0.0, 0.0), vec2(50.0, 0.0)));
    assert!((stroke.alpha - (1.0 - 50.0 / 120.0) * 0.25).abs() < 1e-6);
    assert!((stroke.alpha - 0.1458).abs() < 1e-4);
}

#[test]
fn distant_particles_are_not_linked() {
    let mut field = field_of(vec![particle(0.0, 0.0, 1.0, 0.0), particle(120.0, 0.0, 1.0, 0.0)]);
    let mut surface = RecordingSurface::new(800.0, 600.0);
    field.step(&mut surface);
    assert_eq!(surface.lines().count(), 0);
    assert_eq!(surface.circles().count(), 2);
}

#[test]
fn dying_particle_respawns_after_one_update() {
    let mut field = field_of(vec![particle(400.0, 300.0, 0.003, 0.004)]);
    let color = field.particles()[0].color;

    assert_eq!(field.update(), 1);

    let p = field.particles()[0];
    assert_eq!(p.life, 1.0);
    assert_eq!(p.color, color);
    assert!((0.0..800.0).contains(&p.position.x));
    assert!((0.0..600.0).contains(&p.position.y));
}

#[test]
fn seeded_fields_follow_identical_trajectories() {
    let run = || {
        let field = ParticleField::new(
            FieldConfig::default(),
            1024.0,
            768.0,
            DisplayClass::Standard,
            StdRng::seed_from_u64(2024),
        );
        let mut render_loop = RenderLoop::new(field, false);
        let mut surface = RecordingSurface::new(1024.0, 768.0);
        let mut trajectory = Vec::new();
        for frame in 0..600u64 {
            let now = Duration::from_micros(frame * 6_944);
            if render_loop.frame(now, &mut surface) == FrameOutcome::Rendered {
                trajectory.push(render_loop.field().particles().to_vec());
            }
        }
        trajectory
    };

    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn hidden_page_stops_updates_until_visible() {
    let field = ParticleField::new(
        FieldConfig::default(),
        800.0,
        600.0,
        DisplayClass::Standard,
        StdRng::seed_from_u64(5),
    );
    let mut render_loop = RenderLoop::new(field, false);
    let mut surface = RecordingSurface::new(800.0, 600.0);

    render_loop.frame(Duration::from_millis(17), &mut surface);
    render_loop.set_visibility(Visibility::Hidden);
    let snapshot = render_loop.field().particles().to_vec();
    let frames = render_loop.frames();

    for ms in (34..2_000).step_by(17) {
        render_loop.frame(Duration::from_millis(ms), &mut surface);
    }
    assert_eq!(render_loop.field().particles(), snapshot.as_slice());
    assert_eq!(render_loop.frames(), frames);

    render_loop.set_visibility(Visibility::Visible);
    render_loop.frame(Duration::from_millis(2_017), &mut surface);
    assert_eq!(render_loop.frames(), frames + 1);
}
