//! The drawing surface the field renders onto.

use cgmath::{Vector2, Vector3};

/// Soft halo drawn around a filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub alpha: f32,
}

impl Glow {
    /// Approximates the blur with `count` translucent discs around a circle of
    /// `radius`, outermost first. Returns `(radius, alpha)` per disc; every disc
    /// is visible and opacity grows toward the center.
    pub fn rings(&self, radius: f32, count: usize) -> Vec<(f32, f32)> {
        let n = count as f32;
        (0..count)
            .rev()
            .map(|ring| {
                let reach = (ring + 1) as f32 / n;
                let alpha = self.alpha * (1.0 - ring as f32 / n) / n;
                (radius + self.blur * reach, alpha)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    /// Channels in `0.0..=255.0`.
    pub color: Vector3<f32>,
    pub alpha: f32,
    pub glow: Option<Glow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Vector3<f32>,
    pub alpha: f32,
    pub width: f32,
}

pub trait Surface {
    /// Pixel dimensions as `(width, height)`.
    fn size(&self) -> (f32, f32);
    fn set_size(&mut self, width: f32, height: f32);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, fill: Fill);
    fn stroke_line(&mut self, from: Vector2<f32>, to: Vector2<f32>, stroke: Stroke);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vector2<f32>,
        radius: f32,
        fill: Fill,
    },
    Line {
        from: Vector2<f32>,
        to: Vector2<f32>,
        stroke: Stroke,
    },
}

/// Keeps the commands issued since the last `clear`. Used for headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clears: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames drawn so far.
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn circles(&self) -> impl Iterator<Item = (&Vector2<f32>, f32, &Fill)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle { center, radius, fill } => Some((center, *radius, fill)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Vector2<f32>, &Vector2<f32>, &Stroke)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, stroke } => Some((from, to, stroke)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, fill: Fill) {
        self.commands.push(DrawCommand::Circle { center, radius, fill });
    }

    fn stroke_line(&mut self, from: Vector2<f32>, to: Vector2<f32>, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }
}
