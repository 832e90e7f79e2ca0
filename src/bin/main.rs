use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use energy_field::{
    Activation, DisplayClass, DrawCommand, FieldConfig, Fill, FrameOutcome, RecordingSurface, Session, Stroke, Visibility,
};
use rand::{SeedableRng, rngs::StdRng};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(5, 8, 20);
// Rings used to approximate the blurred halo around each particle.
const GLOW_RINGS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "energy-field", about = "Ambient particle field background")]
struct Cli {
    /// JSON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,

    /// Use the reduced pool meant for small displays
    #[arg(long)]
    constrained: bool,

    /// Draw a single motionless frame
    #[arg(long)]
    reduced_motion: bool,

    /// Override the pool size
    #[arg(long)]
    particles: Option<usize>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct EnergyFieldApp {
    session: Session,
    // Last rendered frame, replayed on every egui pass so skipped frames don't blank the panel.
    canvas: RecordingSurface,
    surface_available: bool,
    activation: Option<Activation>,
    reduced_motion: bool,
    seed: Option<u64>,
    viewport: egui::Vec2,
    start: Instant,
}

impl EnergyFieldApp {
    fn new(cc: &eframe::CreationContext, config: FieldConfig, cli: &Cli) -> Self {
        Self {
            session: if cli.constrained {
                Session::new(config).with_display_class(DisplayClass::Constrained)
            } else {
                Session::new(config)
            },
            canvas: RecordingSurface::default(),
            surface_available: cc.wgpu_render_state.is_some(),
            activation: None,
            reduced_motion: cli.reduced_motion,
            seed: cli.seed,
            viewport: egui::Vec2::ZERO,
            start: Instant::now(),
        }
    }

    fn activate(&mut self, size: egui::Vec2) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.canvas = RecordingSurface::new(size.x, size.y);
        let surface = self.surface_available.then_some(&self.canvas);
        let activation = self.session.activate(surface, self.reduced_motion, rng);
        log::debug!("activation: {activation:?}");
        self.activation = Some(activation);
        self.viewport = size;
    }

    fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let to_screen = |p: &cgmath::Vector2<f32>| origin + egui::vec2(p.x, p.y);

        for command in self.canvas.commands() {
            match command {
                DrawCommand::Clear => {
                    painter.rect_filled(painter.clip_rect(), 0.0, BACKGROUND);
                }
                DrawCommand::Circle { center, radius, fill } => {
                    let center = to_screen(center);
                    if let Some(glow) = fill.glow {
                        for (ring_radius, alpha) in glow.rings(*radius, GLOW_RINGS) {
                            painter.circle_filled(center, ring_radius, color(fill.color, alpha));
                        }
                    }
                    painter.circle_filled(center, *radius, fill_color(fill));
                }
                DrawCommand::Line { from, to, stroke } => {
                    painter.line_segment([to_screen(from), to_screen(to)], egui_stroke(stroke));
                }
            }
        }
    }
}

fn color(rgb: cgmath::Vector3<f32>, alpha: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        rgb.x as u8,
        rgb.y as u8,
        rgb.z as u8,
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn fill_color(fill: &Fill) -> egui::Color32 {
    color(fill.color, fill.alpha)
}

fn egui_stroke(stroke: &Stroke) -> egui::Stroke {
    egui::Stroke::new(stroke.width, color(stroke.color, stroke.alpha))
}

impl eframe::App for EnergyFieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.start.elapsed();
        let screen = ctx.screen_rect();
        let size = screen.size();

        let hidden = !ctx.input(|i| i.raw.has_focus) || size.x <= 0.0 || size.y <= 0.0;
        self.session.set_visibility(if hidden { Visibility::Hidden } else { Visibility::Visible });

        if !hidden && self.activation.is_none() {
            self.activate(size);
        } else if size != self.viewport {
            self.viewport = size;
            self.session.resize(now, size.x, size.y);
        }

        if self.session.frame(now, &mut self.canvas) == FrameOutcome::Rendered {
            log::trace!("frame at {:?}", now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.paint(ui.painter(), rect.min);
            });

        if self.session.wants_next_frame() {
            ctx.request_repaint();
        } else if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_sub(now));
        }
    }
}

impl Drop for EnergyFieldApp {
    fn drop(&mut self) {
        self.session.shutdown();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => FieldConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => FieldConfig::default(),
    };
    if let Some(count) = cli.particles {
        config.particle_count = count;
        config.constrained_particle_count = count;
    }
    config.validate()?;

    let result = eframe::run_native(
        "Energy Field",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(1280.0, 720.0)),
            ..Default::default()
        },
        Box::new(move |cc| Box::new(EnergyFieldApp::new(cc, config, &cli))),
    );

    // Purely decorative: a host that cannot open a window just doesn't show the field.
    if let Err(err) = result {
        log::warn!("energy field unavailable: {err}");
    }
    Ok(())
}
