//! Windowed viewer for the droplet animation
//!
//! The simulation clock runs on its own thread and publishes every frame
//! into a shared slot; the window paints whatever frame is newest.

use crate::scene::{self, Leaf, SCENE_HEIGHT, SCENE_WIDTH};
use eframe::egui;
use leafdrop_core::{
    Droplet, FrameSnapshot, MonotonicTime, QuitFlag, RenderError, RenderSink, RunReport,
    SimError, SimulationClock, SplashParticle,
};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{info, warn};

const WINDOW_TITLE: &str = "Water Droplet from Leaf";

type SharedFrame = Arc<Mutex<Option<FrameSnapshot>>>;
type SimHandle = JoinHandle<Result<RunReport, SimError>>;
type SimSlot = Arc<Mutex<Option<SimHandle>>>;

/// Publishes frames to the window and wakes it up
struct SharedFrameSink {
    latest: SharedFrame,
    repaint: egui::Context,
}

impl RenderSink for SharedFrameSink {
    fn render_frame(
        &mut self,
        droplets: &[Droplet],
        particles: &[SplashParticle],
    ) -> Result<(), RenderError> {
        let mut slot = self
            .latest
            .lock()
            .map_err(|_| RenderError::new("frame slot poisoned"))?;
        *slot = Some(FrameSnapshot::capture(droplets, particles));
        drop(slot);
        self.repaint.request_repaint();
        Ok(())
    }
}

/// Scene space to screen space: uniform scale, centred
struct SceneTransform {
    origin: egui::Pos2,
    scale: f32,
}

impl SceneTransform {
    fn fit(rect: egui::Rect) -> Self {
        let scale = (rect.width() / SCENE_WIDTH).min(rect.height() / SCENE_HEIGHT);
        let size = egui::vec2(SCENE_WIDTH * scale, SCENE_HEIGHT * scale);
        Self {
            origin: rect.center() - size / 2.0,
            scale,
        }
    }

    fn pos(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x * self.scale, y * self.scale)
    }

    fn points(&self, points: &[egui::Pos2]) -> Vec<egui::Pos2> {
        points.iter().map(|p| self.pos(p.x, p.y)).collect()
    }
}

/// Window application
pub struct ViewerApp {
    latest: SharedFrame,
    quit: QuitFlag,
    sim: SimSlot,
    leaf: Leaf,
}

impl ViewerApp {
    fn new(latest: SharedFrame, quit: QuitFlag, sim: SimSlot) -> Self {
        Self {
            latest,
            quit,
            sim,
            leaf: Leaf::new(),
        }
    }

    /// The simulation thread exits on its own only after a failed tick
    fn simulation_finished(&self) -> bool {
        match self.sim.lock() {
            Ok(slot) => slot.as_ref().is_some_and(|handle| handle.is_finished()),
            Err(_) => true,
        }
    }

    fn current_frame(&self) -> Option<FrameSnapshot> {
        match self.latest.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        }
    }

    fn paint_background(&self, painter: &egui::Painter, view: &SceneTransform) {
        let half = (SCENE_HEIGHT / 2.0) as u32;
        for row in 0..half {
            let y = row as f32;
            painter.line_segment(
                [view.pos(0.0, y), view.pos(SCENE_WIDTH, y)],
                egui::Stroke::new(view.scale.max(1.0), scene::sky_color(y)),
            );
        }
        painter.rect_filled(
            egui::Rect::from_min_max(
                view.pos(0.0, SCENE_HEIGHT / 2.0),
                view.pos(SCENE_WIDTH, SCENE_HEIGHT),
            ),
            0.0,
            scene::GROUND_BROWN,
        );
    }

    fn paint_leaf(&self, painter: &egui::Painter, view: &SceneTransform) {
        let leaf = &self.leaf;
        let shadow_center = leaf.center + egui::vec2(scene::SHADOW_OFFSET, scene::SHADOW_OFFSET);
        painter.add(fan(
            view.pos(shadow_center.x, shadow_center.y),
            view.points(&leaf.shadow),
            scene::shadow_gray(),
        ));
        let center = view.pos(leaf.center.x, leaf.center.y);
        painter.add(fan(center, view.points(&leaf.outline), scene::LEAF_GREEN));
        painter.add(fan(center, view.points(&leaf.inner), scene::LEAF_DARK_GREEN));
        for vein in &leaf.veins {
            painter.add(egui::Shape::line(
                view.points(vein),
                egui::Stroke::new(1.0, scene::VEIN_YELLOW),
            ));
        }
    }

    fn paint_frame(&self, painter: &egui::Painter, view: &SceneTransform, frame: &FrameSnapshot) {
        for droplet in &frame.droplets {
            painter.circle_filled(
                view.pos(droplet.pos.x, droplet.pos.y),
                droplet.radius * view.scale,
                scene::water_blue(),
            );
        }
        for particle in &frame.particles {
            painter.circle_filled(
                view.pos(particle.pos.x, particle.pos.y),
                particle.radius * view.scale,
                scene::splash_blue(),
            );
        }
    }
}

/// Fill a polygon that is star-shaped around `center`
fn fan(center: egui::Pos2, points: Vec<egui::Pos2>, color: egui::Color32) -> egui::Shape {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(center, color);
    for point in &points {
        mesh.colored_vertex(*point, color);
    }
    let n = points.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    egui::Shape::mesh(mesh)
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.quit.raise();
        }
        if self.simulation_finished() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let painter = ui.painter();
                let view = SceneTransform::fit(ui.max_rect());

                self.paint_background(painter, &view);
                self.paint_leaf(painter, &view);
                if let Some(frame) = self.current_frame() {
                    self.paint_frame(painter, &view, &frame);
                }
            });
    }
}

/// Open the window and run the animation until it is closed
pub fn run_window(clock: SimulationClock) -> Result<RunReport, Box<dyn Error>> {
    let latest: SharedFrame = Arc::default();
    let quit = QuitFlag::new();
    let handle_slot: SimSlot = Arc::default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([SCENE_WIDTH, SCENE_HEIGHT])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    let app_latest = Arc::clone(&latest);
    let app_quit = quit.clone();
    let app_slot = Arc::clone(&handle_slot);
    let creator: eframe::AppCreator = Box::new(move |cc| {
        let mut sink = SharedFrameSink {
            latest: Arc::clone(&app_latest),
            repaint: cc.egui_ctx.clone(),
        };
        let mut sim_quit = app_quit.clone();
        let mut clock = clock;
        let handle = std::thread::Builder::new()
            .name("leafdrop-sim".into())
            .spawn(move || {
                clock.run(&mut MonotonicTime::new(), &mut sink, &mut sim_quit)
            })?;
        if let Ok(mut slot) = app_slot.lock() {
            *slot = Some(handle);
        }
        info!("window opened");
        let app: Box<dyn eframe::App> =
            Box::new(ViewerApp::new(app_latest, app_quit, app_slot));
        Ok(app)
    });
    let window = eframe::run_native("leafdrop", options, creator);

    // The window is gone either way; let the simulation wind down
    quit.raise();
    let handle = handle_slot.lock().ok().and_then(|mut slot| slot.take());

    if let Err(e) = window {
        if let Some(handle) = handle {
            let _ = handle.join();
        }
        return Err(Box::new(SimError::Display(e.to_string())));
    }

    match handle {
        Some(handle) => match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err("simulation thread panicked".into()),
        },
        None => {
            warn!("window closed before the simulation started");
            Ok(RunReport::default())
        }
    }
}
