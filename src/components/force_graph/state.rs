//! The scene: one growing graph, its layout, the camera looking at it, and
//! the three per-frame activities that drive them.
//!
//! Created once when the component mounts, then shared between the frame
//! tasks and the gesture handlers through `Rc<RefCell<GraphScene>>`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::camera::{AutoFit, FitOutcome, Viewport};
use super::config::GraphConfig;
use super::graph::Graph;
use super::growth::{GrowthOutcome, GrowthProcess};
use super::render::{self, Surface};
use super::scheduler::{Repeat, Scheduler};
use super::simulation::ForceSimulation;
use super::theme::Theme;
use crate::error::Result;

/// Everything one canvas needs to grow, lay out and draw its tree.
pub struct GraphScene {
	/// The tree.
	pub graph: Graph,
	/// Layout over the tree.
	pub simulation: ForceSimulation,
	/// Adds buds over time.
	pub growth: GrowthProcess,
	/// Size and transform of the canvas.
	pub viewport: Viewport,
	/// Keeps the tree in view.
	pub camera: AutoFit,
	/// Drawing colors.
	pub theme: Theme,
	restart_alpha: f64,
	wheel_step: f64,
}

impl GraphScene {
	/// Validate `config` and build a scene with a lone root at the centre of
	/// a `width` x `height` viewport. The layout starts warm.
	pub fn new(config: &GraphConfig, width: f64, height: f64) -> Result<Self> {
		config.validate()?;

		let (layout_rng, growth_rng) = match config.seed {
			Some(seed) => (
				StdRng::seed_from_u64(seed),
				StdRng::seed_from_u64(seed.wrapping_add(1)),
			),
			None => (StdRng::from_entropy(), StdRng::from_entropy()),
		};

		let graph = Graph::new(width / 2.0, height / 2.0);
		let mut simulation =
			ForceSimulation::new(config.simulation.clone(), width, height, layout_rng);
		simulation.start(&graph);

		info!(
			"scene {}x{}, growing to {} nodes every {} frames",
			width, height, config.growth.max_nodes, config.growth.interval
		);

		Ok(Self {
			graph,
			simulation,
			growth: GrowthProcess::new(config.growth.clone(), growth_rng),
			viewport: Viewport::new(width, height, &config.camera),
			camera: AutoFit::new(&config.camera),
			theme: Theme::default(),
			restart_alpha: config.simulation.restart_alpha,
			wheel_step: config.camera.wheel_step,
		})
	}

	/// Apply a new surface size. A real change moves the layout box and
	/// reheats the simulation once.
	pub fn resize(&mut self, width: f64, height: f64) {
		if !self.viewport.resize(width, height) {
			return;
		}
		debug!("resized to {}x{}", width, height);
		self.simulation.set_size(width, height);
		self.simulation.reheat(self.restart_alpha);
	}

	/// One layout iteration. Returns whether the layout is still moving.
	pub fn step_simulation(&mut self) -> bool {
		self.simulation.tick(&mut self.graph)
	}

	/// One growth firing; [`Repeat::Stop`] once the node cap is reached.
	pub fn step_growth(&mut self) -> Repeat {
		match self.growth.fire(&mut self.graph, &mut self.simulation) {
			GrowthOutcome::Stopped => Repeat::Stop,
			GrowthOutcome::Waiting | GrowthOutcome::Grew(_) => Repeat::Continue,
		}
	}

	/// Run auto-fit for this frame.
	pub fn frame_camera(&mut self, now_ms: f64) -> FitOutcome {
		self.camera.frame(&self.graph, &mut self.viewport, now_ms)
	}

	/// Draw the current frame onto `surface`.
	pub fn paint(&self, surface: &impl Surface) {
		render::render(&self.graph, &self.viewport, &self.theme, surface);
	}

	/// Zoom one wheel notch about `(x, y)`: out for positive `delta_y`.
	pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64, now_ms: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.wheel_step
		} else {
			self.wheel_step
		};
		self.viewport.zoom_at(factor, x, y, now_ms);
	}
}

/// Register the layout, camera + paint, and growth activities on
/// `scheduler`. The growth task unregisters itself at the node cap; the
/// other two run for the life of the scheduler.
pub fn schedule<S: Surface + 'static>(
	scene: &Rc<RefCell<GraphScene>>,
	scheduler: &impl Scheduler,
	surface: Rc<S>,
) {
	let layout = scene.clone();
	scheduler.every_frame(Box::new(move |_| {
		layout.borrow_mut().step_simulation();
		Repeat::Continue
	}));

	let camera = scene.clone();
	scheduler.every_frame(Box::new(move |now_ms| {
		let mut scene = camera.borrow_mut();
		scene.frame_camera(now_ms);
		scene.paint(surface.as_ref());
		Repeat::Continue
	}));

	let growth = scene.clone();
	scheduler.every_frame(Box::new(move |_| growth.borrow_mut().step_growth()));
}
