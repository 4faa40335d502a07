//! Tunable constants for the simulation, growth process and camera.
//!
//! Every field has a default matching the reference cadence, and the whole
//! tree deserializes from JSON with missing fields falling back to those
//! defaults, so a page only needs to spell out what it overrides:
//!
//! ```json
//! { "growth": { "max_nodes": 120 }, "seed": 7 }
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};

/// Force layout parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Multiplier applied to the summed node/parent radii to get each node's
	/// (repulsive) charge.
	pub charge_scale: f64,
	/// Rest length of every link.
	pub link_distance: f64,
	/// Spring stiffness in `0..=1`.
	pub link_strength: f64,
	/// Velocity retained per tick in `0..=1` (1 = frictionless).
	pub friction: f64,
	/// Pull toward the centre of the bounding box.
	pub gravity: f64,
	/// Barnes-Hut opening criterion.
	pub theta: f64,
	/// Alpha used by `start()` and by growth-triggered reheats.
	pub restart_alpha: f64,
	/// Per-tick alpha multiplier.
	pub alpha_decay: f64,
	/// The simulation stops once alpha falls below this.
	pub alpha_min: f64,
	/// When set, every tick pins alpha back to this value so the layout
	/// never cools. `None` lets it settle and stop until the next reheat.
	pub sustain_alpha: Option<f64>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge_scale: 20.0,
			link_distance: 60.0,
			link_strength: 1.0,
			friction: 0.9,
			gravity: 0.1,
			theta: 0.8,
			restart_alpha: 0.1,
			alpha_decay: 0.99,
			alpha_min: 0.005,
			sustain_alpha: Some(0.1),
		}
	}
}

/// Growth process parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
	/// Scheduler firings per growth attempt.
	pub interval: u32,
	/// Growth stops for good once the graph holds this many nodes.
	pub max_nodes: usize,
	/// Added to every ancestor's weight when a node is attached.
	pub weight_increment: f64,
	/// New nodes get an integer size value in `0..size_limit`.
	pub size_limit: u32,
	/// Half-width of the uniform jitter applied to a bud's spawn position.
	pub jitter: f64,
}

impl Default for GrowthConfig {
	fn default() -> Self {
		Self {
			interval: 20,
			max_nodes: 60,
			weight_increment: 50.0,
			size_limit: 20,
			jitter: 0.5,
		}
	}
}

/// Camera and gesture parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	/// Smallest scale auto-fit or the wheel may reach.
	pub zoom_min: f64,
	/// Largest scale; the viewport starts at `1.0` clamped into range.
	pub zoom_max: f64,
	/// Auto-fit stays suppressed for this long after the last manual gesture.
	pub gesture_cooldown_ms: f64,
	/// Zoom factor applied per wheel notch.
	pub wheel_step: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			zoom_min: 0.2,
			zoom_max: 1.0,
			gesture_cooldown_ms: 1200.0,
			wheel_step: 1.1,
		}
	}
}

/// Complete configuration for a growing graph scene.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Force layout parameters.
	pub simulation: SimulationConfig,
	/// Growth cadence and limits.
	pub growth: GrowthConfig,
	/// Zoom extent and gesture handling.
	pub camera: CameraConfig,
	/// Fixed RNG seed. Without one, growth and jitter draw from OS entropy.
	pub seed: Option<u64>,
}

impl GraphConfig {
	/// Parse a JSON document and validate the result.
	pub fn from_json(text: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values that could drive positions or scale to NaN/infinity.
	pub fn validate(&self) -> Result<()> {
		let sim = &self.simulation;
		positive("simulation.charge_scale", sim.charge_scale)?;
		positive("simulation.link_distance", sim.link_distance)?;
		in_range("simulation.link_strength", sim.link_strength, 0.0, 1.0)?;
		in_range("simulation.friction", sim.friction, 0.0, 1.0)?;
		in_range("simulation.gravity", sim.gravity, 0.0, 1.0)?;
		positive("simulation.theta", sim.theta)?;
		in_range("simulation.restart_alpha", sim.restart_alpha, 0.0, 1.0)?;
		positive("simulation.alpha_decay", sim.alpha_decay)?;
		in_range("simulation.alpha_decay", sim.alpha_decay, 0.0, 1.0)?;
		positive("simulation.alpha_min", sim.alpha_min)?;
		if let Some(alpha) = sim.sustain_alpha {
			in_range("simulation.sustain_alpha", alpha, 0.0, 1.0)?;
		}

		let growth = &self.growth;
		if growth.interval == 0 {
			return Err(Error::NonPositive {
				field: "growth.interval",
				value: 0.0,
			});
		}
		if growth.max_nodes == 0 {
			return Err(Error::NonPositive {
				field: "growth.max_nodes",
				value: 0.0,
			});
		}
		if growth.size_limit == 0 {
			return Err(Error::NonPositive {
				field: "growth.size_limit",
				value: 0.0,
			});
		}
		finite("growth.weight_increment", growth.weight_increment)?;
		finite("growth.jitter", growth.jitter)?;
		if growth.jitter < 0.0 {
			return Err(Error::OutOfRange {
				field: "growth.jitter",
				value: growth.jitter,
				min: 0.0,
				max: f64::INFINITY,
			});
		}

		let camera = &self.camera;
		positive("camera.zoom_min", camera.zoom_min)?;
		positive("camera.zoom_max", camera.zoom_max)?;
		if camera.zoom_min > camera.zoom_max {
			return Err(Error::InvertedZoomExtent {
				min: camera.zoom_min,
				max: camera.zoom_max,
			});
		}
		finite("camera.gesture_cooldown_ms", camera.gesture_cooldown_ms)?;
		positive("camera.wheel_step", camera.wheel_step)?;
		Ok(())
	}
}

fn finite(field: &'static str, value: f64) -> Result<()> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(Error::NonFinite { field, value })
	}
}

fn positive(field: &'static str, value: f64) -> Result<()> {
	finite(field, value)?;
	if value > 0.0 {
		Ok(())
	} else {
		Err(Error::NonPositive { field, value })
	}
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
	finite(field, value)?;
	if (min..=max).contains(&value) {
		Ok(())
	} else {
		Err(Error::OutOfRange {
			field,
			value,
			min,
			max,
		})
	}
}
