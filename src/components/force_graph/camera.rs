//! Viewport transform, manual pan/zoom gestures and the auto-fit camera.
//!
//! # Coordinate Spaces
//!
//! World coordinates are the simulation's; screen coordinates are canvas
//! pixels. A world point `(x, y)` lands on screen at
//! `(x * scale + tx, y * scale + ty)`.
//!
//! # Arbitration
//!
//! Manual gestures and auto-fit write the transform through the same
//! [`Viewport::impose`] path. Auto-fit yields while a drag is in progress and
//! for `gesture_cooldown_ms` after the last gesture, so the two never fight
//! over the transform within a frame.

use log::debug;

use super::config::CameraConfig;
use super::geometry::{Extents, bounding_extents};
use super::graph::Graph;

/// Scale plus translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Pixels per world unit.
	pub scale: f64,
	/// Horizontal screen offset of the world origin.
	pub tx: f64,
	/// Vertical screen offset of the world origin.
	pub ty: f64,
}

impl Transform {
	/// Scale 1, no offset.
	pub const IDENTITY: Self = Self {
		scale: 1.0,
		tx: 0.0,
		ty: 0.0,
	};

	/// Map a canvas pixel to world coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.tx) / self.scale, (sy - self.ty) / self.scale)
	}

	/// Map a world point to canvas pixels.
	pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.scale + self.tx, y * self.scale + self.ty)
	}
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a drag is in progress.
	pub active: bool,
	/// Pointer position when the drag began.
	pub start_x: f64,
	/// Pointer position when the drag began.
	pub start_y: f64,
	/// Translation when the drag began.
	pub transform_start_x: f64,
	/// Translation when the drag began.
	pub transform_start_y: f64,
}

/// Shared viewport state: size, zoom extent, the current transform and
/// when the user last touched it.
#[derive(Clone, Debug)]
pub struct Viewport {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Smallest allowed scale.
	pub min_scale: f64,
	/// Largest allowed scale.
	pub max_scale: f64,
	transform: Transform,
	pan: PanState,
	last_gesture_ms: Option<f64>,
}

impl Viewport {
	/// A viewport at the clamped unit scale with no translation.
	pub fn new(width: f64, height: f64, config: &CameraConfig) -> Self {
		Self {
			width,
			height,
			min_scale: config.zoom_min,
			max_scale: config.zoom_max,
			transform: Transform {
				scale: 1.0_f64.clamp(config.zoom_min, config.zoom_max),
				..Transform::IDENTITY
			},
			pan: PanState::default(),
			last_gesture_ms: None,
		}
	}

	/// The current transform.
	pub fn transform(&self) -> Transform {
		self.transform
	}

	/// The current scale.
	pub fn scale(&self) -> f64 {
		self.transform.scale
	}

	/// The current `(tx, ty)`.
	pub fn translation(&self) -> (f64, f64) {
		(self.transform.tx, self.transform.ty)
	}

	/// Whether both dimensions are positive.
	pub fn has_area(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// Replace the transform. Both gestures and auto-fit go through here.
	pub fn impose(&mut self, transform: Transform) {
		self.transform = transform;
	}

	/// Returns whether the size actually changed.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.width == width && self.height == height {
			return false;
		}
		self.width = width;
		self.height = height;
		true
	}

	/// Whether a background drag is in progress.
	pub fn is_dragging(&self) -> bool {
		self.pan.active
	}

	/// When the last pan or zoom gesture happened, if ever.
	pub fn last_gesture_ms(&self) -> Option<f64> {
		self.last_gesture_ms
	}

	/// Start a background drag at screen point `(x, y)`.
	pub fn begin_pan(&mut self, x: f64, y: f64, now_ms: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.tx,
			transform_start_y: self.transform.ty,
		};
		self.last_gesture_ms = Some(now_ms);
	}

	/// Follow the pointer during a drag.
	pub fn pan_to(&mut self, x: f64, y: f64, now_ms: f64) {
		if !self.pan.active {
			return;
		}
		let transform = Transform {
			tx: self.pan.transform_start_x + (x - self.pan.start_x),
			ty: self.pan.transform_start_y + (y - self.pan.start_y),
			..self.transform
		};
		self.impose(transform);
		self.last_gesture_ms = Some(now_ms);
	}

	/// Finish a drag.
	pub fn end_pan(&mut self, now_ms: f64) {
		if self.pan.active {
			self.pan.active = false;
			self.last_gesture_ms = Some(now_ms);
		}
	}

	/// Zoom by `factor` keeping the screen point `(x, y)` fixed, clamped to
	/// the zoom extent.
	pub fn zoom_at(&mut self, factor: f64, x: f64, y: f64, now_ms: f64) {
		let current = self.transform;
		let scale = (current.scale * factor).clamp(self.min_scale, self.max_scale);
		let ratio = scale / current.scale;
		self.impose(Transform {
			scale,
			tx: x - (x - current.tx) * ratio,
			ty: y - (y - current.ty) * ratio,
		});
		self.last_gesture_ms = Some(now_ms);
	}
}

/// What the camera did on a given frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitOutcome {
	/// A transform was computed and imposed.
	Applied(Transform),
	/// A manual gesture is active or recent.
	YieldedToUser,
	/// The viewport has no area.
	Skipped,
}

/// Computes the transform that keeps every node on screen, centred on the
/// root.
#[derive(Clone, Debug)]
pub struct AutoFit {
	gesture_cooldown_ms: f64,
}

impl AutoFit {
	/// An auto-fit camera using the configured gesture cooldown.
	pub fn new(config: &CameraConfig) -> Self {
		Self {
			gesture_cooldown_ms: config.gesture_cooldown_ms,
		}
	}

	/// Whether a manual gesture currently owns the transform.
	pub fn user_in_control(&self, viewport: &Viewport, now_ms: f64) -> bool {
		viewport.is_dragging()
			|| viewport
				.last_gesture_ms()
				.is_some_and(|last| now_ms - last < self.gesture_cooldown_ms)
	}

	/// Run the fit for one frame and impose the result on `viewport`.
	pub fn frame(&self, graph: &Graph, viewport: &mut Viewport, now_ms: f64) -> FitOutcome {
		if self.user_in_control(viewport, now_ms) {
			return FitOutcome::YieldedToUser;
		}
		match fit(graph, viewport) {
			Some(transform) => {
				if transform.scale != viewport.scale() {
					debug!("auto-fit scale {:.3} -> {:.3}", viewport.scale(), transform.scale);
				}
				viewport.impose(transform);
				FitOutcome::Applied(transform)
			}
			None => FitOutcome::Skipped,
		}
	}
}

/// Largest scale along one axis that keeps `[min, max]` within `extent`
/// screen pixels when centred on `anchor`, or `None` if the box already fits.
fn axis_fit(min: f64, max: f64, anchor: f64, extent: f64) -> Option<f64> {
	if max <= extent && min >= 0.0 {
		return None;
	}
	let max = max.max(extent);
	let min = min.min(0.0);
	let reach = (max - anchor).max(anchor - min);
	(reach > 0.0).then(|| extent / (2.0 * reach))
}

/// Compute the fit transform without applying it. `None` for a zero-area
/// viewport.
///
/// The scale only ever shrinks relative to the viewport's current scale and
/// always stays within the viewport's zoom extent; translation centres the
/// root.
pub fn fit(graph: &Graph, viewport: &Viewport) -> Option<Transform> {
	if !viewport.has_area() {
		return None;
	}
	let Extents {
		min_x,
		max_x,
		min_y,
		max_y,
	} = bounding_extents(graph.nodes());
	let root = graph.root();
	let (width, height) = (viewport.width, viewport.height);
	let current = viewport.scale();

	let zw = axis_fit(min_x, max_x, root.x, width).unwrap_or(current);
	let zh = axis_fit(min_y, max_y, root.y, height).unwrap_or(current);
	let scale = current
		.min(zw)
		.min(zh)
		.clamp(viewport.min_scale, viewport.max_scale);

	Some(Transform {
		scale,
		tx: width / 2.0 - root.x * scale,
		ty: height / 2.0 - root.y * scale,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::graph::NodeId;

	fn viewport(width: f64, height: f64) -> Viewport {
		Viewport::new(width, height, &CameraConfig::default())
	}

	fn camera() -> AutoFit {
		AutoFit::new(&CameraConfig::default())
	}

	#[test]
	fn fitting_box_keeps_scale_and_centres_root() {
		let graph = Graph::new(400.0, 300.0);
		let mut view = viewport(800.0, 600.0);
		let outcome = camera().frame(&graph, &mut view, 0.0);
		assert_eq!(
			outcome,
			FitOutcome::Applied(Transform {
				scale: 1.0,
				tx: 0.0,
				ty: 0.0
			})
		);
		let (sx, sy) = view.transform().world_to_screen(400.0, 300.0);
		assert_eq!((sx, sy), (400.0, 300.0));
	}

	#[test]
	fn repeated_fit_on_stable_graph_does_not_drift() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (120.0, -80.0), 6.0);
		graph.attach(NodeId::ROOT, (-200.0, 150.0), 2.0);
		let mut view = viewport(800.0, 600.0);
		let cam = camera();
		let first = cam.frame(&graph, &mut view, 0.0);
		for frame in 1..50 {
			assert_eq!(cam.frame(&graph, &mut view, frame as f64 * 16.0), first);
		}
		assert_eq!(view.scale(), 1.0);
	}

	#[test]
	fn overflow_shrinks_scale_to_fit() {
		let mut graph = Graph::new(400.0, 300.0);
		// Reaches x = 1000 + 1 on the right: 601 units from the root.
		graph.attach(NodeId::ROOT, (600.0, 0.0), 0.0);
		let mut view = viewport(800.0, 600.0);
		let FitOutcome::Applied(t) = camera().frame(&graph, &mut view, 0.0) else {
			panic!("fit was not applied");
		};
		let expected = 800.0 / (2.0 * 601.0);
		assert!((t.scale - expected).abs() < 1e-12);
		assert!((t.tx - (400.0 - 400.0 * expected)).abs() < 1e-9);

		// The far node now lands inside the viewport.
		let (sx, _) = t.world_to_screen(1001.0, 300.0);
		assert!(sx <= 800.0 + 1e-9);
	}

	#[test]
	fn fit_never_zooms_in() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (0.0, 500.0), 0.0);
		let mut view = viewport(800.0, 600.0);
		view.impose(Transform {
			scale: 0.25,
			tx: 0.0,
			ty: 0.0,
		});
		let t = fit(&graph, &view).unwrap();
		assert_eq!(t.scale, 0.25);
	}

	#[test]
	fn pathological_box_clamps_to_min_zoom() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (1.0e9, -1.0e9), 19.0);
		let view = viewport(800.0, 600.0);
		let t = fit(&graph, &view).unwrap();
		assert_eq!(t.scale, 0.2);
		assert!(t.tx.is_finite() && t.ty.is_finite());
	}

	#[test]
	fn scale_respects_a_zoom_max_below_one() {
		let config = CameraConfig {
			zoom_min: 0.1,
			zoom_max: 0.5,
			..CameraConfig::default()
		};
		let graph = Graph::new(400.0, 300.0);
		let mut view = Viewport::new(800.0, 600.0, &config);
		assert_eq!(view.scale(), 0.5);

		let FitOutcome::Applied(t) = AutoFit::new(&config).frame(&graph, &mut view, 0.0) else {
			panic!("fit was not applied");
		};
		assert_eq!(t.scale, 0.5);
		assert!(view.scale() <= view.max_scale);
		assert_eq!(t.world_to_screen(400.0, 300.0), (400.0, 300.0));

		// A transform imposed from outside the extent is pulled back in.
		view.impose(Transform {
			scale: 3.0,
			tx: 0.0,
			ty: 0.0,
		});
		assert_eq!(fit(&graph, &view).map(|t| t.scale), Some(0.5));
	}

	#[test]
	fn zero_area_viewport_skips_frame() {
		let graph = Graph::new(0.0, 0.0);
		let mut view = viewport(0.0, 600.0);
		let before = view.transform();
		assert_eq!(camera().frame(&graph, &mut view, 0.0), FitOutcome::Skipped);
		assert_eq!(view.transform(), before);
		assert!(fit(&graph, &viewport(800.0, 0.0)).is_none());
	}

	#[test]
	fn drag_suppresses_fit_until_cooldown_expires() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (900.0, 0.0), 0.0);
		let mut view = viewport(800.0, 600.0);
		let cam = camera();

		view.begin_pan(10.0, 10.0, 1000.0);
		view.pan_to(60.0, 30.0, 1100.0);
		assert_eq!(view.translation(), (50.0, 20.0));
		assert_eq!(cam.frame(&graph, &mut view, 5000.0), FitOutcome::YieldedToUser);
		assert_eq!(view.translation(), (50.0, 20.0));

		view.end_pan(5000.0);
		assert_eq!(cam.frame(&graph, &mut view, 5500.0), FitOutcome::YieldedToUser);
		assert!(matches!(
			cam.frame(&graph, &mut view, 6300.0),
			FitOutcome::Applied(_)
		));
		assert!(view.scale() < 1.0);
	}

	#[test]
	fn wheel_zoom_is_clamped_and_anchored() {
		let mut view = viewport(800.0, 600.0);
		view.zoom_at(0.5, 400.0, 300.0, 0.0);
		assert_eq!(view.scale(), 0.5);
		// The anchor point stays put on screen.
		let (wx, wy) = view.transform().screen_to_world(400.0, 300.0);
		assert_eq!((wx, wy), (400.0, 300.0));

		for _ in 0..20 {
			view.zoom_at(0.5, 0.0, 0.0, 0.0);
		}
		assert_eq!(view.scale(), 0.2);
		for _ in 0..20 {
			view.zoom_at(2.0, 0.0, 0.0, 0.0);
		}
		assert_eq!(view.scale(), 1.0);
	}

	#[test]
	fn manual_transform_composes_with_last_fit() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (600.0, 0.0), 0.0);
		let mut view = viewport(800.0, 600.0);
		let FitOutcome::Applied(fitted) = camera().frame(&graph, &mut view, 0.0) else {
			panic!("fit was not applied");
		};
		view.begin_pan(0.0, 0.0, 10.0);
		view.pan_to(5.0, -5.0, 20.0);
		view.end_pan(30.0);
		let t = view.transform();
		assert_eq!(t.scale, fitted.scale);
		assert_eq!((t.tx, t.ty), (fitted.tx + 5.0, fitted.ty - 5.0));
	}

	#[test]
	fn resize_reports_changes() {
		let mut view = viewport(800.0, 600.0);
		assert!(!view.resize(800.0, 600.0));
		assert!(view.resize(1024.0, 768.0));
		assert_eq!((view.width, view.height), (1024.0, 768.0));
	}
}
