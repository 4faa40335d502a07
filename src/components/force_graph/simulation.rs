//! Velocity-Verlet force layout.
//!
//! Each tick applies, in order: spring forces along links, gravity toward the
//! centre of the bounding box, and Barnes-Hut many-body repulsion, then
//! integrates positions with friction. Every force is scaled by `alpha`,
//! which decays geometrically; once it drops below `alpha_min` the
//! simulation stops until something reheats it.
//!
//! Velocities are implicit: a node's velocity is its current position minus
//! its previous one, kept here in `prev` rather than on [`Node`]. The
//! simulation borrows the graph for each tick and is the only writer of node
//! positions.

use log::{debug, trace};
use rand::Rng;
use rand::rngs::StdRng;

use super::config::SimulationConfig;
use super::geometry::visual_radius;
use super::graph::{Graph, Node};
use super::quadtree::QuadNode;

/// Squared distances are clamped to this before dividing, so two nodes that
/// end up on top of each other get a large but finite kick.
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Whether the simulation is currently stepping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
	/// Ticks advance positions.
	Running,
	/// Ticks are no-ops until a start or reheat.
	Stopped,
}

/// Passed to tick listeners after positions have been updated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickEvent {
	/// Alpha used for this tick.
	pub alpha: f64,
	/// Ticks completed since the simulation was created.
	pub tick: u64,
}

type TickListener = Box<dyn FnMut(&TickEvent, &Graph)>;

/// Force layout over a [`Graph`], stepped one tick at a time.
pub struct ForceSimulation {
	config: SimulationConfig,
	width: f64,
	height: f64,
	alpha: f64,
	state: SimulationState,
	ticks: u64,
	/// Previous position per node; `x - px` is the velocity.
	prev: Vec<(f64, f64)>,
	charges: Vec<f64>,
	/// Link count per node, used to split spring corrections.
	degrees: Vec<f64>,
	listeners: Vec<TickListener>,
	rng: StdRng,
}

/// Repulsive charge for a node: negative, growing with its own and its
/// parent's visual radius.
pub fn node_charge(graph: &Graph, node: &Node, charge_scale: f64) -> f64 {
	let parent_size = node.parent.map(|p| graph.node(p).size_value).unwrap_or(0.0);
	-(visual_radius(node.size_value) + visual_radius(parent_size)) * charge_scale
}

impl ForceSimulation {
	/// A stopped simulation bounded by a `width` x `height` box.
	pub fn new(config: SimulationConfig, width: f64, height: f64, rng: StdRng) -> Self {
		Self {
			config,
			width,
			height,
			alpha: 0.0,
			state: SimulationState::Stopped,
			ticks: 0,
			prev: Vec::new(),
			charges: Vec::new(),
			degrees: Vec::new(),
			listeners: Vec::new(),
			rng,
		}
	}

	/// Current alpha.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the simulation is running.
	pub fn state(&self) -> SimulationState {
		self.state
	}

	/// Shorthand for `state() == Running`.
	pub fn is_running(&self) -> bool {
		self.state == SimulationState::Running
	}

	/// Ticks completed so far.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// The bounding box gravity pulls toward.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Move the bounding box. Positions are left alone; nodes outside the new
	/// box drift back in under gravity over the following ticks.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Register a listener invoked once per tick after positions move.
	pub fn on_tick(&mut self, listener: impl FnMut(&TickEvent, &Graph) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	/// Pick up any nodes/links added since the last call and resume at
	/// `restart_alpha`. Calling this while already running only re-derives the
	/// per-node tables and bumps alpha; there is never more than one stepping
	/// loop because stepping is driven by whoever calls [`tick`](Self::tick).
	pub fn start(&mut self, graph: &Graph) {
		self.rebuild(graph);
		self.reheat(self.config.restart_alpha);
	}

	/// Raise alpha to at least `intensity`, starting the simulation if it was
	/// stopped. Never lowers alpha.
	pub fn reheat(&mut self, intensity: f64) {
		if !intensity.is_finite() || intensity <= 0.0 {
			return;
		}
		self.alpha = self.alpha.max(intensity);
		if self.state == SimulationState::Stopped {
			debug!("simulation resumed at alpha {:.3}", self.alpha);
		}
		self.state = SimulationState::Running;
	}

	/// Drop alpha to zero and stop.
	pub fn stop(&mut self) {
		self.alpha = 0.0;
		self.state = SimulationState::Stopped;
	}

	/// Re-derive charges, degrees and previous positions for every node.
	fn rebuild(&mut self, graph: &Graph) {
		let nodes = graph.nodes();
		self.prev.truncate(nodes.len());
		for node in &nodes[self.prev.len()..] {
			self.prev.push((node.x, node.y));
		}

		self.charges.clear();
		self.charges.extend(
			nodes
				.iter()
				.map(|node| node_charge(graph, node, self.config.charge_scale)),
		);

		self.degrees.clear();
		self.degrees.resize(nodes.len(), 0.0);
		for link in graph.links() {
			self.degrees[link.source.index()] += 1.0;
			self.degrees[link.target.index()] += 1.0;
		}
	}

	/// Advance one iteration. Returns whether the simulation is still running
	/// afterwards.
	pub fn tick(&mut self, graph: &mut Graph) -> bool {
		if self.state == SimulationState::Stopped {
			return false;
		}
		if self.prev.len() != graph.len() {
			self.rebuild(graph);
		}

		self.alpha *= self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			debug!("simulation settled after {} ticks", self.ticks);
			self.stop();
			return false;
		}

		self.apply_links(graph);
		self.apply_gravity(graph);
		self.apply_charge(graph);
		self.integrate(graph);

		self.ticks += 1;
		let event = TickEvent {
			alpha: self.alpha,
			tick: self.ticks,
		};
		trace!("tick {} alpha {:.4}", event.tick, event.alpha);
		for listener in &mut self.listeners {
			listener(&event, graph);
		}

		if let Some(sustain) = self.config.sustain_alpha {
			self.alpha = sustain;
		}
		true
	}

	fn apply_links(&mut self, graph: &mut Graph) {
		let strength = self.alpha * self.config.link_strength;
		let distance = self.config.link_distance;
		let links = graph.links().to_vec();
		let nodes = graph.nodes_mut();

		for link in links {
			let (s, t) = (link.source.index(), link.target.index());
			let mut dx = nodes[t].x - nodes[s].x;
			let mut dy = nodes[t].y - nodes[s].y;
			let len_sq = dx * dx + dy * dy;
			if len_sq <= 0.0 {
				continue;
			}
			let len = len_sq.sqrt();
			let k = strength * (len - distance) / len;
			dx *= k;
			dy *= k;

			let total = self.degrees[s] + self.degrees[t];
			let share = if total > 0.0 { self.degrees[s] / total } else { 0.5 };
			nodes[t].x -= dx * share;
			nodes[t].y -= dy * share;
			nodes[s].x += dx * (1.0 - share);
			nodes[s].y += dy * (1.0 - share);
		}
	}

	fn apply_gravity(&mut self, graph: &mut Graph) {
		let k = self.alpha * self.config.gravity;
		if k == 0.0 {
			return;
		}
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for node in graph.nodes_mut() {
			node.x += (cx - node.x) * k;
			node.y += (cy - node.y) * k;
		}
	}

	fn apply_charge(&mut self, graph: &mut Graph) {
		let positions: Vec<(f64, f64)> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
		let charges: Vec<f64> = self.charges.iter().map(|c| c * self.alpha).collect();
		let Some(tree) = QuadNode::build(&positions, &charges) else {
			return;
		};

		let theta_sq = self.config.theta * self.config.theta;
		for index in 0..positions.len() {
			let (mut fx, mut fy) = (0.0, 0.0);
			self.repulse(&tree, index, &positions, &charges, theta_sq, &mut fx, &mut fy);
			// Charge acts on the previous position, i.e. it adds velocity.
			self.prev[index].0 -= fx;
			self.prev[index].1 -= fy;
		}
	}

	/// Accumulate into `(fx, fy)` the pull of `cell` on node `index`. With
	/// negative charges the result points away from the cell.
	#[allow(clippy::too_many_arguments)]
	fn repulse(
		&mut self,
		cell: &QuadNode,
		index: usize,
		positions: &[(f64, f64)],
		charges: &[f64],
		theta_sq: f64,
		fx: &mut f64,
		fy: &mut f64,
	) {
		if cell.charge == 0.0 {
			return;
		}
		let point = positions[index];

		if cell.is_leaf() {
			for &other in &cell.indices {
				if other == index {
					continue;
				}
				let (mut dx, mut dy) = (positions[other].0 - point.0, positions[other].1 - point.1);
				if dx == 0.0 && dy == 0.0 {
					dx = self.jiggle();
					dy = self.jiggle();
				}
				let dist_sq = (dx * dx + dy * dy).max(MIN_DISTANCE_SQ);
				let k = charges[other] / dist_sq;
				*fx += dx * k;
				*fy += dy * k;
			}
			return;
		}

		let (dx, dy) = (cell.cx - point.0, cell.cy - point.1);
		let dist_sq = dx * dx + dy * dy;
		let side = cell.bounds.side_length();
		if !cell.bounds.contains(point) && side * side < theta_sq * dist_sq {
			let k = cell.charge / dist_sq.max(MIN_DISTANCE_SQ);
			*fx += dx * k;
			*fy += dy * k;
			return;
		}

		for child in cell.children.iter().flatten() {
			self.repulse(child, index, positions, charges, theta_sq, fx, fy);
		}
	}

	fn jiggle(&mut self) -> f64 {
		(self.rng.r#gen::<f64>() - 0.5) * 1e-6
	}

	/// Verlet step: `x' = x + (x - px) * friction`.
	fn integrate(&mut self, graph: &mut Graph) {
		let friction = self.config.friction;
		for (node, prev) in graph.nodes_mut().iter_mut().zip(self.prev.iter_mut()) {
			let (x, y) = (node.x, node.y);
			node.x -= (prev.0 - x) * friction;
			node.y -= (prev.1 - y) * friction;
			*prev = (x, y);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use rand::SeedableRng;

	use super::*;
	use crate::components::force_graph::graph::NodeId;

	fn simulation(width: f64, height: f64) -> ForceSimulation {
		ForceSimulation::new(
			SimulationConfig::default(),
			width,
			height,
			StdRng::seed_from_u64(11),
		)
	}

	fn cooling(width: f64, height: f64) -> ForceSimulation {
		let config = SimulationConfig {
			sustain_alpha: None,
			..SimulationConfig::default()
		};
		ForceSimulation::new(config, width, height, StdRng::seed_from_u64(11))
	}

	fn all_finite(graph: &Graph) -> bool {
		graph.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite())
	}

	#[test]
	fn starts_stopped_and_ticks_nothing() {
		let mut graph = Graph::new(400.0, 300.0);
		let mut sim = simulation(800.0, 600.0);
		assert_eq!(sim.state(), SimulationState::Stopped);
		assert!(!sim.tick(&mut graph));
		assert_eq!(sim.ticks(), 0);
	}

	#[test]
	fn root_charge_uses_zero_parent_size() {
		let mut graph = Graph::new(0.0, 0.0);
		let child = graph.attach(NodeId::ROOT, (1.0, 0.0), 4.0);
		assert_eq!(node_charge(&graph, graph.root(), 20.0), -40.0);
		// radius(4) = 9 plus radius(0) = 1 from the root parent.
		assert_eq!(node_charge(&graph, graph.node(child), 20.0), -200.0);
	}

	#[test]
	fn start_is_idempotent() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (0.3, -0.2), 5.0);
		let mut sim = simulation(800.0, 600.0);
		let count = Rc::new(RefCell::new(0));
		let seen = count.clone();
		sim.on_tick(move |_, _| *seen.borrow_mut() += 1);

		sim.start(&graph);
		sim.start(&graph);
		sim.start(&graph);
		assert!(sim.is_running());
		assert_eq!(sim.alpha(), 0.1);

		sim.tick(&mut graph);
		assert_eq!(*count.borrow(), 1);
		assert_eq!(sim.ticks(), 1);
	}

	#[test]
	fn reheat_never_lowers_alpha() {
		let graph = Graph::new(0.0, 0.0);
		let mut sim = simulation(100.0, 100.0);
		sim.start(&graph);
		sim.reheat(0.05);
		assert_eq!(sim.alpha(), 0.1);
		sim.reheat(0.5);
		assert_eq!(sim.alpha(), 0.5);
		sim.reheat(f64::NAN);
		assert_eq!(sim.alpha(), 0.5);
	}

	#[test]
	fn reheat_resumes_a_stopped_simulation() {
		let graph = Graph::new(0.0, 0.0);
		let mut sim = simulation(100.0, 100.0);
		sim.start(&graph);
		sim.stop();
		assert!(!sim.is_running());
		sim.reheat(0.1);
		assert!(sim.is_running());
	}

	#[test]
	fn cools_down_and_stops() {
		let mut graph = Graph::new(50.0, 50.0);
		graph.attach(NodeId::ROOT, (0.4, 0.1), 3.0);
		let mut sim = cooling(100.0, 100.0);
		sim.start(&graph);
		let mut ticks = 0;
		while sim.tick(&mut graph) {
			ticks += 1;
			assert!(ticks < 1000, "simulation never settled");
		}
		// 0.1 * 0.99^n < 0.005 first holds at n = 299.
		assert_eq!(ticks, 298);
		assert_eq!(sim.state(), SimulationState::Stopped);
		assert!(all_finite(&graph));
	}

	#[test]
	fn default_layout_stays_warm() {
		let mut graph = Graph::new(50.0, 50.0);
		let mut sim = simulation(100.0, 100.0);
		sim.start(&graph);
		for _ in 0..1000 {
			assert!(sim.tick(&mut graph));
		}
		assert_eq!(sim.alpha(), 0.1);
	}

	#[test]
	fn listener_sees_updated_positions() {
		let mut graph = Graph::new(0.0, 0.0);
		let mut sim = simulation(200.0, 200.0);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		sim.on_tick(move |event, graph| {
			sink.borrow_mut().push((event.tick, graph.root().x));
		});
		sim.start(&graph);
		sim.tick(&mut graph);
		sim.tick(&mut graph);

		let seen = seen.borrow();
		assert_eq!(seen.len(), 2);
		assert_eq!(seen[0].0, 1);
		assert_eq!(seen[1].1, graph.root().x);
		// Gravity pulled the lone root toward the centre at (100, 100).
		assert!(seen[0].1 > 0.0);
	}

	#[test]
	fn link_relaxes_toward_rest_length() {
		let mut graph = Graph::new(300.0, 300.0);
		graph.attach(NodeId::ROOT, (0.5, 0.0), 0.0);
		let config = SimulationConfig {
			sustain_alpha: Some(0.1),
			..SimulationConfig::default()
		};
		let mut sim = ForceSimulation::new(config, 600.0, 600.0, StdRng::seed_from_u64(2));
		sim.start(&graph);
		for _ in 0..2000 {
			sim.tick(&mut graph);
		}
		let (a, b) = (&graph.nodes()[0], &graph.nodes()[1]);
		let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		assert!(
			distance > 20.0 && distance < 120.0,
			"distance {} far from rest length",
			distance
		);
	}

	#[test]
	fn coincident_nodes_separate_without_nan() {
		let mut graph = Graph::new(100.0, 100.0);
		for _ in 0..5 {
			graph.attach(NodeId::ROOT, (0.0, 0.0), 19.0);
		}
		let mut sim = simulation(200.0, 200.0);
		sim.start(&graph);
		for _ in 0..50 {
			sim.tick(&mut graph);
			assert!(all_finite(&graph));
		}
		let (a, b) = (&graph.nodes()[1], &graph.nodes()[2]);
		assert!((a.x, a.y) != (b.x, b.y));
	}

	#[test]
	fn positions_stay_finite_under_growth() {
		let mut graph = Graph::new(400.0, 300.0);
		let mut sim = simulation(800.0, 600.0);
		sim.start(&graph);
		for i in 0..60usize {
			let parent = graph.ids().nth(i / 2).unwrap_or(NodeId::ROOT);
			graph.attach(parent, (0.3, -0.4), (i % 20) as f64);
			sim.start(&graph);
			for _ in 0..20 {
				sim.tick(&mut graph);
			}
			assert!(all_finite(&graph));
		}
		assert_eq!(graph.len(), 61);
	}

	#[test]
	fn resize_keeps_positions() {
		let mut graph = Graph::new(400.0, 300.0);
		graph.attach(NodeId::ROOT, (900.0, 900.0), 2.0);
		let mut sim = simulation(800.0, 600.0);
		sim.start(&graph);
		let before: Vec<(f64, f64)> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
		sim.set_size(200.0, 100.0);
		let after: Vec<(f64, f64)> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
		assert_eq!(sim.size(), (200.0, 100.0));

		// The far-out node drifts back toward the new box rather than jumping.
		let far = graph.nodes()[1].x;
		sim.tick(&mut graph);
		let moved = graph.nodes()[1].x;
		assert!(moved < far);
		assert!(moved > 200.0);
	}
}
