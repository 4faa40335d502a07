//! Periodic procedural growth of the tree.
//!
//! Every `interval`-th scheduler firing picks a random existing node, buds a
//! new child next to it, bumps the weight of the child's ancestors and
//! restarts the simulation. Once the graph reaches `max_nodes` the process
//! moves to [`GrowthState::Stopped`] and never grows again.

use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

use super::config::GrowthConfig;
use super::graph::{Graph, NodeId};
use super::simulation::ForceSimulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthState {
	/// Still adding nodes.
	Running,
	/// Terminal: the node cap was reached.
	Stopped,
}

/// A concrete growth step: where the bud attaches, its spawn offset and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bud {
	/// Node the bud grows from.
	pub source: NodeId,
	/// Spawn position relative to the source.
	pub offset: (f64, f64),
	/// Drives the new node's radius.
	pub size_value: f64,
}

/// What a single scheduler firing did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthOutcome {
	/// Not this firing's turn.
	Waiting,
	/// A node was added.
	Grew(NodeId),
	/// The cap is reached; no further firings will grow.
	Stopped,
}

/// Adds a node every `interval` firings until the node cap is reached.
pub struct GrowthProcess {
	config: GrowthConfig,
	state: GrowthState,
	firings: u64,
	rng: StdRng,
}

impl GrowthProcess {
	/// A running process drawing from `rng`.
	pub fn new(config: GrowthConfig, rng: StdRng) -> Self {
		Self {
			config,
			state: GrowthState::Running,
			firings: 0,
			rng,
		}
	}

	/// Current state.
	pub fn state(&self) -> GrowthState {
		self.state
	}

	/// Firings handled so far.
	pub fn firings(&self) -> u64 {
		self.firings
	}

	/// Draw a random bud for the current graph.
	pub fn plan(&mut self, graph: &Graph) -> Bud {
		let source = graph
			.ids()
			.nth(self.rng.gen_range(0..graph.len()))
			.unwrap_or(NodeId::ROOT);
		let jitter = self.config.jitter;
		let offset = if jitter > 0.0 {
			(
				self.rng.gen_range(-jitter..jitter),
				self.rng.gen_range(-jitter..jitter),
			)
		} else {
			(0.0, 0.0)
		};
		Bud {
			source,
			offset,
			size_value: self.rng.gen_range(0..self.config.size_limit) as f64,
		}
	}

	/// Apply a bud: append node and link, inflate ancestors, restart layout.
	pub fn grow(&mut self, bud: Bud, graph: &mut Graph, simulation: &mut ForceSimulation) -> NodeId {
		let id = graph.attach(bud.source, bud.offset, bud.size_value);
		let inflated = graph.inflate_ancestors(id, self.config.weight_increment);
		simulation.start(graph);
		debug!(
			"grew node {} from {} (size {}, {} ancestors inflated)",
			id.index(),
			bud.source.index(),
			bud.size_value,
			inflated
		);
		if graph.len() >= self.config.max_nodes {
			self.finish(graph);
		}
		id
	}

	/// Handle one scheduler firing.
	pub fn fire(&mut self, graph: &mut Graph, simulation: &mut ForceSimulation) -> GrowthOutcome {
		if self.state == GrowthState::Stopped {
			return GrowthOutcome::Stopped;
		}
		if graph.len() >= self.config.max_nodes {
			self.finish(graph);
			return GrowthOutcome::Stopped;
		}

		let turn = self.firings % u64::from(self.config.interval) == 0;
		self.firings += 1;
		if !turn {
			return GrowthOutcome::Waiting;
		}

		let bud = self.plan(graph);
		GrowthOutcome::Grew(self.grow(bud, graph, simulation))
	}

	fn finish(&mut self, graph: &Graph) {
		if self.state != GrowthState::Stopped {
			info!("growth finished with {} nodes", graph.len());
			self.state = GrowthState::Stopped;
		}
	}
}
