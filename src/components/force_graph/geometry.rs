//! Size-to-radius mapping and bounding boxes in world space.

use super::graph::Node;

/// On-screen radius for a node's size value: `1 + sqrt(16 * size)`.
///
/// A size of zero still yields a radius of 1 so every node stays visible.
pub fn visual_radius(size_value: f64) -> f64 {
	1.0 + (16.0 * size_value.max(0.0)).sqrt()
}

/// Axis-aligned box covering a set of circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
	/// Leftmost edge.
	pub min_x: f64,
	/// Rightmost edge.
	pub max_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Extents {
	/// The empty box: infinite sentinels that any point expands.
	pub const EMPTY: Self = Self {
		min_x: f64::INFINITY,
		max_x: f64::NEG_INFINITY,
		min_y: f64::INFINITY,
		max_y: f64::NEG_INFINITY,
	};

	/// True when nothing has been included yet.
	pub fn is_empty(&self) -> bool {
		self.min_x > self.max_x || self.min_y > self.max_y
	}

	/// Grow the box to cover a circle.
	pub fn include_circle(&mut self, x: f64, y: f64, r: f64) {
		self.min_x = self.min_x.min(x - r);
		self.max_x = self.max_x.max(x + r);
		self.min_y = self.min_y.min(y - r);
		self.max_y = self.max_y.max(y + r);
	}

	/// Horizontal span.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical span.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Box covering every node expanded by its visual radius.
///
/// Returns [`Extents::EMPTY`] for an empty slice.
pub fn bounding_extents<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Extents {
	let mut extents = Extents::EMPTY;
	for node in nodes {
		extents.include_circle(node.x, node.y, node.radius());
	}
	extents
}
