//! Colors and stroke styles for the growing graph.

use super::graph::Node;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity in `0..=1`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill and outline for one kind of node.
#[derive(Clone, Copy, Debug)]
pub struct NodeColors {
	/// Circle fill.
	pub fill: Color,
	/// Circle outline.
	pub outline: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Erased from the previous frame before drawing. Lower alpha leaves
	/// longer trails; 1.0 is a hard clear.
	pub trail: Color,
	/// Link stroke.
	pub link: Color,
	/// Links are open paths; this only keeps a stale fill style from
	/// leaking into them.
	pub link_fill: Color,
	/// Link stroke width.
	pub link_width: f64,
	/// Root node colors.
	pub root: NodeColors,
	/// Colors for every other node.
	pub bud: NodeColors,
	/// Node outline width.
	pub outline_width: f64,
}

impl Theme {
	/// Colors for `node`.
	pub fn node_colors(&self, node: &Node) -> NodeColors {
		if node.is_root() { self.root } else { self.bud }
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			trail: Color::rgba(0, 0, 0, 0.35),
			link: Color::rgb(0, 255, 0),
			link_fill: Color::rgba(0, 0, 0, 0.0),
			link_width: 1.0,
			root: NodeColors {
				fill: Color::rgb(255, 255, 255),
				// hsla(10, 80%, 75%, .8)
				outline: Color::rgba(242, 157, 140, 0.8),
			},
			bud: NodeColors {
				fill: Color::rgb(255, 255, 255),
				outline: Color::rgb(255, 255, 255),
			},
			outline_width: 1.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::graph::{Graph, NodeId};

	#[test]
	fn css_formatting() {
		assert_eq!(Color::rgb(0, 255, 0).to_css(), "#00ff00");
		assert_eq!(
			Color::rgb(242, 157, 140).with_alpha(0.8).to_css(),
			"rgba(242, 157, 140, 0.8)"
		);
	}

	#[test]
	fn root_and_buds_get_their_own_colors() {
		let mut graph = Graph::new(0.0, 0.0);
		let bud = graph.attach(NodeId::ROOT, (1.0, 1.0), 1.0);
		let theme = Theme::default();
		assert_eq!(theme.node_colors(graph.root()).outline, theme.root.outline);
		assert_eq!(theme.node_colors(graph.node(bud)).outline, theme.bud.outline);
	}
}
