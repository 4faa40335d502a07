//! Frame painting.
//!
//! Each frame:
//! 1. Erase part of the previous frame with a `destination-out` fill, which
//!    leaves fading trails behind moving nodes
//! 2. Apply the camera transform
//! 3. Links, newest first, as strokes with a transparent fill
//! 4. Nodes, newest first, as stroked and filled circles
//!
//! All of it happens between `save()` and `restore()` so the transform never
//! leaks into the next frame.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::Viewport;
use super::graph::Graph;
use super::theme::{Color, Theme};

/// How new paint combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
	/// Paint over existing pixels.
	SourceOver,
	/// Erase existing pixels in proportion to the new paint's alpha.
	DestinationOut,
}

impl Composite {
	/// The canvas `globalCompositeOperation` name.
	pub fn as_css(self) -> &'static str {
		match self {
			Composite::SourceOver => "source-over",
			Composite::DestinationOut => "destination-out",
		}
	}
}

/// Immediate-mode 2D drawing target.
pub trait Surface {
	/// Push the drawing state.
	fn save(&self);
	/// Pop the drawing state.
	fn restore(&self);
	/// Select how new paint combines with existing pixels.
	fn set_composite(&self, mode: Composite);
	/// Set the fill color.
	fn set_fill(&self, color: Color);
	/// Set the stroke color.
	fn set_stroke(&self, color: Color);
	/// Set the stroke width.
	fn set_line_width(&self, width: f64);
	/// Fill an axis-aligned rectangle.
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	/// Translate the current transform.
	fn translate(&self, x: f64, y: f64);
	/// Uniformly scale the current transform.
	fn scale(&self, k: f64);
	/// Start a new path.
	fn begin_path(&self);
	/// Move the pen without drawing.
	fn move_to(&self, x: f64, y: f64);
	/// Add a line segment to the path.
	fn line_to(&self, x: f64, y: f64);
	/// Add a full circle to the path.
	fn circle(&self, x: f64, y: f64, r: f64);
	/// Close the current subpath.
	fn close_path(&self);
	/// Stroke the current path.
	fn stroke(&self);
	/// Fill the current path.
	fn fill(&self);
}

impl Surface for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn set_composite(&self, mode: Composite) {
		let _ = self.set_global_composite_operation(mode.as_css());
	}

	fn set_fill(&self, color: Color) {
		self.set_fill_style_str(&color.to_css());
	}

	fn set_stroke(&self, color: Color) {
		self.set_stroke_style_str(&color.to_css());
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&self, k: f64) {
		let _ = CanvasRenderingContext2d::scale(self, k, k);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn circle(&self, x: f64, y: f64, r: f64) {
		let _ = self.arc(x, y, r, 0.0, 2.0 * PI);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}
}

/// Paint one frame of `graph` through the viewport's transform.
pub fn render(graph: &Graph, viewport: &Viewport, theme: &Theme, surface: &impl Surface) {
	surface.save();

	surface.set_composite(Composite::DestinationOut);
	surface.set_fill(theme.trail);
	surface.fill_rect(0.0, 0.0, viewport.width, viewport.height);
	surface.set_composite(Composite::SourceOver);

	let transform = viewport.transform();
	surface.translate(transform.tx, transform.ty);
	surface.scale(transform.scale);

	draw_links(graph, theme, surface);
	draw_nodes(graph, theme, surface);

	surface.restore();
}

fn draw_links(graph: &Graph, theme: &Theme, surface: &impl Surface) {
	surface.set_fill(theme.link_fill);
	surface.set_stroke(theme.link);
	surface.set_line_width(theme.link_width);
	for link in graph.links().iter().rev() {
		let (source, target) = (graph.node(link.source), graph.node(link.target));
		surface.begin_path();
		surface.move_to(source.x, source.y);
		surface.line_to(target.x, target.y);
		surface.stroke();
	}
}

fn draw_nodes(graph: &Graph, theme: &Theme, surface: &impl Surface) {
	surface.set_line_width(theme.outline_width);
	for node in graph.nodes().iter().rev() {
		let colors = theme.node_colors(node);
		surface.set_fill(colors.fill);
		surface.set_stroke(colors.outline);
		surface.begin_path();
		surface.circle(node.x, node.y, node.radius());
		surface.close_path();
		surface.stroke();
		surface.fill();
	}
}
