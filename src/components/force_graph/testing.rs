//! Test doubles shared by the module tests.

use std::cell::{Ref, RefCell};

use super::render::{Composite, Surface};
use super::theme::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
	Save,
	Restore,
	Composite(Composite),
	Fill(Color),
	Stroke(Color),
	LineWidth(f64),
	FillRect(f64, f64, f64, f64),
	Translate(f64, f64),
	Scale(f64),
	BeginPath,
	MoveTo(f64, f64),
	LineTo(f64, f64),
	Circle(f64, f64, f64),
	ClosePath,
	StrokePath,
	FillPath,
}

#[derive(Default)]
pub struct Recorder {
	ops: RefCell<Vec<Op>>,
}

impl Recorder {
	fn push(&self, op: Op) {
		self.ops.borrow_mut().push(op);
	}

	pub fn ops(&self) -> Ref<'_, Vec<Op>> {
		self.ops.borrow()
	}
}

impl Surface for Recorder {
	fn save(&self) {
		self.push(Op::Save);
	}
	fn restore(&self) {
		self.push(Op::Restore);
	}
	fn set_composite(&self, mode: Composite) {
		self.push(Op::Composite(mode));
	}
	fn set_fill(&self, color: Color) {
		self.push(Op::Fill(color));
	}
	fn set_stroke(&self, color: Color) {
		self.push(Op::Stroke(color));
	}
	fn set_line_width(&self, width: f64) {
		self.push(Op::LineWidth(width));
	}
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		self.push(Op::FillRect(x, y, w, h));
	}
	fn translate(&self, x: f64, y: f64) {
		self.push(Op::Translate(x, y));
	}
	fn scale(&self, k: f64) {
		self.push(Op::Scale(k));
	}
	fn begin_path(&self) {
		self.push(Op::BeginPath);
	}
	fn move_to(&self, x: f64, y: f64) {
		self.push(Op::MoveTo(x, y));
	}
	fn line_to(&self, x: f64, y: f64) {
		self.push(Op::LineTo(x, y));
	}
	fn circle(&self, x: f64, y: f64, r: f64) {
		self.push(Op::Circle(x, y, r));
	}
	fn close_path(&self) {
		self.push(Op::ClosePath);
	}
	fn stroke(&self) {
		self.push(Op::StrokePath);
	}
	fn fill(&self) {
		self.push(Op::FillPath);
	}
}
