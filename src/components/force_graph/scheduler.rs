//! Repeating per-frame tasks.
//!
//! The scene runs three independent activities (layout stepping, camera +
//! paint, growth) off one display-refresh loop. Each is a [`Task`] that
//! returns [`Repeat::Stop`] to unregister itself. Everything runs on one
//! thread; tasks share state through `Rc<RefCell<_>>`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Whether a task wants to run again next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
	/// Run again next frame.
	Continue,
	/// Unregister.
	Stop,
}

/// A per-frame callback receiving the frame time in milliseconds.
pub type Task = Box<dyn FnMut(f64) -> Repeat>;

/// Something that calls tasks once per display refresh.
pub trait Scheduler {
	/// Call `task` every frame until it returns [`Repeat::Stop`].
	fn every_frame(&self, task: Task);
}

/// Runs every task in registration order, dropping those that asked to
/// stop. Tasks registered while a frame runs join on the next frame.
#[derive(Default)]
struct TaskQueue {
	tasks: RefCell<Vec<Task>>,
	incoming: RefCell<Vec<Task>>,
}

impl TaskQueue {
	fn push(&self, task: Task) {
		self.incoming.borrow_mut().push(task);
	}

	/// Returns how many tasks remain registered.
	fn run(&self, now_ms: f64) -> usize {
		let mut tasks = self.tasks.borrow_mut();
		tasks.append(&mut self.incoming.borrow_mut());
		tasks.retain_mut(|task| task(now_ms) == Repeat::Continue);
		tasks.len() + self.incoming.borrow().len()
	}
}

/// Browser scheduler backed by `requestAnimationFrame`.
///
/// The frame callback only re-arms itself while tasks remain, and
/// [`every_frame`](Scheduler::every_frame) re-arms it if it went idle, so
/// there is never more than one pending frame request.
pub struct AnimationFrames {
	queue: Rc<TaskQueue>,
	armed: Rc<Cell<bool>>,
	frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationFrames {
	/// An idle scheduler; the first task arms the frame loop.
	pub fn new() -> Self {
		let queue = Rc::new(TaskQueue::default());
		let armed = Rc::new(Cell::new(false));
		let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

		let (queue_inner, armed_inner, frame_inner) = (queue.clone(), armed.clone(), frame.clone());
		*frame.borrow_mut() = Some(Closure::new(move || {
			armed_inner.set(false);
			if queue_inner.run(js_sys::Date::now()) > 0 {
				armed_inner.set(request_frame(&frame_inner));
			}
		}));

		Self {
			queue,
			armed,
			frame,
		}
	}
}

impl Default for AnimationFrames {
	fn default() -> Self {
		Self::new()
	}
}

impl Scheduler for AnimationFrames {
	fn every_frame(&self, task: Task) {
		self.queue.push(task);
		if !self.armed.get() {
			self.armed.set(request_frame(&self.frame));
		}
	}
}

fn request_frame(frame: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> bool {
	let Some(window) = web_sys::window() else {
		return false;
	};
	match *frame.borrow() {
		Some(ref cb) => window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.is_ok(),
		None => false,
	}
}

/// Scheduler driven by hand, one [`advance`](Self::advance) per frame.
/// Useful off the browser and in tests.
#[derive(Default)]
pub struct ManualFrames {
	queue: TaskQueue,
}

impl ManualFrames {
	/// An empty scheduler.
	pub fn new() -> Self {
		Self::default()
	}

	/// Run one frame. Returns how many tasks are still registered.
	pub fn advance(&self, now_ms: f64) -> usize {
		self.queue.run(now_ms)
	}
}

impl Scheduler for ManualFrames {
	fn every_frame(&self, task: Task) {
		self.queue.push(task);
	}
}
