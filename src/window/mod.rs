//! Headless single-threaded event loop standing in for a browser window.
//!
//! A [`Window`] owns the viewport, a monotonic clock, and four kinds of pending work:
//!
//! - posted tasks (FIFO, used to settle asynchronous loads),
//! - one-shot timers,
//! - animation-frame callbacks (cancellable, one-shot, like `requestAnimationFrame`),
//! - resize and pointer listeners.
//!
//! Nothing runs until [`Window::tick`] is called. A tick advances the clock, then runs the
//! tasks that were queued at tick start, then due timers, then the animation-frame callbacks
//! that were pending at tick start. Callbacks requested during a tick run on the next one.

pub mod container;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::core::{Point, Viewport};

pub use container::{Container, NodeId};

/// Timestamps handed to animation-frame callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since the window was created (monotonic).
    pub now_ms: f64,
    /// Wall-clock milliseconds since the Unix epoch.
    pub unix_ms: f64,
}

/// Identifier returned by [`Window::request_animation_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(u64);

/// Identifier for a registered resize or pointer listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Identifier returned by [`Window::set_timeout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

/// Last known pointer position and button state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Point,
    pub pressed: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            pressed: false,
        }
    }
}

type FrameCallback = Box<dyn FnOnce(FrameTime)>;
type Task = Box<dyn FnOnce()>;
type ResizeListener = Rc<dyn Fn(Viewport)>;
type PointerListener = Rc<dyn Fn(PointerEvent)>;

struct Timer {
    due_ms: f64,
    task: Task,
}

struct WindowState {
    viewport: Viewport,
    now_ms: f64,
    unix_origin_ms: f64,
    next_id: u64,

    frames: BTreeMap<u64, FrameCallback>,
    tasks: VecDeque<Task>,
    timers: BTreeMap<u64, Timer>,
    resize_listeners: BTreeMap<u64, ResizeListener>,
    pointer_listeners: BTreeMap<u64, PointerListener>,
    pointer: PointerState,
}

impl WindowState {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Cheap-to-clone handle to the shared window state.
#[derive(Clone)]
pub struct Window {
    state: Rc<RefCell<WindowState>>,
}

impl Window {
    /// Window whose wall clock starts at the current system time.
    pub fn new(viewport: Viewport) -> Self {
        let unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        Self::with_unix_origin(viewport, unix_ms)
    }

    /// Window whose wall clock starts at `unix_origin_ms`. Fully deterministic.
    pub fn with_unix_origin(viewport: Viewport, unix_origin_ms: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(WindowState {
                viewport,
                now_ms: 0.0,
                unix_origin_ms,
                next_id: 0,
                frames: BTreeMap::new(),
                tasks: VecDeque::new(),
                timers: BTreeMap::new(),
                resize_listeners: BTreeMap::new(),
                pointer_listeners: BTreeMap::new(),
                pointer: PointerState::default(),
            })),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    pub fn frame_time(&self) -> FrameTime {
        let st = self.state.borrow();
        FrameTime {
            now_ms: st.now_ms,
            unix_ms: st.unix_origin_ms + st.now_ms,
        }
    }

    pub fn pointer(&self) -> PointerState {
        self.state.borrow().pointer
    }

    /// Replace the viewport and notify every resize listener, in registration order.
    pub fn set_viewport(&self, viewport: Viewport) {
        let listeners: Vec<ResizeListener> = {
            let mut st = self.state.borrow_mut();
            st.viewport = viewport;
            st.resize_listeners.values().cloned().collect()
        };
        for l in listeners {
            l(viewport);
        }
    }

    /// Update pointer state and notify every pointer listener, in registration order.
    pub fn dispatch_pointer(&self, event: PointerEvent) {
        let listeners: Vec<PointerListener> = {
            let mut st = self.state.borrow_mut();
            st.pointer.position = event.position;
            match event.kind {
                PointerKind::Down => st.pointer.pressed = true,
                PointerKind::Up => st.pointer.pressed = false,
                PointerKind::Move => {}
            }
            st.pointer_listeners.values().cloned().collect()
        };
        for l in listeners {
            l(event);
        }
    }

    pub fn request_animation_frame(&self, f: impl FnOnce(FrameTime) + 'static) -> FrameRequestId {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.frames.insert(id, Box::new(f));
        FrameRequestId(id)
    }

    /// Cancel a pending frame callback. Returns `false` if it already ran or was cancelled.
    pub fn cancel_animation_frame(&self, id: FrameRequestId) -> bool {
        self.state.borrow_mut().frames.remove(&id.0).is_some()
    }

    pub fn add_resize_listener(&self, f: impl Fn(Viewport) + 'static) -> ListenerId {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.resize_listeners.insert(id, Rc::new(f));
        ListenerId(id)
    }

    pub fn remove_resize_listener(&self, id: ListenerId) -> bool {
        self.state
            .borrow_mut()
            .resize_listeners
            .remove(&id.0)
            .is_some()
    }

    pub fn add_pointer_listener(&self, f: impl Fn(PointerEvent) + 'static) -> ListenerId {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.pointer_listeners.insert(id, Rc::new(f));
        ListenerId(id)
    }

    pub fn remove_pointer_listener(&self, id: ListenerId) -> bool {
        self.state
            .borrow_mut()
            .pointer_listeners
            .remove(&id.0)
            .is_some()
    }

    /// Queue a task for the next tick.
    pub fn post_task(&self, f: impl FnOnce() + 'static) {
        self.state.borrow_mut().tasks.push_back(Box::new(f));
    }

    /// Run `f` on the first tick at which at least `delay_ms` has elapsed.
    pub fn set_timeout(&self, delay_ms: f64, f: impl FnOnce() + 'static) -> TimerId {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        let due_ms = st.now_ms + delay_ms.max(0.0);
        st.timers.insert(
            id,
            Timer {
                due_ms,
                task: Box::new(f),
            },
        );
        TimerId(id)
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.state.borrow_mut().timers.remove(&id.0).is_some()
    }

    pub fn pending_frame_count(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_task_count(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn resize_listener_count(&self) -> usize {
        self.state.borrow().resize_listeners.len()
    }

    pub fn pointer_listener_count(&self) -> usize {
        self.state.borrow().pointer_listeners.len()
    }

    /// Advance the clock by `dt_ms` and run one round of pending work.
    ///
    /// Returns the number of animation-frame callbacks that ran.
    pub fn tick(&self, dt_ms: f64) -> usize {
        let frames: Vec<u64> = {
            let mut st = self.state.borrow_mut();
            st.now_ms += dt_ms.max(0.0);
            st.frames.keys().copied().collect()
        };
        self.run_tasks();
        self.run_due_timers();
        self.run_frames(frames)
    }

    fn run_tasks(&self) {
        let queued = self.state.borrow().tasks.len();
        for _ in 0..queued {
            let Some(task) = self.state.borrow_mut().tasks.pop_front() else {
                break;
            };
            task();
        }
    }

    fn run_due_timers(&self) {
        let due: Vec<u64> = {
            let st = self.state.borrow();
            let mut due: Vec<(f64, u64)> = st
                .timers
                .iter()
                .filter(|(_, t)| t.due_ms <= st.now_ms)
                .map(|(&id, t)| (t.due_ms, id))
                .collect();
            due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            due.into_iter().map(|(_, id)| id).collect()
        };
        for id in due {
            // A timer that ran earlier this round may have cleared this one.
            let Some(timer) = self.state.borrow_mut().timers.remove(&id) else {
                continue;
            };
            (timer.task)();
        }
    }

    fn run_frames(&self, ids: Vec<u64>) -> usize {
        let mut ran = 0usize;
        for id in ids {
            let Some(cb) = self.state.borrow_mut().frames.remove(&id) else {
                continue;
            };
            cb(self.frame_time());
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
#[path = "../../tests/unit/window/window.rs"]
mod tests;
