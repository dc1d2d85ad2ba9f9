//! Repeating animation-frame task bound to a cancellation token.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::window::{FrameRequestId, FrameTime, Window};

type Step = Box<dyn FnMut(FrameTime)>;

struct LoopState {
    window: Window,
    running: Cell<bool>,
    pending: Cell<Option<FrameRequestId>>,
    frames: Cell<u64>,
    step: RefCell<Step>,
}

/// Token for a running frame loop. Cancelling it (or dropping it) stops the loop synchronously:
/// the pending frame request is withdrawn and no further step runs.
pub struct FrameLoop {
    state: Rc<LoopState>,
}

impl FrameLoop {
    /// Run `step` once immediately, then once per animation frame until cancelled.
    pub fn start(window: &Window, step: impl FnMut(FrameTime) + 'static) -> Self {
        let state = Rc::new(LoopState {
            window: window.clone(),
            running: Cell::new(true),
            pending: Cell::new(None),
            frames: Cell::new(0),
            step: RefCell::new(Box::new(step)),
        });
        run_step(&state, window.frame_time());
        schedule(&state);
        Self { state }
    }

    pub fn cancel(&self) {
        self.state.running.set(false);
        if let Some(id) = self.state.pending.take() {
            self.state.window.cancel_animation_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Steps executed so far, including the initial synchronous one.
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_step(state: &LoopState, t: FrameTime) {
    if !state.running.get() {
        return;
    }
    state.frames.set(state.frames.get() + 1);
    let mut step = state.step.borrow_mut();
    (*step)(t);
}

fn schedule(state: &Rc<LoopState>) {
    if !state.running.get() {
        return;
    }
    let s = Rc::clone(state);
    let id = state.window.request_animation_frame(move |t| {
        s.pending.set(None);
        run_step(&s, t);
        schedule(&s);
    });
    state.pending.set(Some(id));
}
