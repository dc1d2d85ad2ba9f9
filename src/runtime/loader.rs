use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::foundation::error::{NocturneError, NocturneResult};
use crate::runtime::host::ScriptHost;
use crate::runtime::sketch::SketchRuntime;
use crate::window::{TimerId, Window};

/// Fixed, version-pinned location of the sketch runtime.
pub const RUNTIME_SRC: &str = "bundled:sketch-runtime@1.0.0/runtime.js";

/// Environment variable holding an optional load timeout in milliseconds.
pub const LOAD_TIMEOUT_ENV: &str = "NOCTURNE_LOAD_TIMEOUT_MS";

#[derive(Clone, Debug)]
pub struct LoaderOpts {
    pub src: String,
    /// Reject pending loads after this many milliseconds. `None` waits forever, so a host that
    /// never settles keeps its waiters until they are dropped with [`LibraryLoader::forget`].
    pub timeout_ms: Option<f64>,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            src: RUNTIME_SRC.to_owned(),
            timeout_ms: None,
        }
    }
}

impl LoaderOpts {
    /// Defaults, with `timeout_ms` taken from `NOCTURNE_LOAD_TIMEOUT_MS` when it parses as a
    /// positive number.
    pub fn from_env() -> Self {
        let timeout_ms = std::env::var(LOAD_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|&ms| ms.is_finite() && ms > 0.0);
        Self {
            timeout_ms,
            ..Self::default()
        }
    }
}

type Waiter = Box<dyn FnOnce(NocturneResult<Rc<SketchRuntime>>)>;

/// Identifies a callback queued on an in-flight load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaiterId(u64);

enum LoadState {
    Idle,
    Pending {
        attempt: u64,
        waiters: Vec<(WaiterId, Waiter)>,
        timer: Option<TimerId>,
    },
    Ready(Rc<SketchRuntime>),
}

/// Lazily loads the sketch runtime once and shares the handle.
///
/// Callers that arrive while a load is in flight join it instead of injecting again. A failed
/// load rejects every waiter and returns to idle; nothing is retried automatically.
pub struct LibraryLoader {
    window: Window,
    host: Rc<dyn ScriptHost>,
    opts: LoaderOpts,
    state: RefCell<LoadState>,
    attempts: Cell<u64>,
    next_waiter: Cell<u64>,
}

impl LibraryLoader {
    pub fn new(window: &Window, host: Rc<dyn ScriptHost>, opts: LoaderOpts) -> Rc<Self> {
        Rc::new(Self {
            window: window.clone(),
            host,
            opts,
            state: RefCell::new(LoadState::Idle),
            attempts: Cell::new(0),
            next_waiter: Cell::new(0),
        })
    }

    /// The loaded runtime, if any. A runtime the host already exposes is adopted while idle.
    pub fn cached(&self) -> Option<Rc<SketchRuntime>> {
        let mut st = self.state.borrow_mut();
        match &*st {
            LoadState::Ready(rt) => Some(Rc::clone(rt)),
            LoadState::Idle => {
                let rt = self.host.global_runtime()?;
                *st = LoadState::Ready(Rc::clone(&rt));
                Some(rt)
            }
            LoadState::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(&*self.state.borrow(), LoadState::Pending { .. })
    }

    /// Number of injections started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.get()
    }

    /// Callbacks queued on the in-flight load.
    pub fn waiter_count(&self) -> usize {
        match &*self.state.borrow() {
            LoadState::Pending { waiters, .. } => waiters.len(),
            _ => 0,
        }
    }

    /// Resolve the runtime, calling `on_done` at most once.
    ///
    /// With a cached handle `on_done` runs before `load` returns and `None` comes back.
    /// Otherwise it runs from the window's event loop when the load settles, unless the returned
    /// id is passed to [`forget`](Self::forget) first.
    #[tracing::instrument(skip_all)]
    pub fn load(
        self: &Rc<Self>,
        on_done: impl FnOnce(NocturneResult<Rc<SketchRuntime>>) + 'static,
    ) -> Option<WaiterId> {
        if let Some(rt) = self.cached() {
            on_done(Ok(rt));
            return None;
        }

        let id = WaiterId(self.next_waiter.get());
        self.next_waiter.set(id.0 + 1);

        if let LoadState::Pending { waiters, .. } = &mut *self.state.borrow_mut() {
            tracing::debug!("joining in-flight runtime load");
            waiters.push((id, Box::new(on_done)));
            return Some(id);
        }

        let attempt = self.attempts.get() + 1;
        self.attempts.set(attempt);

        let timer = self.opts.timeout_ms.map(|ms| {
            let weak = Rc::downgrade(self);
            self.window.set_timeout(ms, move || {
                if let Some(loader) = weak.upgrade() {
                    loader.settle(attempt, Err(format!("timed out after {ms} ms")));
                }
            })
        });

        *self.state.borrow_mut() = LoadState::Pending {
            attempt,
            waiters: vec![(id, Box::new(on_done))],
            timer,
        };

        tracing::debug!(src = %self.opts.src, attempt, "injecting sketch runtime");
        let weak = Rc::downgrade(self);
        self.host.inject(
            &self.opts.src,
            Box::new(move |outcome| {
                if let Some(loader) = weak.upgrade() {
                    loader.script_settled(attempt, outcome);
                }
            }),
        );
        Some(id)
    }

    /// Drop a queued callback without running it. The load itself keeps going.
    ///
    /// Returns `false` if the callback already ran or was dropped.
    pub fn forget(&self, id: WaiterId) -> bool {
        let dropped = {
            let mut st = self.state.borrow_mut();
            let LoadState::Pending { waiters, .. } = &mut *st else {
                return false;
            };
            waiters
                .iter()
                .position(|(w, _)| *w == id)
                .map(|pos| waiters.remove(pos))
        };
        dropped.is_some()
    }

    fn script_settled(&self, attempt: u64, outcome: Result<(), String>) {
        let result = match outcome {
            Ok(()) => self
                .host
                .global_runtime()
                .ok_or_else(|| "script loaded but did not expose the runtime handle".to_owned()),
            Err(msg) => Err(format!("failed to load {}: {msg}", self.opts.src)),
        };
        self.settle(attempt, result);
    }

    fn settle(&self, attempt: u64, result: Result<Rc<SketchRuntime>, String>) {
        let previous = {
            let mut st = self.state.borrow_mut();
            let current = matches!(&*st, LoadState::Pending { attempt: a, .. } if *a == attempt);
            if !current {
                tracing::debug!(attempt, "ignoring settle for a load that already finished");
                return;
            }
            let next = match &result {
                Ok(rt) => LoadState::Ready(Rc::clone(rt)),
                Err(_) => LoadState::Idle,
            };
            std::mem::replace(&mut *st, next)
        };

        let LoadState::Pending { waiters, timer, .. } = previous else {
            return;
        };
        if let Some(id) = timer {
            self.window.clear_timeout(id);
        }
        if let Err(msg) = &result {
            tracing::warn!(error = %msg, waiters = waiters.len(), "sketch runtime load failed");
        }
        for (_, waiter) in waiters {
            waiter(result.clone().map_err(NocturneError::load));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/loader.rs"]
mod tests;
