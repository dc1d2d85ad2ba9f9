use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::sketch::SketchRuntime;
use crate::window::Window;

/// Callback a [`ScriptHost`] invokes exactly once when an injected script settles.
pub type SettleFn = Box<dyn FnOnce(Result<(), String>)>;

/// Where the sketch runtime comes from.
///
/// `inject` starts loading `src` and must settle asynchronously (never from inside `inject`).
/// After a successful settle, `global_runtime` is expected to return the handle; a host that
/// settles successfully without exposing one is reported as a load failure by the loader.
pub trait ScriptHost {
    fn inject(&self, src: &str, on_settle: SettleFn);

    fn global_runtime(&self) -> Option<Rc<SketchRuntime>>;
}

/// What [`BundledScriptHost`] does when a script is injected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptBehavior {
    /// Install the bundled runtime as the global handle, then settle successfully.
    Install,
    /// Settle successfully without installing anything.
    InstallNothing,
    /// Settle with the given error.
    Fail(String),
    /// Never settle.
    Hang,
}

/// Headless host serving the runtime compiled into this crate. Settles on the next window tick.
pub struct BundledScriptHost {
    window: Window,
    behavior: ScriptBehavior,
    global: Rc<RefCell<Option<Rc<SketchRuntime>>>>,
    injected: RefCell<Vec<String>>,
}

impl BundledScriptHost {
    pub fn new(window: &Window) -> Self {
        Self::with_behavior(window, ScriptBehavior::Install)
    }

    pub fn with_behavior(window: &Window, behavior: ScriptBehavior) -> Self {
        Self {
            window: window.clone(),
            behavior,
            global: Rc::new(RefCell::new(None)),
            injected: RefCell::new(Vec::new()),
        }
    }

    /// Number of `inject` calls seen so far.
    pub fn injection_count(&self) -> usize {
        self.injected.borrow().len()
    }

    pub fn injected_sources(&self) -> Vec<String> {
        self.injected.borrow().clone()
    }
}

impl ScriptHost for BundledScriptHost {
    fn inject(&self, src: &str, on_settle: SettleFn) {
        self.injected.borrow_mut().push(src.to_owned());
        tracing::debug!(src, behavior = ?self.behavior, "script injected");

        match &self.behavior {
            ScriptBehavior::Install => {
                let global = Rc::clone(&self.global);
                self.window.post_task(move || {
                    *global.borrow_mut() = Some(Rc::new(SketchRuntime::new()));
                    on_settle(Ok(()));
                });
            }
            ScriptBehavior::InstallNothing => {
                self.window.post_task(move || on_settle(Ok(())));
            }
            ScriptBehavior::Fail(msg) => {
                let msg = msg.clone();
                self.window.post_task(move || on_settle(Err(msg)));
            }
            ScriptBehavior::Hang => drop(on_settle),
        }
    }

    fn global_runtime(&self) -> Option<Rc<SketchRuntime>> {
        self.global.borrow().clone()
    }
}
