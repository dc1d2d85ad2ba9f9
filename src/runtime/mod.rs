//! The lazily loaded sketch runtime: an immediate-mode drawing helper with its own frame
//! scheduler, the host that "injects" it, and the loader that makes sure it is injected once.

pub mod host;
pub mod loader;
pub mod sketch;

pub use host::{BundledScriptHost, ScriptBehavior, ScriptHost};
pub use loader::{LibraryLoader, LoaderOpts, RUNTIME_SRC, WaiterId};
pub use sketch::{Sketch, SketchFrame, SketchInstance, SketchRuntime};
