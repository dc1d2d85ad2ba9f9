use super::*;
use crate::foundation::core::Viewport;
use crate::runtime::host::{BundledScriptHost, ScriptBehavior};

type Outcomes = Rc<RefCell<Vec<Result<String, String>>>>;

fn win() -> Window {
    Window::with_unix_origin(Viewport::new(64.0, 32.0, 1.0).unwrap(), 0.0)
}

fn setup(
    behavior: ScriptBehavior,
    opts: LoaderOpts,
) -> (Window, Rc<BundledScriptHost>, Rc<LibraryLoader>) {
    let w = win();
    let host = Rc::new(BundledScriptHost::with_behavior(&w, behavior));
    let loader = LibraryLoader::new(&w, host.clone(), opts);
    (w, host, loader)
}

fn record(out: &Outcomes) -> impl FnOnce(NocturneResult<Rc<SketchRuntime>>) + 'static {
    let out = Rc::clone(out);
    move |r| {
        out.borrow_mut()
            .push(r.map(|rt| rt.version().to_owned()).map_err(|e| e.to_string()));
    }
}

#[test]
fn concurrent_loads_share_one_injection() {
    let (w, host, loader) = setup(ScriptBehavior::Install, LoaderOpts::default());
    let out: Outcomes = Rc::default();

    loader.load(record(&out));
    loader.load(record(&out));
    assert!(loader.is_pending());
    assert_eq!(host.injection_count(), 1);
    assert!(out.borrow().is_empty());

    w.tick(16.0);
    assert_eq!(host.injection_count(), 1);
    assert_eq!(host.injected_sources(), vec![RUNTIME_SRC.to_owned()]);
    assert_eq!(
        *out.borrow(),
        vec![Ok("1.0.0".to_owned()), Ok("1.0.0".to_owned())]
    );
    assert!(loader.cached().is_some());
}

#[test]
fn cached_handle_resolves_synchronously() {
    let (w, host, loader) = setup(ScriptBehavior::Install, LoaderOpts::default());
    let out: Outcomes = Rc::default();
    loader.load(record(&out));
    w.tick(16.0);

    loader.load(record(&out));
    assert_eq!(out.borrow().len(), 2);
    assert_eq!(host.injection_count(), 1);
    assert_eq!(loader.attempts(), 1);
}

#[test]
fn missing_global_handle_rejects_and_returns_to_idle() {
    let (w, host, loader) = setup(ScriptBehavior::InstallNothing, LoaderOpts::default());
    let out: Outcomes = Rc::default();
    loader.load(record(&out));
    w.tick(16.0);

    let got = out.borrow().clone();
    assert_eq!(got.len(), 1);
    let err = got[0].clone().unwrap_err();
    assert!(err.starts_with("load error:"), "{err}");
    assert!(!loader.is_pending());
    assert!(loader.cached().is_none());

    // nothing retries on its own, but a new call injects again
    w.tick(16.0);
    assert_eq!(host.injection_count(), 1);
    loader.load(record(&out));
    assert_eq!(host.injection_count(), 2);
}

#[test]
fn script_failure_rejects_every_waiter() {
    let (w, _host, loader) = setup(
        ScriptBehavior::Fail("404 not found".to_owned()),
        LoaderOpts::default(),
    );
    let out: Outcomes = Rc::default();
    loader.load(record(&out));
    loader.load(record(&out));
    w.tick(16.0);

    let got = out.borrow().clone();
    assert_eq!(got.len(), 2);
    for r in got {
        let err = r.unwrap_err();
        assert!(err.contains("404 not found"), "{err}");
    }
}

#[test]
fn hanging_load_times_out() {
    let opts = LoaderOpts {
        timeout_ms: Some(100.0),
        ..LoaderOpts::default()
    };
    let (w, _host, loader) = setup(ScriptBehavior::Hang, opts);
    let out: Outcomes = Rc::default();
    loader.load(record(&out));
    assert_eq!(w.pending_timer_count(), 1);

    w.tick(50.0);
    assert!(out.borrow().is_empty());
    w.tick(60.0);

    let got = out.borrow().clone();
    assert_eq!(got.len(), 1);
    assert!(got[0].clone().unwrap_err().contains("timed out"));
    assert!(!loader.is_pending());
}

#[test]
fn successful_load_clears_its_timeout() {
    let opts = LoaderOpts {
        timeout_ms: Some(100.0),
        ..LoaderOpts::default()
    };
    let (w, _host, loader) = setup(ScriptBehavior::Install, opts);
    let out: Outcomes = Rc::default();
    loader.load(record(&out));
    w.tick(16.0);
    assert_eq!(w.pending_timer_count(), 0);
    w.tick(200.0);
    assert_eq!(out.borrow().len(), 1);
    assert!(out.borrow()[0].is_ok());
}

#[test]
fn forgotten_waiters_never_run() {
    let (w, host, loader) = setup(ScriptBehavior::Install, LoaderOpts::default());
    let out: Outcomes = Rc::default();
    let first = loader.load(record(&out)).unwrap();
    let second = loader.load(record(&out)).unwrap();
    assert_ne!(first, second);
    assert_eq!(loader.waiter_count(), 2);

    assert!(loader.forget(first));
    assert!(!loader.forget(first));
    assert_eq!(loader.waiter_count(), 1);

    w.tick(16.0);
    assert_eq!(out.borrow().len(), 1);
    assert_eq!(host.injection_count(), 1);
    assert!(!loader.forget(second));
    assert!(loader.load(record(&out)).is_none());
}

#[test]
fn hanging_host_without_timeout_keeps_only_live_waiters() {
    let (_w, host, loader) = setup(ScriptBehavior::Hang, LoaderOpts::default());
    let out: Outcomes = Rc::default();
    for _ in 0..4 {
        let id = loader.load(record(&out)).unwrap();
        loader.forget(id);
    }
    assert!(loader.is_pending());
    assert_eq!(loader.waiter_count(), 0);
    assert_eq!(host.injection_count(), 1);
}
