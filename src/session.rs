//! Offline rendering: drive a headless window through the shell and hand frames to a sink.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::foundation::core::{FrameRGBA, Viewport};
use crate::foundation::error::{NocturneError, NocturneResult};
use crate::registry::Registry;
use crate::runtime::host::BundledScriptHost;
use crate::runtime::loader::{LibraryLoader, LoaderOpts};
use crate::shell::{Page, Shell, href_for};
use crate::window::{Container, Window};

/// Container every session mounts into.
pub const ROOT_CONTAINER: &str = "artwork-root";

#[derive(Clone, Debug)]
pub struct RenderOpts {
    pub viewport: Viewport,
    pub fps: f64,
    pub frames: u64,
    /// Fixed wall-clock origin. `None` uses the current system time.
    pub unix_origin_ms: Option<f64>,
    pub loader: LoaderOpts,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fps: 30.0,
            frames: 1,
            unix_origin_ms: None,
            loader: LoaderOpts::default(),
        }
    }
}

impl RenderOpts {
    fn validate(&self) -> NocturneResult<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(NocturneError::validation("fps must be finite and > 0"));
        }
        if self.frames == 0 {
            return Err(NocturneError::validation("frames must be >= 1"));
        }
        Ok(())
    }
}

/// Handed to [`FrameSink::begin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Consumes frames in increasing index order.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> NocturneResult<()>;
    fn push_frame(&mut self, index: u64, frame: &FrameRGBA) -> NocturneResult<()>;
    fn end(&mut self) -> NocturneResult<()>;
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    pub fn last(&self) -> Option<&FrameRGBA> {
        self.frames.last().map(|(_, f)| f)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> NocturneResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &FrameRGBA) -> NocturneResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> NocturneResult<()> {
        Ok(())
    }
}

/// Write `frame` as a PNG at `path`, creating parent directories.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> NocturneResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("create output dir '{}': {e}", parent.display())
        })?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| anyhow::anyhow!("write png '{}': {e}", path.display()))?;
    Ok(())
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, _cfg: SinkConfig) -> NocturneResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            anyhow::anyhow!("create output dir '{}': {e}", self.dir.display())
        })?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &FrameRGBA) -> NocturneResult<()> {
        let path = self.dir.join(format!("frame_{index:05}.png"));
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> NocturneResult<()> {
        Ok(())
    }
}

/// A headless page: window, container, loader and shell wired together.
pub struct RenderSession {
    window: Window,
    shell: Shell,
    opts: RenderOpts,
}

impl RenderSession {
    pub fn new(opts: RenderOpts) -> NocturneResult<Self> {
        opts.validate()?;
        let window = match opts.unix_origin_ms {
            Some(ms) => Window::with_unix_origin(opts.viewport, ms),
            None => Window::new(opts.viewport),
        };
        let container = Container::new(ROOT_CONTAINER);
        let host = Rc::new(BundledScriptHost::new(&window));
        let loader = LibraryLoader::new(&window, host, opts.loader.clone());
        let registry = Registry::builtin(loader)?;
        let shell = Shell::new(&window, &container, registry);
        Ok(Self {
            window,
            shell,
            opts,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.opts.fps
    }

    /// Mount `slug` and push `opts.frames` consecutive frames into `sink`.
    ///
    /// Library-backed artworks get one extra zero-length tick so a pending load can settle
    /// before the first frame is captured.
    #[tracing::instrument(skip(self, sink))]
    pub fn render(&mut self, slug: &str, sink: &mut dyn FrameSink) -> NocturneResult<()> {
        let page = self.shell.navigate(&href_for(slug))?;
        if matches!(page, Page::NotFound { .. }) {
            return Err(NocturneError::validation(format!("unknown artwork {slug:?}")));
        }

        let container = self.shell.container().clone();
        if container.last_surface().is_none() {
            self.window.tick(0.0);
        }
        let surface = container.last_surface().ok_or_else(|| {
            NocturneError::load(format!("{slug} produced no surface (runtime did not start)"))
        })?;

        let (width, height) = surface.backing_size();
        sink.begin(SinkConfig {
            width,
            height,
            fps: self.opts.fps,
        })?;
        let dt = self.frame_interval_ms();
        for index in 0..self.opts.frames {
            if index > 0 {
                self.window.tick(dt);
            }
            sink.push_frame(index, &surface.snapshot())?;
        }
        sink.end()?;

        tracing::debug!(frames = self.opts.frames, width, height, "render finished");
        self.shell.shutdown();
        Ok(())
    }
}
