use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use nocturne::RowStore as _;
use nocturne::stars::{GridOrigin, pg_constellation, seed_if_empty};

const STORE_ENV: &str = "NOCTURNE_STORE";

#[derive(Parser, Debug)]
#[command(name = "nocturne", version)]
struct Cli {
    /// Log lifecycle events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered artworks in navigation order.
    List(ListArgs),
    /// Navigate to a location and print the resulting page.
    Show(ShowArgs),
    /// Render an artwork and write the last frame as a PNG.
    Frame(FrameArgs),
    /// Render a sequence of numbered PNG frames.
    Render(RenderArgs),
    /// Print the star map.
    Stars(StarsArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Path-style location, e.g. `/` or `/particle`.
    location: String,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Logical viewport width.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Logical viewport height.
    #[arg(long, default_value_t = 360.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Frames per second of the simulated clock.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Fixed wall clock (Unix ms) for reproducible output.
    #[arg(long)]
    unix_ms: Option<f64>,

    /// Reject the sketch runtime load after this many ms.
    #[arg(long)]
    load_timeout_ms: Option<f64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Artwork slug.
    #[arg(long)]
    slug: String,

    /// Frames to simulate before capturing.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    #[command(flatten)]
    view: ViewArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Artwork slug.
    #[arg(long)]
    slug: String,

    /// Number of frames to write.
    #[arg(long)]
    frames: u64,

    #[command(flatten)]
    view: ViewArgs,

    /// Output directory for `frame_NNNNN.png`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct StarsArgs {
    /// Empty the store before seeding.
    #[arg(long)]
    reset: bool,

    /// JSON row store to round-trip the stars through. Falls back to `NOCTURNE_STORE`.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Print with `y = 0` on the first line, which mirrors the map vertically.
    #[arg(long)]
    top_down: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Show(args) => cmd_show(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Stars(args) => cmd_stars(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn render_opts(view: &ViewArgs, frames: u64) -> anyhow::Result<nocturne::RenderOpts> {
    let viewport = nocturne::Viewport::new(view.width, view.height, view.dpr)
        .context("invalid viewport")?;
    let mut loader = nocturne::LoaderOpts::from_env();
    if view.load_timeout_ms.is_some() {
        loader.timeout_ms = view.load_timeout_ms;
    }
    Ok(nocturne::RenderOpts {
        viewport,
        fps: view.fps,
        frames,
        unix_origin_ms: view.unix_ms,
        loader,
    })
}

fn headless_shell() -> anyhow::Result<nocturne::RenderSession> {
    nocturne::RenderSession::new(nocturne::RenderOpts {
        loader: nocturne::LoaderOpts::from_env(),
        ..nocturne::RenderOpts::default()
    })
    .context("build headless shell")
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let session = headless_shell()?;
    let registry = session.shell().registry();
    if args.json {
        let metas: Vec<&nocturne::ArtworkMeta> = registry.artworks().map(|a| a.meta()).collect();
        println!("{}", serde_json::to_string_pretty(&metas)?);
    } else {
        for a in registry.artworks() {
            let m = a.meta();
            println!("{:<16} {:<22} {}", m.slug, m.title, m.description);
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let mut session = headless_shell()?;
    let page = session
        .shell_mut()
        .navigate(&args.location)
        .with_context(|| format!("navigate to '{}'", args.location))?;
    print!("{page}");
    session.shell_mut().shutdown();
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let opts = render_opts(&args.view, args.frames)?;
    let mut session = nocturne::RenderSession::new(opts)?;
    let mut sink = nocturne::InMemorySink::new();
    session
        .render(&args.slug, &mut sink)
        .with_context(|| format!("render '{}'", args.slug))?;

    let frame = sink.last().context("renderer produced no frames")?;
    nocturne::session::write_png(&args.out, frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = render_opts(&args.view, args.frames)?;
    let mut session = nocturne::RenderSession::new(opts)?;
    let mut sink = nocturne::PngDirSink::new(&args.out_dir);
    session
        .render(&args.slug, &mut sink)
        .with_context(|| format!("render '{}'", args.slug))?;
    eprintln!(
        "wrote {} frames to {}",
        sink.written().len(),
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_stars(args: StarsArgs) -> anyhow::Result<()> {
    let grid = nocturne::StarGrid {
        origin: if args.top_down {
            GridOrigin::TopLeft
        } else {
            GridOrigin::BottomLeft
        },
        ..nocturne::StarGrid::default()
    };

    let store_path = args
        .store
        .or_else(|| std::env::var_os(STORE_ENV).map(PathBuf::from));
    let stars = match store_path {
        Some(path) => {
            let mut store = nocturne::JsonRowStore::new(&path);
            let ctx = || format!("star store '{}'", path.display());
            store.ensure_schema().with_context(ctx)?;
            if args.reset {
                store.truncate().with_context(ctx)?;
            }
            seed_if_empty(&mut store, &pg_constellation()).with_context(ctx)?;
            store.fetch_ordered().with_context(ctx)?
        }
        None => pg_constellation(),
    };

    for line in grid.render(&stars) {
        println!("{line}");
    }
    Ok(())
}
