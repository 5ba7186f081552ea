use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep the scroll position and print every layer's style channels as JSON lines.
    Trace(TraceArgs),
    /// Simulate the particle backdrop and write it as a PNG.
    Field(FieldArgs),
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Page configuration JSON; the built-in portfolio page when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scroll offset of the first frame.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Scroll offset of the last frame; the bottom of the page when omitted.
    #[arg(long)]
    to: Option<f64>,

    /// Number of frames.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Frame rate used to derive timestamps.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct FieldArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..=65535))]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..=65535))]
    height: u32,

    /// Simulation steps before capture.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Particle layout seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Palette.
    #[arg(long, value_enum, default_value_t = ThemeChoice::Dark)]
    theme: ThemeChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

impl ThemeChoice {
    fn theme(self) -> scrollfx::Theme {
        match self {
            Self::Light => scrollfx::Theme::Light,
            Self::Dark => scrollfx::Theme::Dark,
        }
    }

    fn background(self) -> [u8; 4] {
        match self {
            Self::Light => [250, 250, 250, 255],
            Self::Dark => [18, 20, 28, 255],
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Field(args) => cmd_field(args),
    }
}

fn read_page_config(path: &Path) -> anyhow::Result<scrollfx::PageConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read page config '{}'", path.display()))?;
    let cfg = scrollfx::PageConfig::from_json_str(&s)
        .with_context(|| format!("parse page config '{}'", path.display()))?;
    Ok(cfg)
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    let config = match &args.config {
        Some(p) => read_page_config(p)?,
        None => scrollfx::PageConfig::default(),
    };

    let mut frame_loop = scrollfx::FrameLoop::new();
    let page = scrollfx::Page::mount(config, &mut frame_loop).context("mount page")?;
    let to = args.to.unwrap_or_else(|| page.max_scroll());
    let n = args.frames.max(1);

    for i in 0..n {
        let t = if n == 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
        let scroll_y = args.from + (to - args.from) * t;
        let time_s = i as f64 / args.fps;
        let report = frame_loop.advance(&page.host_frame(time_s, scroll_y));

        let mut layers = serde_json::Map::new();
        for out in &report.outputs {
            let v = match &out.output {
                scrollfx::FrameOutput::Style { channels, color } => serde_json::json!({
                    "channels": channels,
                    "color": color.map(|c| c.to_straight_rgba()),
                }),
                scrollfx::FrameOutput::Field(scene) => serde_json::json!({
                    "discs": scene.discs.len(),
                    "lines": scene.lines.len(),
                }),
                scrollfx::FrameOutput::Empty => serde_json::Value::Null,
            };
            layers.insert(out.name.clone(), v);
        }
        let line = serde_json::json!({
            "frame": report.frame,
            "time_s": time_s,
            "scroll_y": scroll_y,
            "layers": layers,
        });
        println!("{line}");
    }

    page.unmount(&mut frame_loop);
    Ok(())
}

fn cmd_field(args: FieldArgs) -> anyhow::Result<()> {
    let mut config = scrollfx::FieldConfig::default();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let viewport = scrollfx::Viewport::new(f64::from(args.width), f64::from(args.height));
    let mut field = scrollfx::ParticleField::new(config, viewport)?;
    for _ in 0..args.ticks {
        field.step();
    }
    let scene = field.scene(args.theme.theme());

    let opts = scrollfx::CpuRendererOpts::default().with_clear_rgba(Some(args.theme.background()));
    let mut renderer = scrollfx::CpuRenderer::new(opts);
    let frame = renderer.render_scene(&scene)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    scrollfx::write_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
