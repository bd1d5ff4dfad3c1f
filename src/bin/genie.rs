use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use genie_motion::{
    BackendKind, BitmapElement, ClipPreview, ControllerConfig, CubicBezier, Direction, FrameRGBA,
    GenieMetrics, GenieTransform, GridMesh, Rect, WarpUniforms, build_genie_path_with,
    build_play_options, calculate_genie_metrics, capture_element_to_image, create_target,
    path_clip,
};

#[derive(Parser, Debug)]
#[command(name = "genie", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the genie metrics for an origin/content pair as JSON.
    Metrics(RectArgs),
    /// Print the `clip-path` value at one progress value.
    Path(PathArgs),
    /// Render a transition to a PNG frame sequence.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RectArgs {
    /// Origin rect as `left,top,width,height` (CSS px).
    #[arg(long)]
    origin: RectArg,

    /// Content rect as `left,top,width,height` (CSS px).
    #[arg(long)]
    content: RectArg,
}

#[derive(Parser, Debug)]
struct PathArgs {
    #[command(flatten)]
    rects: RectArgs,

    /// Progress in `[0, 1]`.
    #[arg(long, default_value_t = 0.5)]
    t: f64,

    /// Optional controller config JSON (partial configs merge over defaults).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    rects: RectArgs,

    /// Snapshot of the content (any format `image` decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNN.png`.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames, evenly spaced over the timeline.
    #[arg(long, default_value_t = 12)]
    frames: u32,

    #[arg(long, value_enum, default_value_t = DirectionChoice::Open)]
    direction: DirectionChoice,

    #[arg(long, value_enum, default_value_t = StrategyChoice::Mesh)]
    strategy: StrategyChoice,

    /// Warp target used by the mesh strategy.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Device pixels per CSS pixel of the snapshot.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Optional controller config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
struct RectArg(Rect);

impl FromStr for RectArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid number in '{s}': {e}"))?;
        let [left, top, width, height] = parts[..] else {
            return Err(format!("expected left,top,width,height, got '{s}'"));
        };
        Ok(Self(Rect::new(left, top, width, height)))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Open,
    Close,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyChoice {
    Mesh,
    Clip,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
    Gpu,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Metrics(args) => cmd_metrics(args),
        Command::Path(args) => cmd_path(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    let Some(path) = path else {
        return Ok(ControllerConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg: ControllerConfig =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse config JSON")?;
    cfg.validate()?;
    Ok(cfg)
}

fn metrics_of(rects: &RectArgs) -> GenieMetrics {
    calculate_genie_metrics(rects.origin.0, rects.content.0)
}

fn cmd_metrics(args: RectArgs) -> anyhow::Result<()> {
    let metrics = metrics_of(&args);
    let json = serde_json::to_string_pretty(&metrics).with_context(|| "serialize metrics")?;
    println!("{json}");
    Ok(())
}

fn cmd_path(args: PathArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let metrics = metrics_of(&args.rects);
    println!("{}", build_genie_path_with(&cfg.path, &metrics, args.t));
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.frames > 0, "--frames must be at least 1");
    let cfg = read_config(args.config.as_deref())?;
    let metrics = metrics_of(&args.rects);
    let direction = match args.direction {
        DirectionChoice::Open => Direction::Open,
        DirectionChoice::Close => Direction::Close,
    };

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read snapshot '{}'", args.in_path.display()))?;
    let content = args.rects.content.0;
    let mut element = BitmapElement::decode(&bytes, args.pixel_ratio)?;
    element.css_width = content.width;
    element.css_height = content.height;
    let image = capture_element_to_image(&element, args.pixel_ratio)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let timelines = (0..args.frames).map(|i| {
        if args.frames == 1 {
            1.0
        } else {
            f64::from(i) / f64::from(args.frames - 1)
        }
    });

    match args.strategy {
        StrategyChoice::Mesh => {
            let kind = match args.backend {
                BackendChoice::Cpu => BackendKind::Cpu,
                BackendChoice::Gpu => BackendKind::Gpu,
            };
            let options =
                build_play_options(&metrics, content, direction, &cfg.gl, image.pixel_ratio);
            let mut target = create_target(kind, options.size)?;
            let mesh = GridMesh::new(options.cols, options.rows)?;
            target.prepare(&mesh, &image, &WarpUniforms::from_options(&options))?;

            let timing = CubicBezier::from_points(options.easing);
            for (i, timeline) in timelines.enumerate() {
                let progress = direction.progress(timing.solve(timeline));
                target.draw(progress as f32)?;
                write_png(&args.out, i, &target.read_pixels()?)?;
            }
            target.release();
        }
        StrategyChoice::Clip => {
            let mut preview = ClipPreview::new(&image)?;
            for (i, timeline) in timelines.enumerate() {
                let p = direction.progress(cfg.css_ease.apply(timeline));
                let clip = path_clip(&cfg.path, &metrics, p);
                let transform = GenieTransform::at(&metrics, p, cfg.max_skew_deg);
                let frame = preview.render(&metrics, &clip, transform, p)?;
                write_png(&args.out, i, &frame)?;
            }
        }
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out.display());
    Ok(())
}

fn write_png(dir: &Path, index: usize, frame: &FrameRGBA) -> anyhow::Result<()> {
    let path = dir.join(format!("frame_{index:03}.png"));
    image::save_buffer_with_format(
        &path,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
