use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autodraw::models::{parse_region, AppConfig, EffectOverrides, StyleOverrides};
use autodraw::server;
use autodraw::services::{load_png_file, stream_commands, PlanRequest, StrokeService};
use raster_strokes::{
    CancellationToken, EffectKind, EmitOutcome, PipelineContext, Region, StrokeCommand, SurfaceSize,
};

#[derive(Parser)]
#[command(name = "autodraw")]
#[command(about = "AutoDraw - turn raster images into timed stroke commands")]
struct Cli {
    /// YAML configuration file (falls back to AUTODRAW_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plan metrics and commands as JSON
    Json,
    /// One wire frame per line
    Wire,
}

/// Options shared by every command that plans strokes
#[derive(clap::Args)]
struct PlanArgs {
    /// Input PNG file
    input: PathBuf,

    /// Surface width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Target region as fractions: x,y,width,height
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Palette size budget
    #[arg(long)]
    max_colors: Option<usize>,

    #[command(flatten)]
    style: StyleOverrides,
}

/// Options for tracing a generative effect
#[derive(clap::Args)]
struct EffectArgs {
    /// aurora, vortex, firefly or cascade
    kind: EffectKind,

    /// Surface width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Target region as fractions: x,y,width,height
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    #[command(flatten)]
    effect: EffectOverrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Compile an image into stroke commands
    Plan {
        #[command(flatten)]
        args: PlanArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Stream stroke commands with drawing delays; Ctrl-C stops
    Draw {
        #[command(flatten)]
        args: PlanArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pause between strokes in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Trace a generative effect; --live streams it at tempo until Ctrl-C
    Effect {
        #[command(flatten)]
        args: EffectArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Stream wire frames with the tempo's step delay
        #[arg(long)]
        live: bool,
    },
    /// Print the palette an image quantizes to
    Inspect {
        /// Input PNG file
        input: PathBuf,

        /// Palette size budget
        #[arg(long)]
        max_colors: Option<usize>,

        /// Error diffusion strength in percent
        #[arg(long)]
        dither_strength: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("AUTODRAW_CONFIG").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Serve) => run_server(config_path.as_deref()).await,
        Some(Commands::Plan {
            args,
            output,
            format,
        }) => {
            init_cli_logging();
            run_plan_command(config_path.as_deref(), &args, output.as_deref(), format)
        }
        Some(Commands::Draw {
            args,
            output,
            delay_ms,
        }) => {
            init_cli_logging();
            run_draw_command(config_path.as_deref(), &args, output.as_deref(), delay_ms).await
        }
        Some(Commands::Effect {
            args,
            output,
            format,
            live,
        }) => {
            init_cli_logging();
            run_effect_command(config_path.as_deref(), &args, output.as_deref(), format, live).await
        }
        Some(Commands::Inspect {
            input,
            max_colors,
            dither_strength,
        }) => {
            init_cli_logging();
            run_inspect_command(config_path.as_deref(), &input, max_colors, dither_strength)
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

/// Minimal logging for CLI
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autodraw=warn,raster_strokes=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn build_request(service: &StrokeService, args: &PlanArgs) -> PlanRequest {
    let base = service.default_request();
    PlanRequest {
        surface: SurfaceSize::new(
            args.width.unwrap_or(base.surface.width),
            args.height.unwrap_or(base.surface.height),
        ),
        region: args.region,
        style: args.style.apply(&base.style),
        max_colors: args.max_colors.unwrap_or(base.max_colors),
    }
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn std::io::Write>> {
    Ok(match path {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

/// Compile an image and write the plan (no delays)
fn run_plan_command(
    config_path: Option<&Path>,
    args: &PlanArgs,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let service = StrokeService::new(AppConfig::load(config_path));
    let request = build_request(&service, args);
    let png = std::fs::read(&args.input)?;
    let drawing = service.compile(&png, &request)?;

    let mut out = open_output(output)?;
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "source": drawing.source,
                "palette": drawing.palette,
                "metrics": drawing.plan.metrics,
                "commands": drawing.plan.commands,
            });
            serde_json::to_writer_pretty(&mut out, &body)?;
            writeln!(out)?;
        }
        OutputFormat::Wire => {
            let mut surface = raster_strokes::WireSurface::new(&mut out);
            raster_strokes::emit(
                &drawing.plan.commands,
                &mut surface,
                &CancellationToken::new(),
            )?;
        }
    }
    out.flush()?;

    let metrics = &drawing.plan.metrics;
    eprintln!(
        "{} strokes, {} colors, ~{:.1}s at {} ms/stroke",
        metrics.estimated_strokes,
        metrics.palette_count,
        metrics.estimated_duration_ms as f64 / 1000.0,
        raster_strokes::output::MS_PER_STROKE,
    );
    Ok(())
}

/// Stream the plan with per-stroke delays until done or interrupted
async fn run_draw_command(
    config_path: Option<&Path>,
    args: &PlanArgs,
    output: Option<&Path>,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let service = Arc::new(StrokeService::new(AppConfig::load(config_path)));
    let request = build_request(&service, args);
    let delay = Duration::from_millis(delay_ms.unwrap_or(service.config().stroke_delay_ms));
    let png = tokio::fs::read(&args.input).await?;
    let drawing = service.clone().compile_blocking(png, request).await?;

    stream_until_interrupted(&drawing.plan.commands, output, delay).await
}

/// Stream commands with a fixed delay; the first Ctrl-C stops after the
/// current stroke
async fn stream_until_interrupted(
    commands: &[StrokeCommand],
    output: Option<&Path>,
    delay: Duration,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current stroke");
            ctrl_c_token.cancel();
        }
    });

    let outcome = match output {
        Some(path) => {
            let mut file = tokio::fs::File::create(path).await?;
            stream_commands(commands, &mut file, delay, &token).await?
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stream_commands(commands, &mut stdout, delay, &token).await?
        }
    };

    match outcome {
        EmitOutcome::Completed { emitted } => eprintln!("Drawing complete: {emitted} strokes"),
        EmitOutcome::Cancelled { emitted } => {
            eprintln!("Drawing stopped after {emitted} of {} strokes", commands.len())
        }
    }
    Ok(())
}

/// Trace an effect and write it, or stream it at the tempo's pace
async fn run_effect_command(
    config_path: Option<&Path>,
    args: &EffectArgs,
    output: Option<&Path>,
    format: OutputFormat,
    live: bool,
) -> anyhow::Result<()> {
    let service = StrokeService::new(AppConfig::load(config_path));
    let mut request = service.default_effect_request(args.kind);
    request.surface = SurfaceSize::new(
        args.width.unwrap_or(request.surface.width),
        args.height.unwrap_or(request.surface.height),
    );
    request.region = args.region;
    request.options = args.effect.apply(&request.options);
    request.color = args.effect.color_or(request.color)?;
    let effect = service.effect(&request)?;

    eprintln!(
        "{}: {} paths, {} strokes, seed {}, ~{:.1}s",
        effect.kind.label(),
        effect.paths,
        effect.plan.len(),
        effect.seed,
        effect.plan.metrics.estimated_duration_ms as f64 / 1000.0,
    );

    if live {
        let delay = Duration::from_millis(effect.timing.step_delay_ms);
        return stream_until_interrupted(&effect.plan.commands, output, delay).await;
    }

    let mut out = open_output(output)?;
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "effect": {
                    "kind": effect.kind,
                    "seed": effect.seed,
                    "paths": effect.paths,
                    "timing": effect.timing,
                    "area": effect.area,
                },
                "metrics": effect.plan.metrics,
                "commands": effect.plan.commands,
            });
            serde_json::to_writer_pretty(&mut out, &body)?;
            writeln!(out)?;
        }
        OutputFormat::Wire => {
            let mut surface = raster_strokes::WireSurface::new(&mut out);
            raster_strokes::emit(&effect.plan.commands, &mut surface, &CancellationToken::new())?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Print palette entries and their usage
fn run_inspect_command(
    config_path: Option<&Path>,
    input: &Path,
    max_colors: Option<usize>,
    dither_strength: Option<f64>,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path);
    let buffer = load_png_file(input, config.max_dimension)?;
    let strength = dither_strength.unwrap_or(config.style.dither_strength);
    let ctx = PipelineContext::prepare(
        buffer,
        max_colors.unwrap_or(config.max_colors),
        raster_strokes::DitherOptions::from_percent(strength),
    );

    println!(
        "{}x{} pixels, {} assigned, {} colors\n",
        ctx.source().width(),
        ctx.source().height(),
        ctx.assignments().assigned_count(),
        ctx.palette().len()
    );
    for swatch in autodraw::services::palette_report(&ctx) {
        println!(
            "  {:>4}  {}  {:>8} px  {:>6.2}%",
            swatch.index, swatch.hex, swatch.pixels, swatch.coverage
        );
    }
    Ok(())
}

fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();

    println!("AutoDraw v{VERSION}");
    println!("Raster image to stroke command compiler\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR       = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  AUTODRAW_CONFIG = {}",
        config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );

    let config = AppConfig::load(config_path);
    println!("\nConfiguration:");
    println!(
        "  Surface:     {}x{}",
        config.surface.width, config.surface.height
    );
    println!("  Max colors:  {}", config.max_colors);
    println!("  Max size:    {} px", config.max_dimension);
    println!("  Delay:       {} ms/stroke", config.stroke_delay_ms);
    println!(
        "  Style:       {} detail, {} order, dither {}%",
        config.style.detail_mode, config.style.palette_order, config.style.dither_strength
    );

    println!("\nCommands:");
    println!("  autodraw serve              Start the HTTP server");
    println!("  autodraw plan <png>         Compile an image to commands");
    println!("  autodraw draw <png>         Stream commands with delays");
    println!("  autodraw inspect <png>      Show the quantized palette");
    println!("  autodraw effect <kind>      Trace aurora, vortex, firefly or cascade");
}

async fn run_server(config_path: Option<&Path>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autodraw=info,raster_strokes=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = AppConfig::load(config_path);
    tracing::info!(
        width = config.surface.width,
        height = config.surface.height,
        max_colors = config.max_colors,
        "Configuration loaded"
    );

    let app = server::build_router(server::create_app_state(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "AutoDraw server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
