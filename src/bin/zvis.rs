use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use zvis::{FrameIndex, FrameRange, JpegDirSink, RenderOpts, Visualization};

/// Render an audio visualisation into numbered JPEG frames.
#[derive(Parser, Debug)]
#[command(name = "zvis", version)]
struct Cli {
    /// Visualisation config file.
    config: PathBuf,

    /// Directory receiving frame000000.jpg, frame000001.jpg, ...
    outdir: PathBuf,

    /// Load layers and render frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for --parallel (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per parallel batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// First frame to render.
    #[arg(long)]
    start: Option<u64>,

    /// Frame to stop before (exclusive).
    #[arg(long)]
    end: Option<u64>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    init_tracing(&cli);
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::ERROR
    } else {
        match cli.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let opts = RenderOpts {
        parallel: cli.parallel,
        threads: cli.threads,
        chunk_size: cli.chunk_size,
    };

    let vis = Visualization::from_path(&cli.config, &opts)
        .with_context(|| format!("load visualisation '{}'", cli.config.display()))?;

    let mut sink = JpegDirSink::new(cli.outdir.clone());
    let stats = if cli.start.is_none() && cli.end.is_none() {
        vis.render_all(&mut sink, &opts)?
    } else {
        let start = cli.start.unwrap_or(0);
        let end = cli.end.unwrap_or_else(|| vis.frame_count());
        let range = FrameRange::new(FrameIndex(start), FrameIndex(end))?;
        vis.render_range(range, &mut sink, &opts)?
    };

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        cli.outdir.display()
    );
    Ok(())
}
