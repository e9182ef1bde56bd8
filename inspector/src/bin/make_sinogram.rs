use anyhow::Context;
use clap::Parser;
use fbpcore::math::Interpolation;
use fbpcore::telemetry::LogObserver;
use fbpcore::{CancelFlag, StageContext, StageObserver};
use inspector::generator::{build_scan, GeneratorConfig, PhantomKind};
use inspector::io::{save_normalized, SinogramSidecar};
use inspector::shutdown::cancel_on_ctrl_c;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about = "Synthesize a sample sinogram for reconstruction")]
struct Args {
    /// Load a generator config from YAML (overrides the flags below)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Test object: shepp-logan, point or offset-square
    #[arg(long, default_value = "shepp-logan")]
    phantom: PhantomKind,
    #[arg(long, default_value_t = 256)]
    size: usize,
    /// Number of projection angles over [0, 180) degrees
    #[arg(long, default_value_t = 180)]
    steps: usize,
    /// Half-width of uniform noise added to the phantom
    #[arg(long, default_value_t = 0.0)]
    noise: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        GeneratorConfig::load(path)?
    } else {
        GeneratorConfig {
            phantom: args.phantom,
            size: args.size,
            steps: args.steps,
            noise: args.noise,
            seed: args.seed,
            interpolation: args.interpolation,
            output_dir: args.output_dir,
        }
    };

    let cancel = CancelFlag::new();
    cancel_on_ctrl_c(cancel.clone());
    let observer: Arc<dyn StageObserver> = Arc::new(LogObserver::new());
    let ctx = StageContext::new(cancel, vec![observer]);

    let scan = build_scan(&config, &ctx)?;

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let phantom_path = config.output_dir.join("phantom.png");
    let sinogram_path = config.output_dir.join("sinog.png");
    let sidecar_path = config.output_dir.join("sinog.json");

    save_normalized(&phantom_path, scan.phantom.view())?;
    save_normalized(&sinogram_path, scan.sinogram.view())?;
    SinogramSidecar {
        angles: scan.angles.clone(),
        rows: scan.sinogram.nrows(),
        cols: scan.sinogram.ncols(),
        source_size: scan.phantom.nrows(),
    }
    .write(&sidecar_path)?;

    println!(
        "Sample sinogram created and saved as '{}'",
        sinogram_path.display()
    );
    println!("Use this with the reconstruct tool");
    Ok(())
}
