use clap::Parser;
use fbpcore::math::{Interpolation, Taper};
use inspector::shutdown::cancel_on_ctrl_c;
use inspector::workflow::{Runner, WorkflowConfig};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Filtered back-projection of a sinogram image")]
struct Args {
    /// Load a workflow config from YAML (overrides the flags below)
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Sinogram image, one projection angle per row
    #[arg(long, default_value = "sinog.png")]
    input: PathBuf,
    /// Directory receiving the three reconstructions
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Apodization taper: hann or hamming
    #[arg(long, default_value = "hann")]
    taper: Taper,
    /// Rotation resampling: bilinear or nearest
    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,
    /// Dump every intermediate stage as a PNG into this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
    /// The input stores projection angles along columns instead of rows
    #[arg(long, default_value_t = false)]
    angles_along_columns: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.input,
            args.output_dir,
            args.taper,
            args.interpolation,
            args.snapshot_dir,
            args.angles_along_columns,
        )
    };

    let runner = Runner::new(config);
    cancel_on_ctrl_c(runner.cancel_flag());
    let result = runner.execute()?;

    info!(
        "sinogram {:?} -> images {:?}, {} snapshots",
        result.sinogram_dim,
        result.image_dim,
        result.snapshots.len()
    );
    println!("Reconstruction complete. Images saved:");
    for path in &result.outputs {
        println!("  {}", path.display());
    }
    Ok(())
}
