use anyhow::Context;
use fbpcore::math::Interpolation;
use fbpcore::processing::ForwardProjector;
use fbpcore::{AngleSequence, Image, Sinogram, StageContext};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Test objects the generator can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhantomKind {
    SheppLogan,
    Point,
    OffsetSquare,
}

impl std::str::FromStr for PhantomKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "shepp-logan" => Ok(PhantomKind::SheppLogan),
            "point" => Ok(PhantomKind::Point),
            "offset-square" => Ok(PhantomKind::OffsetSquare),
            other => anyhow::bail!("unknown phantom '{}'", other),
        }
    }
}

/// Configuration for generating a synthetic sinogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub phantom: PhantomKind,
    pub size: usize,
    pub steps: usize,
    pub noise: f64,
    pub seed: u64,
    pub interpolation: Interpolation,
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            phantom: PhantomKind::SheppLogan,
            size: 256,
            steps: 180,
            noise: 0.0,
            seed: 0,
            interpolation: Interpolation::Bilinear,
            output_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading generator config {}", path_ref.display()))?;
        let config: GeneratorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing generator config {}", path_ref.display()))?;
        Ok(config)
    }

    fn normalized_size(&self) -> usize {
        self.size.max(2)
    }
}

/// Ellipse table of the modified Shepp-Logan head phantom:
/// intensity, semi-axes (a, b), center (x0, y0), tilt in degrees.
const SHEPP_LOGAN: [[f64; 6]; 10] = [
    [1.0, 0.69, 0.92, 0.0, 0.0, 0.0],
    [-0.8, 0.6624, 0.874, 0.0, -0.0184, 0.0],
    [-0.2, 0.11, 0.31, 0.22, 0.0, -18.0],
    [-0.2, 0.16, 0.41, -0.22, 0.0, 18.0],
    [0.1, 0.21, 0.25, 0.0, 0.35, 0.0],
    [0.1, 0.046, 0.046, 0.0, 0.1, 0.0],
    [0.1, 0.046, 0.046, 0.0, -0.1, 0.0],
    [0.1, 0.046, 0.023, -0.08, -0.605, 0.0],
    [0.1, 0.023, 0.023, 0.0, -0.606, 0.0],
    [0.1, 0.023, 0.046, 0.06, -0.605, 0.0],
];

/// Modified Shepp-Logan phantom sampled on a `size x size` grid spanning [-1, 1]².
pub fn shepp_logan(size: usize) -> Image {
    let scale = 2.0 / size as f64;
    Image::from_shape_fn((size, size), |(row, col)| {
        let x = (col as f64 + 0.5) * scale - 1.0;
        let y = 1.0 - (row as f64 + 0.5) * scale;
        SHEPP_LOGAN
            .iter()
            .filter(|e| {
                let [_, a, b, x0, y0, tilt] = **e;
                let (sin, cos) = tilt.to_radians().sin_cos();
                let (dx, dy) = (x - x0, y - y0);
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                (u / a).powi(2) + (v / b).powi(2) <= 1.0
            })
            .map(|e| e[0])
            .sum()
    })
}

pub fn build_phantom(config: &GeneratorConfig) -> Image {
    let size = config.normalized_size();
    let mut phantom = match config.phantom {
        PhantomKind::SheppLogan => shepp_logan(size),
        PhantomKind::Point => {
            let mut image = Image::zeros((size, size));
            image[[size / 2, size / 2]] = 1.0;
            image
        }
        PhantomKind::OffsetSquare => {
            let mut image = Image::zeros((size, size));
            let edge = (size / 6).max(1);
            let top = size / 6;
            let left = size / 2 + size / 12;
            image
                .slice_mut(ndarray::s![top..top + edge, left..left + edge])
                .fill(1.0);
            image
        }
    };

    if config.noise > 0.0 {
        let mut rng = StdRng::seed_from_u64(config.seed);
        phantom.mapv_inplace(|v| v + rng.gen_range(-config.noise..config.noise));
    }
    phantom
}

/// Phantom together with its sinogram and acquisition angles.
pub struct GeneratedScan {
    pub phantom: Image,
    pub sinogram: Sinogram,
    pub angles: AngleSequence,
}

pub fn build_scan(config: &GeneratorConfig, ctx: &StageContext) -> anyhow::Result<GeneratedScan> {
    let phantom = build_phantom(config);
    let projector = ForwardProjector::new(config.steps, config.interpolation);
    let sinogram = projector
        .project(phantom.view(), ctx)
        .context("projecting phantom")?;
    Ok(GeneratedScan {
        phantom,
        sinogram,
        angles: projector.angles(),
    })
}
