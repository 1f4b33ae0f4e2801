use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use noisemap_generator::{ascii, config, export, noise_field, GenerationParameters, Offset2};

#[derive(Parser, Debug)]
#[command(name = "noisemap")]
#[command(about = "Generate seedable multi-octave noise heightmaps")]
struct Args {
    /// JSON parameter file to start from (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the map in cells
    #[arg(short = 'W', long, allow_negative_numbers = true)]
    width: Option<i32>,

    /// Height of the map in cells
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    height: Option<i32>,

    /// Seed for octave offsets
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Noise scale (larger = broader features)
    #[arg(long, allow_negative_numbers = true)]
    scale: Option<f64>,

    /// Number of octaves
    #[arg(short, long, allow_negative_numbers = true)]
    octaves: Option<i32>,

    /// Amplitude decay per octave (0.0-1.0)
    #[arg(short, long, allow_negative_numbers = true)]
    persistence: Option<f64>,

    /// Frequency multiplier per octave
    #[arg(short, long, allow_negative_numbers = true)]
    lacunarity: Option<f64>,

    /// Horizontal offset applied to every octave
    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<f64>,

    /// Vertical offset applied to every octave
    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<f64>,

    /// Reject out-of-range parameters instead of clamping them
    #[arg(long)]
    strict: bool,

    /// Use the legacy single-octave map (only width, height and scale apply)
    #[arg(long, conflicts_with = "strict")]
    simple: bool,

    /// Write the map as a grayscale PNG
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print an ASCII preview to stdout
    #[arg(long)]
    ascii: bool,

    /// Maximum preview width in characters
    #[arg(long, default_value = "80")]
    ascii_width: usize,

    /// Print a value histogram to stdout
    #[arg(long)]
    histogram: bool,

    /// Save the parameters used to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl Args {
    /// Start from the config file (or defaults) and apply any explicit flags.
    fn parameters(&self) -> anyhow::Result<GenerationParameters> {
        let mut params = match &self.config {
            Some(path) => config::load_parameters(path)?,
            None => GenerationParameters::default(),
        };

        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(octaves) = self.octaves {
            params.octave_count = octaves;
        }
        if let Some(persistence) = self.persistence {
            params.persistence = persistence;
        }
        if let Some(lacunarity) = self.lacunarity {
            params.lacunarity = lacunarity;
        }
        params.offset = Offset2::new(
            self.offset_x.unwrap_or(params.offset.x),
            self.offset_y.unwrap_or(params.offset.y),
        );

        Ok(params)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = args.parameters()?;

    tracing::info!(
        "Generating {}x{} map (seed {}, scale {}, {} octaves, persistence {}, lacunarity {})",
        params.width,
        params.height,
        params.seed,
        params.scale,
        params.octave_count,
        params.persistence,
        params.lacunarity
    );

    let map = if args.simple {
        noise_field::generate_simple(params.width, params.height, params.scale)
    } else if args.strict {
        noise_field::try_generate(&params).context("rejected generation parameters")?
    } else {
        noise_field::generate(&params)
    };

    if let Some((min_v, max_v)) = map.min_max() {
        tracing::info!(
            "Map range: {:.4} to {:.4} (mean {:.4}) over {} cells",
            min_v,
            max_v,
            map.mean(),
            map.len()
        );
    }

    if let Some(path) = &args.output {
        export::export_grayscale(&map, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }

    if let Some(path) = &args.save_config {
        config::save_parameters(path, &params)?;
        tracing::info!("Saved parameters to {}", path.display());
    }

    if args.ascii {
        print!("{}", ascii::render_height(&map, args.ascii_width));
        print!("{}", ascii::height_legend());
    }

    if args.histogram {
        print!("{}", ascii::height_histogram(&map, 10));
    }

    Ok(())
}
