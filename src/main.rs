use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use shape_perceptron::{
    generate_samples, load_layer_bin, save_layer_bin, ColorMap, ConsoleObserver, OutputLayout,
    PerceptronConfig, PpmEncoder, TrainingDriver,
};

/// Trains a single-layer perceptron to tell rectangles from circles.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON config file; missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root of the output tree.
    #[arg(long, global = true, default_value = "samples")]
    output: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate, train until stable or out of passes, evaluate again.
    Train {
        /// Start from a binary weight dump instead of zeros.
        #[arg(long)]
        weights: Option<PathBuf>,
        /// Write the run summary as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Skip the per-adjustment weight pictures.
        #[arg(long)]
        no_snapshots: bool,
    },
    /// Write rectangle and circle samples as .bin and .ppm files.
    Samples {
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Render a binary layer dump as a PPM (or PNG, by extension).
    Render {
        source: PathBuf,
        destination: PathBuf,
        #[arg(long, default_value = "diverging")]
        color_map: ColorMap,
    },
    /// Print the effective configuration as JSON.
    ShowConfig,
}

/// Per-field overrides; they win over the config file.
#[derive(Args, Debug)]
struct Overrides {
    #[arg(long, global = true)]
    width: Option<usize>,
    #[arg(long, global = true)]
    height: Option<usize>,
    #[arg(long, global = true)]
    bias: Option<f32>,
    #[arg(long, global = true)]
    samples_per_pass: Option<usize>,
    #[arg(long, global = true)]
    max_train_passes: Option<usize>,
    #[arg(long, global = true)]
    check_seed: Option<u64>,
    #[arg(long, global = true)]
    train_seed: Option<u64>,
    #[arg(long, global = true)]
    border_offset: Option<usize>,
    #[arg(long, global = true)]
    ppm_scale: Option<u32>,
    #[arg(long, global = true)]
    ppm_range: Option<f32>,
}

impl Overrides {
    fn apply(&self, config: &mut PerceptronConfig) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { config.$field = v; })*
            };
        }
        set!(
            width,
            height,
            bias,
            samples_per_pass,
            max_train_passes,
            check_seed,
            train_seed,
            border_offset,
            ppm_scale,
            ppm_range
        );
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PerceptronConfig> {
    let mut config = match &cli.config {
        Some(path) => PerceptronConfig::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PerceptronConfig::default(),
    };
    cli.overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shape_perceptron=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    let layout = OutputLayout::new(&cli.output);

    match &cli.command {
        Command::Train { weights, report, no_snapshots } => {
            if *no_snapshots {
                config.save_weight_snapshots = false;
            }
            train(config, &layout, weights.as_deref(), report.as_deref())
        }
        Command::Samples { count, seed } => {
            layout.create_dirs()?;
            let written = generate_samples(&config, &layout, *count, *seed)?;
            info!(written, "done");
            Ok(())
        }
        Command::Render { source, destination, color_map } => {
            let layer = load_layer_bin(source, config.width, config.height)?;
            let mut encoder = PpmEncoder::new(*color_map, config.ppm_scale, config.ppm_range);
            match destination.extension().and_then(|e| e.to_str()) {
                Some("png") => encoder.save_png(&layer, destination)?,
                _ => encoder.save_ppm(&layer, destination)?,
            }
            Ok(())
        }
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn train(
    config: PerceptronConfig,
    layout: &OutputLayout,
    weights: Option<&Path>,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    layout.create_dirs()?;

    let mut driver = match weights {
        Some(path) => {
            let layer = load_layer_bin(path, config.width, config.height)?;
            info!(path = %path.display(), "resuming from saved weights");
            TrainingDriver::with_weights(config.clone(), layer)?
        }
        None => TrainingDriver::new(config.clone())?,
    };

    let mut observer = if config.save_weight_snapshots {
        ConsoleObserver::with_snapshots(
            layout.clone(),
            PpmEncoder::new(ColorMap::Diverging, config.ppm_scale, config.ppm_range),
        )
    } else {
        ConsoleObserver::new()
    };

    let report = driver.run(&mut observer)?;

    let checkpoint = layout.weights_checkpoint_path();
    save_layer_bin(driver.weights(), &checkpoint)?;
    info!(path = %checkpoint.display(), "weights saved");

    if let Some(path) = report_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating report {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report)?;
    }
    Ok(())
}
