#![deny(unsafe_code)]
//! CLI binary for line integral convolution.
//!
//! Subcommands:
//! - `render <field>`: generate an example vector field, run LIC over it, write a PNG
//! - `list`: print available fields, colormaps, backends, boundaries and kernels

mod error;

use clap::{ArgAction, Args, Parser, Subcommand};
use error::CliError;
use lic_core::{Backend, Boundary, KernelShape, LicConfig, LicParams, NoiseSource};
use lic_engine::compute_lic_with_postprocessing;
use lic_fields::{Colormap, FieldKind};
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lic", about = "Line integral convolution renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an example vector field and write a PNG.
    Render(RenderArgs),
    /// List available fields, colormaps and option values.
    List,
}

#[derive(Args)]
struct RenderArgs {
    /// Field name (e.g. "swirls").
    field: String,

    /// Grid size in cells (square).
    #[arg(short, long, default_value_t = 256)]
    size: usize,

    /// Streamline length per direction in cells [default: the field's suggestion].
    #[arg(short = 'l', long)]
    streamlength: Option<f64>,

    /// Integration step in cells.
    #[arg(long)]
    step_size: Option<f64>,

    /// Chained LIC passes per repetition.
    #[arg(short, long)]
    passes: Option<usize>,

    /// Independent repetitions to average.
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// Enable the high-pass filter with this Gaussian sigma.
    #[arg(long)]
    filter_sigma: Option<f64>,

    /// Histogram-equalize the output.
    #[arg(long)]
    equalize: bool,

    /// Execution backend (serial, parallel).
    #[arg(short, long)]
    backend: Option<String>,

    /// Row bands for the parallel backend.
    #[arg(long)]
    workers: Option<usize>,

    /// Boundary policy (closed, periodic).
    #[arg(long)]
    boundary: Option<String>,

    /// Convolution kernel (box, hann).
    #[arg(short, long)]
    kernel: Option<String>,

    /// PRNG seed for the noise texture and random fields.
    #[arg(long)]
    seed: Option<u64>,

    /// Colormap name (gray, bone).
    #[arg(short, long, default_value = "gray")]
    colormap: String,

    /// Output file path.
    #[arg(short, long, default_value = "lic.png")]
    output: PathBuf,

    /// LIC options as a JSON object; flags override its keys.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Field generator options as a JSON object (num_swirls, correlation_length).
    #[arg(long, default_value = "{}")]
    field_params: String,
}

impl RenderArgs {
    /// `base` with every flag that was given applied on top.
    fn apply_to(&self, base: LicParams) -> Result<LicParams, CliError> {
        let mut p = base;
        if let Some(l) = self.streamlength {
            p.streamlength = Some(l);
        }
        if let Some(h) = self.step_size {
            p.step_size = h;
        }
        if let Some(n) = self.passes {
            p.num_passes = n;
        }
        if let Some(n) = self.repetitions {
            p.num_repetitions = n;
        }
        if let Some(sigma) = self.filter_sigma {
            p.use_filter = true;
            p.filter_sigma = sigma;
        }
        if self.equalize {
            p.use_equalize = true;
        }
        if let Some(name) = &self.backend {
            p.backend = Backend::from_name(name)?;
        }
        if self.workers.is_some() {
            p.num_workers = self.workers;
        }
        if let Some(name) = &self.boundary {
            p.boundary = Boundary::from_name(name)?;
        }
        if let Some(name) = &self.kernel {
            p.kernel = KernelShape::from_name(name)?;
        }
        if let Some(seed) = self.seed {
            p.seed = seed;
        }
        Ok(p)
    }
}

fn parse_json(raw: &str, flag: &str) -> Result<Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Input(format!("invalid {flag} JSON: {e}")))
}

fn render(args: &RenderArgs, json: bool) -> Result<(), CliError> {
    let colormap = Colormap::from_name(&args.colormap).ok_or_else(|| {
        CliError::Input(format!(
            "unknown colormap: {} (expected one of {})",
            args.colormap,
            Colormap::list_names().join(", ")
        ))
    })?;
    let lic_json = parse_json(&args.params, "--params")?;
    let field_json = parse_json(&args.field_params, "--field-params")?;
    let mut params = args.apply_to(LicParams::from_json(&lic_json)?)?;

    let generated =
        FieldKind::from_name(&args.field)?.generate(args.size, params.seed, &field_json)?;
    if params.streamlength.is_none() {
        params.streamlength = Some(generated.streamlength);
    }
    let config = LicConfig::resolve(&params, args.size, args.size)?;

    let start = Instant::now();
    let image = compute_lic_with_postprocessing(
        &generated.vfield,
        &NoiseSource::Uniform { seed: params.seed },
        &params,
    )?;
    let elapsed = start.elapsed();
    info!(
        field = generated.name,
        elapsed_ms = elapsed.as_millis() as u64,
        "lic done"
    );

    lic_fields::snapshot::write_png(&image, colormap, &args.output)?;

    if json {
        let info = serde_json::json!({
            "field": generated.name,
            "size": args.size,
            "config": serde_json::to_value(&config)?,
            "colormap": args.colormap,
            "elapsed_ms": elapsed.as_millis() as u64,
            "output": args.output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({n}x{n}, streamlength {}, passes {}, repetitions {}, {}) in {:.2?} -> {}",
            generated.name,
            config.streamlength(),
            config.num_passes(),
            config.num_repetitions(),
            config.backend().name(),
            elapsed,
            args.output.display(),
            n = args.size,
        );
    }
    Ok(())
}

fn list(json: bool) -> Result<(), CliError> {
    let fields = FieldKind::list_fields();
    let colormaps = Colormap::list_names();
    let backends = [Backend::Serial.name(), Backend::Parallel.name()];
    let boundaries = [Boundary::Closed.name(), Boundary::Periodic.name()];
    let kernels = [KernelShape::Box.name(), KernelShape::Hann.name()];
    if json {
        let info = serde_json::json!({
            "fields": fields,
            "colormaps": colormaps,
            "backends": backends,
            "boundaries": boundaries,
            "kernels": kernels,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Fields:");
        for name in &fields {
            println!("  {name}");
        }
        println!("Colormaps:  {}", colormaps.join(", "));
        println!("Backends:   {}", backends.join(", "));
        println!("Boundaries: {}", boundaries.join(", "));
        println!("Kernels:    {}", kernels.join(", "));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::List => list(cli.json),
        Command::Render(args) => render(args, cli.json),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Render(args) => args,
            Command::List => panic!("expected render"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_json_params() {
        let args = render_args(&[
            "lic", "render", "vortex", "--passes", "3", "--kernel", "hann", "--filter-sigma", "2",
        ]);
        let base = LicParams::from_json(&serde_json::json!({
            "num_passes": 5,
            "num_repetitions": 4,
            "boundary": "periodic",
        }))
        .unwrap();
        let p = args.apply_to(base).unwrap();
        assert_eq!(p.num_passes, 3);
        assert_eq!(p.num_repetitions, 4);
        assert_eq!(p.kernel, KernelShape::Hann);
        assert_eq!(p.boundary, Boundary::Periodic);
        assert!(p.use_filter);
        assert_eq!(p.filter_sigma, 2.0);
        assert!(p.streamlength.is_none());
    }

    #[test]
    fn unknown_backend_is_a_lic_error() {
        let args = render_args(&["lic", "render", "swirls", "--backend", "gpu"]);
        let err = args.apply_to(LicParams::default()).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn verbosity_counts_and_json_is_global() {
        let cli = Cli::try_parse_from(["lic", "-vv", "list", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let err = parse_json("{nope", "--params").unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn unknown_colormap_fails_before_rendering() {
        let args = render_args(&["lic", "render", "swirls", "--colormap", "jet"]);
        let err = render(&args, false).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }
}
