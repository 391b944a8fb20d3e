use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use spray_card::core::level_from_verbosity;
use spray_card::{
    process_card, LumaWeights, RemainderPolicy, RenderBackground, SprayCardConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "spray-card",
    version,
    about = "Measure spray deposit coverage per vertical section of a scanned spray card"
)]
struct Cli {
    /// Spray card image (PNG, JPEG, ...). Overrides `image_path` from --config.
    image: Option<PathBuf>,

    /// Number of vertical sections.
    #[arg(short, long)]
    sections: Option<usize>,

    /// Output file name; a bare name is written next to the input.
    #[arg(short, long)]
    output: Option<String>,

    /// JSON config file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a JSON report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// What to draw the annotations on.
    #[arg(long, value_enum)]
    background: Option<BackgroundArg>,

    /// Luma formula for RGB input.
    #[arg(long, value_enum)]
    luma: Option<LumaArg>,

    /// Where leftover columns go when the width is not divisible.
    #[arg(long, value_enum)]
    remainder: Option<RemainderArg>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log through a tracing subscriber (RUST_LOG filter) with JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    trace_json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackgroundArg {
    Original,
    Mask,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LumaArg {
    Rec601,
    Rec709,
    Average,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RemainderArg {
    Last,
    Distribute,
}

impl From<BackgroundArg> for RenderBackground {
    fn from(v: BackgroundArg) -> Self {
        match v {
            BackgroundArg::Original => RenderBackground::Original,
            BackgroundArg::Mask => RenderBackground::Mask,
        }
    }
}

impl From<LumaArg> for LumaWeights {
    fn from(v: LumaArg) -> Self {
        match v {
            LumaArg::Rec601 => LumaWeights::Rec601,
            LumaArg::Rec709 => LumaWeights::Rec709,
            LumaArg::Average => LumaWeights::Average,
        }
    }
}

impl From<RemainderArg> for RemainderPolicy {
    fn from(v: RemainderArg) -> Self {
        match v {
            RemainderArg::Last => RemainderPolicy::LastSection,
            RemainderArg::Distribute => RemainderPolicy::Distribute,
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    if cli.trace_json {
        spray_card::core::init_tracing(true, level_from_verbosity(cli.verbose));
    } else {
        let _ = spray_card::core::init_with_level(level_from_verbosity(cli.verbose));
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    let _ = spray_card::core::init_with_level(level_from_verbosity(cli.verbose));
}

fn build_config(cli: &Cli) -> Result<(PathBuf, SprayCardConfig), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SprayCardConfig::load_json(path)?,
        None => SprayCardConfig::default(),
    };
    if let Some(sections) = cli.sections {
        config.analysis.sections = sections;
    }
    if let Some(luma) = cli.luma {
        config.analysis.luma = luma.into();
    }
    if let Some(remainder) = cli.remainder {
        config.analysis.remainder = remainder.into();
    }
    if let Some(background) = cli.background {
        config.render.background = background.into();
    }
    if let Some(output) = &cli.output {
        config.output_filename = Some(output.clone());
    }
    if let Some(report) = &cli.report {
        config.report_path = Some(report.to_string_lossy().into_owned());
    }

    let image = cli
        .image
        .clone()
        .or_else(|| config.image_path.as_ref().map(PathBuf::from))
        .ok_or("no input image given (pass IMAGE or set image_path in --config)")?;
    Ok((image, config))
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (image, config) = build_config(cli)?;
    let outcome = process_card(&image, &config)?;

    for s in &outcome.analysis.sections {
        println!("Sec {}: {:.1}%", s.index + 1, s.coverage_pct);
    }
    let summary = &outcome.analysis.summary;
    println!(
        "overall {:.1}% (mean {:.1}%, cv {:.3}, threshold {})",
        summary.overall_pct,
        summary.mean_pct,
        summary.coefficient_of_variation,
        outcome.analysis.threshold.value
    );
    println!("wrote annotated image to {}", outcome.output_path.display());
    if let Some(report) = &outcome.report_path {
        println!("wrote report JSON to {}", report.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("spray-card: {err}");
            ExitCode::FAILURE
        }
    }
}
