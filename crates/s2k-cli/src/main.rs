use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use s2k_deck::Model;
use s2k_io::{
    BdfOptions, ConversionReport, IoError, S2kToBdfConverter, expand_id_ranges, format_id_list,
    write_report,
};
use s2k_model::ModelSummary;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "s2k-cli", version)]
#[command(about = "Convert S2K structural models to Nastran bulk data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an S2K file to a Nastran bulk data file
    Convert {
        /// Source .s2k file
        input: PathBuf,

        /// Destination file (defaults to the input with a .dat extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON status report here, on success and on failure
        #[arg(long)]
        report: Option<PathBuf>,

        /// Digits after the decimal point in GRID coordinates
        #[arg(long, default_value_t = 6)]
        precision: usize,

        /// Element ids per line in SET blocks
        #[arg(long, default_value_t = 10)]
        ids_per_line: usize,
    },

    /// Print record counts and reference checks for an S2K file
    Analyze {
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Expand ids and ranges such as `692-697 805` to one id per line
    ExpandIds {
        #[arg(required = true)]
        ranges: Vec<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("dat")
}

fn convert(
    input: &Path,
    output: &Path,
    report: Option<&Path>,
    options: BdfOptions,
) -> Result<(), IoError> {
    let result = S2kToBdfConverter::with_options(options).convert_file(input, output);

    if let Some(report_path) = report {
        let entry = match &result {
            Ok(stats) => ConversionReport::success(input, output, *stats),
            Err(err) => ConversionReport::failed(input, output, err),
        };
        write_report(report_path, &entry)?;
    }

    let stats = result?;
    println!("output: {}", output.display());
    println!("grid_points: {}", stats.grid_points);
    println!("bars: {}", stats.bars);
    println!("triangles: {}", stats.triangles);
    println!("quads: {}", stats.quads);
    println!("property_sections: {}", stats.property_sections);
    println!("element_sets: {}", stats.element_sets);
    Ok(())
}

fn print_summary(summary: &ModelSummary) {
    println!("joint_records: {}", summary.joint_records);
    println!("grid_points: {}", summary.grid_points);
    println!("duplicate_joints: {}", summary.duplicate_joints);
    println!("frames: {}", summary.frames);
    println!("frame_section_assignments: {}", summary.frame_section_assignments);
    println!("unassigned_frames: {}", summary.unassigned_frames);
    println!("areas: {}", summary.areas);
    println!("triangles: {}", summary.triangles);
    println!("quads: {}", summary.quads);
    println!("area_section_assignments: {}", summary.area_section_assignments);
    println!("unassigned_areas: {}", summary.unassigned_areas);
    println!("property_sections: {}", summary.property_sections);
    println!("element_sets: {}", summary.element_sets);
    if !summary.unreferenced_joints.is_empty() {
        println!(
            "unreferenced_joints: {}",
            summary.unreferenced_joints.join(", ")
        );
    }
    if !summary.undefined_joint_references.is_empty() {
        println!(
            "undefined_joint_references: {}",
            summary.undefined_joint_references.join(", ")
        );
    }
}

/// Prints the summary and returns whether every element reference resolves.
fn analyze(input: &Path, json: bool) -> Result<bool, IoError> {
    let model = Model::parse_file(input)?;
    let summary = ModelSummary::from_model(&model);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    if !summary.is_convertible() {
        tracing::warn!(
            input = %input.display(),
            undefined = summary.undefined_joint_references.len(),
            "model references undefined joints"
        );
    }
    Ok(summary.is_convertible())
}

fn expand_ids(ranges: &[String]) -> Result<(), IoError> {
    let ids = expand_id_ranges(&ranges.join(" "))?;
    print!("{}", format_id_list(&ids));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match &cli.command {
        Commands::Convert {
            input,
            output,
            report,
            precision,
            ids_per_line,
        } => {
            let output = output.clone().unwrap_or_else(|| default_output_path(input));
            let options = BdfOptions {
                coordinate_precision: *precision,
                ids_per_line: *ids_per_line,
            };
            convert(input, &output, report.as_deref(), options).map(|()| true)
        }
        Commands::Analyze { input, json } => analyze(input, *json),
        Commands::ExpandIds { ranges } => expand_ids(ranges).map(|()| true),
    };

    match result {
        Ok(true) => {
            tracing::info!("command finished");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_defaults() {
        let cli = Cli::try_parse_from(["s2k-cli", "convert", "model.s2k"]).expect("parse args");
        match cli.command {
            Commands::Convert {
                input,
                output,
                report,
                precision,
                ids_per_line,
            } => {
                assert_eq!(default_output_path(&input), PathBuf::from("model.dat"));
                assert!(output.is_none());
                assert!(report.is_none());
                assert_eq!(
                    BdfOptions {
                        coordinate_precision: precision,
                        ids_per_line,
                    },
                    BdfOptions::default()
                );
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn expand_ids_requires_a_range() {
        assert!(Cli::try_parse_from(["s2k-cli", "expand-ids"]).is_err());
    }

    #[test]
    fn analyze_reports_unresolved_references() {
        let dir = tempfile::tempdir().expect("create temp directory");
        let input = dir.path().join("dangling.s2k");
        std::fs::write(
            &input,
            "Joint=1 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=0 Z=0\n\
             Frame=1 JointI=1 JointJ=9 IsCurved=No Length=1 CentroidX=0 CentroidY=0 CentroidZ=0\n",
        )
        .expect("write input");
        assert!(!analyze(&input, true).expect("parses"));

        let valid = dir.path().join("single.s2k");
        std::fs::write(
            &valid,
            "Joint=1 CoordSys=GLOBAL CoordType=Cartesian XorR=0 Y=0 Z=0\n",
        )
        .expect("write input");
        assert!(analyze(&valid, false).expect("parses"));
    }

    #[test]
    fn failed_conversion_still_writes_report() {
        let dir = tempfile::tempdir().expect("create temp directory");
        let input = dir.path().join("missing.s2k");
        let output = dir.path().join("missing.dat");
        let report = dir.path().join("report.json");

        let err = convert(&input, &output, Some(&report), BdfOptions::default())
            .expect_err("missing input should fail");
        assert!(matches!(err, IoError::Parse(_)));

        let written = s2k_io::load_report(&report).expect("report exists");
        assert_eq!(written.status, s2k_io::JobStatus::Failed);
        assert!(!output.exists());
    }
}
