mod logging;

use clap::{Args, Parser, Subcommand};
use ns_app::{
    AppResult, BatchOptions, BatchProgressEvent, BatchRequest, EosDef, NamedDensity, SearchDef,
    config, run_service, star_service,
};
use ns_results::CandidateRecord;
use ns_tidal::TidalResult;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ns-cli")]
#[command(about = "Neutron-star mass, radius and tidal deformability from an EOS", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence terminal log output (a --log-file still records)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Polytropic EOS P = K n^gamma.
#[derive(Args, Clone, Copy)]
struct PolytropeArgs {
    /// Polytropic constant K [MeV fm^(3 gamma - 3)]
    #[arg(long)]
    k: f64,
    /// Adiabatic index
    #[arg(long)]
    gamma: f64,
    /// Highest valid baryon density [fm^-3]
    #[arg(long)]
    max_density: f64,
}

impl PolytropeArgs {
    fn eos(&self) -> EosDef {
        EosDef::polytrope(self.k, self.gamma, self.max_density)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the star of a given mass
    Mass {
        #[command(flatten)]
        eos: PolytropeArgs,
        /// Target mass [M_sun]
        #[arg(long, default_value_t = 1.4)]
        target: f64,
        /// Starting central pressure [MeV fm^-3]
        #[arg(long, default_value_t = 10.0)]
        pc0: f64,
        /// Densities [fm^-3] at which radius and enclosed mass are reported
        #[arg(long = "checkpoint-density")]
        checkpoint_densities: Vec<f64>,
    },
    /// Find the heaviest stable star
    MaxMass {
        #[command(flatten)]
        eos: PolytropeArgs,
        /// Starting central pressure [MeV fm^-3]
        #[arg(long, default_value_t = 10.0)]
        pc0: f64,
    },
    /// Radial profile of the star at a given central pressure
    Profile {
        #[command(flatten)]
        eos: PolytropeArgs,
        /// Central pressure [MeV fm^-3]
        #[arg(long)]
        pc: f64,
        /// Densities [fm^-3] splitting the star into layers
        #[arg(long = "transition-density")]
        transition_densities: Vec<f64>,
    },
    /// Write the integrator table of an EOS
    Table {
        #[command(flatten)]
        eos: PolytropeArgs,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a run configuration
    Validate {
        /// Path to the run YAML file
        config_path: PathBuf,
    },
    /// Evaluate every candidate of a run configuration
    Batch {
        /// Path to the run YAML file
        config_path: PathBuf,
        /// Do not store the run
        #[arg(long)]
        no_save: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List stored runs of a configuration
    Runs {
        /// Path to the run YAML file
        config_path: PathBuf,
    },
    /// Export a stored run as CSV
    Export {
        /// Path to the run YAML file
        config_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::setup_logging(&logging::LogOptions {
        verbosity: cli.verbose,
        quiet: cli.quiet,
        log_file: cli.log_file.as_deref(),
    })?;

    match cli.command {
        Commands::Mass {
            eos,
            target,
            pc0,
            checkpoint_densities,
        } => cmd_mass(&eos.eos(), target, pc0, &checkpoint_densities),
        Commands::MaxMass { eos, pc0 } => cmd_max_mass(&eos.eos(), pc0),
        Commands::Profile {
            eos,
            pc,
            transition_densities,
        } => cmd_profile(&eos.eos(), pc, &transition_densities),
        Commands::Table { eos, output } => cmd_table(&eos.eos(), &output),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Batch {
            config_path,
            no_save,
            no_cache,
        } => cmd_batch(&config_path, !no_save, !no_cache),
        Commands::Runs { config_path } => cmd_runs(&config_path),
        Commands::Export {
            config_path,
            run_id,
            output,
        } => cmd_export(&config_path, &run_id, output.as_deref()),
    }
}

fn print_star(star: &TidalResult) {
    println!("  Mass:             {:.5} M_sun", star.mass);
    println!("  Radius:           {:.4} km", star.radius);
    println!("  Lambda:           {:.3}", star.lambda);
    println!("  Central pressure: {:.5} MeV/fm^3", star.central_pressure);
    if star.central_density.is_finite() {
        println!("  Central density:  {:.5} fm^-3", star.central_density);
    }
}

fn cmd_mass(eos: &EosDef, target: f64, pc0: f64, densities: &[f64]) -> AppResult<()> {
    let search = SearchDef {
        central_pressure0: pc0,
        target_mass: target,
        ..SearchDef::default()
    };
    let checkpoints: Vec<NamedDensity> = densities
        .iter()
        .enumerate()
        .map(|(i, &density)| NamedDensity {
            name: format!("checkpoint{i}"),
            density,
        })
        .collect();

    let star = star_service::find_mass(eos, &search, &checkpoints)?;
    println!("✓ Star of {target} M_sun:");
    print_star(&star);
    if !checkpoints.is_empty() {
        println!("\nCheckpoints:");
        for ((n, r), m) in star
            .checkpoint_density
            .iter()
            .zip(&star.checkpoint_radius)
            .zip(&star.checkpoint_mass)
        {
            println!("  n = {n:.4} fm^-3: r = {r:.4} km, m = {m:.5} M_sun");
        }
    }
    Ok(())
}

fn cmd_max_mass(eos: &EosDef, pc0: f64) -> AppResult<()> {
    let search = SearchDef {
        central_pressure0: pc0,
        ..SearchDef::default()
    };
    let star = star_service::find_max_mass(eos, &search)?;
    println!("✓ Maximum mass star:");
    print_star(&star);
    Ok(())
}

fn cmd_profile(eos: &EosDef, pc: f64, transitions: &[f64]) -> AppResult<()> {
    let result = star_service::star_profile(eos, pc, transitions)?;
    println!("✓ Star at central pressure {pc} MeV/fm^3:");
    print_star(&result.star);
    println!("  Profile points:   {}", result.profile.len());

    println!("\nLayers (centre outwards):");
    for layer in &result.layers {
        println!(
            "  P {:>10.4e} .. {:<10.4e}  r {:>8.4} .. {:<8.4} km  thickness {:.4} km  mass {:.5} M_sun",
            layer.inner_pressure,
            layer.outer_pressure,
            layer.inner_radius,
            layer.outer_radius,
            layer.thickness(),
            layer.mass()
        );
    }
    Ok(())
}

fn cmd_table(eos: &EosDef, output: &Path) -> AppResult<()> {
    let rows = star_service::write_table(eos, output)?;
    println!("✓ Wrote {rows} rows to {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let run = config::load_yaml(config_path)?;
    println!(
        "✓ Config '{}' is valid ({} candidates, {} constraints)",
        run.name,
        run.candidates.len(),
        run.constraints.len()
    );
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(event: &BatchProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let mut line = format!(
        "\r[{}{}] {}/{}  {}  elapsed={:.1}s",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        event.completed,
        event.total,
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(id) = &event.candidate_id {
        line.push_str(&format!("  last={id}"));
    }
    print!("{line}");
    let _ = io::stdout().flush();
}

fn cmd_batch(config_path: &Path, save: bool, use_cache: bool) -> AppResult<()> {
    println!("Running batch: {}", config_path.display());

    let request = BatchRequest {
        config_path,
        options: BatchOptions {
            use_cache,
            save,
            ..BatchOptions::default()
        },
    };
    let response = run_service::ensure_batch_with_progress(
        &request,
        Some(&|event: BatchProgressEvent| render_progress(&event)),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else if save {
        println!("✓ Batch completed: {}", response.run_id);
    } else {
        println!("✓ Batch completed (not saved)");
    }
    println!(
        "  Candidates: {} ({} accepted)",
        response.manifest.candidates, response.manifest.accepted
    );
    println!("  Elapsed:    {:.2}s", response.elapsed_s);

    println!();
    for record in &response.records {
        print_record_line(record);
    }
    Ok(())
}

fn print_record_line(record: &CandidateRecord) {
    let fmt = |name: &str| {
        record
            .value(name)
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "-".to_string())
    };
    let status = match &record.status {
        ns_results::CandidateStatus::Accepted => "accepted".to_string(),
        ns_results::CandidateStatus::Rejected { constraint } => format!("rejected ({constraint})"),
        ns_results::CandidateStatus::NoData { reason } => format!("no data ({reason})"),
    };
    println!(
        "  {:<16} {:<24} M_max={:<8} R={:<8} Lambda={:<10} {}",
        record.candidate_id,
        status,
        fmt("MaxMass"),
        fmt("R"),
        fmt("Lambda"),
        record.flags.join(",")
    );
}

fn cmd_runs(config_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(config_path)?;
    if runs.is_empty() {
        println!("No stored runs for: {}", config_path.display());
    } else {
        println!("Stored runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} of {} accepted)",
                manifest.run_id, manifest.timestamp, manifest.accepted, manifest.candidates
            );
        }
    }
    Ok(())
}

/// CSV with one row per candidate; columns are the union of all record
/// columns in first-seen order.
/// Records as CSV, one row per candidate over the union of their columns.
fn write_csv<W: Write>(records: &[CandidateRecord], out: W) -> io::Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for value in &record.values {
            if !columns.contains(&value.name.as_str()) {
                columns.push(&value.name);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec!["candidate_id", "status", "flags"];
    header.extend(&columns);
    writer.write_record(&header)?;

    for record in records {
        let status = match &record.status {
            ns_results::CandidateStatus::Accepted => "accepted",
            ns_results::CandidateStatus::Rejected { .. } => "rejected",
            ns_results::CandidateStatus::NoData { .. } => "no_data",
        };
        let mut row = vec![
            record.candidate_id.clone(),
            status.to_string(),
            record.flags.join(";"),
        ];
        row.extend(
            columns
                .iter()
                .map(|c| record.value(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }
    writer.flush()
}

fn cmd_export(config_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(config_path, run_id)?;
    if let Some(path) = output {
        write_csv(&records, std::fs::File::create(path)?)?;
        println!("✓ Exported {} candidates to {}", records.len(), path.display());
    } else {
        write_csv(&records, io::stdout().lock())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_results::{CandidateStatus, ColumnValue};

    fn to_csv(records: &[CandidateRecord]) -> String {
        let mut out = Vec::new();
        write_csv(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_parses_star_commands() {
        let cli = Cli::try_parse_from([
            "ns-cli",
            "-vv",
            "mass",
            "--k",
            "254",
            "--gamma",
            "2",
            "--max-density",
            "2",
            "--checkpoint-density",
            "0.08",
            "--checkpoint-density",
            "0.16",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Mass {
                eos,
                target,
                pc0,
                checkpoint_densities,
            } => {
                assert_eq!(eos.k, 254.0);
                assert_eq!(target, 1.4);
                assert_eq!(pc0, 10.0);
                assert_eq!(checkpoint_densities, [0.08, 0.16]);
            }
            _ => panic!("expected mass command"),
        }

        assert!(Cli::try_parse_from(["ns-cli", "-q", "-v", "runs", "run.yaml"]).is_err());
        assert!(Cli::try_parse_from(["ns-cli", "profile", "--k", "254"]).is_err());
    }

    #[test]
    fn csv_takes_union_of_columns() {
        let records = vec![
            CandidateRecord {
                candidate_id: "a".to_string(),
                status: CandidateStatus::Accepted,
                flags: vec!["negative_sound".to_string()],
                values: vec![ColumnValue::new("Mass", 1.4), ColumnValue::new("R", f64::NAN)],
            },
            CandidateRecord {
                candidate_id: "b".to_string(),
                status: CandidateStatus::Rejected {
                    constraint: "flow".to_string(),
                },
                flags: Vec::new(),
                values: Vec::new(),
            },
        ];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "candidate_id,status,flags,Mass,R");
        assert_eq!(lines[1], "a,accepted,negative_sound,1.4,");
        assert_eq!(lines[2], "b,rejected,,,");
    }

    #[test]
    fn csv_quotes_separators_in_fields() {
        let records = vec![CandidateRecord {
            candidate_id: "apr, \"soft\"".to_string(),
            status: CandidateStatus::Accepted,
            flags: vec!["negative_sound".to_string(), "below_target_mass".to_string()],
            values: vec![ColumnValue::new("Mass", 1.4)],
        }];
        let csv = to_csv(&records);
        assert_eq!(
            csv.lines().nth(1),
            Some("\"apr, \"\"soft\"\"\",accepted,negative_sound;below_target_mass,1.4")
        );

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(&row[0], "apr, \"soft\"");
    }
}
