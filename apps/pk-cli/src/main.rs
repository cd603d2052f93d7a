use clap::{Parser, Subcommand};
use pk_app::{
    AppResult, GenerateOptions, GenerateResponse, RunProgressEvent, RunStage, project_service,
    run_service,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pk-cli")]
#[command(about = "cylpack CLI - initial packings of circular inclusions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and values
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Generate, relax and write a packing
    Generate {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Geometry output file
        #[arg(short, long, default_value = "cylinders.info")]
        output: PathBuf,
        /// Store the run (manifest and trajectory) under this directory
        #[arg(long)]
        run_dir: Option<PathBuf>,
        /// Override the radius sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stored runs under a directory
    Runs {
        /// Directory passed to `generate --run-dir`
        run_dir: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Directory of a single run (holds manifest.json)
        run_dir: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Generate {
            project_path,
            output,
            run_dir,
            seed,
        } => cmd_generate(&project_path, &output, run_dir, seed),
        Commands::Runs { run_dir } => cmd_runs(&run_dir),
        Commands::ShowRun { run_dir } => cmd_show_run(&run_dir),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    let summary = project_service::summarize(&project);
    println!("✓ Project is valid");
    println!(
        "  {}: {} circles, mean radius {}, domain {} x {}",
        summary.name,
        summary.count,
        summary.radius_mean,
        summary.domain_size[0],
        summary.domain_size[1]
    );
    if let Some(vf) = summary.target_area_fraction {
        println!("  Target area fraction: {vf}");
    }
    println!(
        "  Solver: {} (eps={}, max_steps={})",
        summary.integrator, summary.eps, summary.max_steps
    );
    Ok(())
}

fn cmd_generate(
    project_path: &Path,
    output: &Path,
    run_dir: Option<PathBuf>,
    seed: Option<u64>,
) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    if seed.is_some() {
        project.inclusions.seed = seed;
    }
    println!(
        "Generating {} circles for project: {}",
        project.inclusions.count, project.name
    );

    let options = GenerateOptions {
        run_dir,
        ..GenerateOptions::default()
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::generate_with_progress(
        &project,
        &options,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    response.write_geometry(output)?;
    print_generate_summary(&response, output);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.relax) {
        (RunStage::Relaxing, Some(r)) => {
            let width = 28usize;
            let fraction = r.step as f64 / r.max_steps.max(1) as f64;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] step={}/{}  overlap={:.3e}  eps={:.1e}  ke={:.2e}  elapsed={:.1}s",
                bar,
                r.step,
                r.max_steps,
                r.max_overlap,
                r.eps,
                r.kinetic_energy,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_generate_summary(response: &GenerateResponse, output: &Path) {
    let outcome = &response.outcome;
    let mark = if outcome.converged() { "✓" } else { "!" };
    println!(
        "{} Relaxation {} after {} steps (max overlap {:.3e})",
        mark,
        outcome.status.label(),
        outcome.steps,
        outcome.max_overlap
    );
    println!("  Seed: {}", response.manifest.seed);
    if let Some((i, j)) = outcome.worst_pair
        && !outcome.converged()
    {
        println!("  Worst pair: {} / {}", i, j);
    }
    println!("  Area fraction: {:.4}", response.area_fraction);
    println!(
        "  Wrote {} circles to {} ({} skipped outside the domain)",
        response.emit.written.len(),
        output.display(),
        response.emit.skipped.len()
    );
    if let Some(path) = &response.run_path {
        println!("  Run stored in {}", path.display());
    }

    let timing = &response.timing;
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    println!(
        "  Layout:  {:.3}s ({:.1}%)",
        timing.layout_time_s,
        100.0 * timing.layout_time_s / total
    );
    println!(
        "  Relax:   {:.3}s ({:.1}%)",
        timing.relax_time_s,
        100.0 * timing.relax_time_s / total
    );
    println!(
        "  Emit:    {:.3}s ({:.1}%)",
        timing.emit_time_s,
        100.0 * timing.emit_time_s / total
    );
    if timing.save_time_s > 0.0 {
        println!(
            "  Save:    {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
}

fn cmd_runs(run_dir: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(run_dir)?;

    if runs.is_empty() {
        println!("No stored runs under {}", run_dir.display());
    } else {
        println!("Stored runs under {}:", run_dir.display());
        for manifest in runs {
            println!(
                "  {} {} ({}, {} steps, {})",
                &manifest.run_id[..12.min(manifest.run_id.len())],
                manifest.project_name,
                manifest.status,
                manifest.steps,
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(run_dir: &Path) -> AppResult<()> {
    println!("Loading run: {}", run_dir.display());

    let (manifest, records) = run_service::load_run(run_dir)?;

    println!("\nRun Summary:");
    println!("  Run ID:      {}", manifest.run_id);
    println!("  Project:     {}", manifest.project_name);
    println!("  Seed:        {}", manifest.seed);
    println!("  Timestamp:   {}", manifest.timestamp);
    println!("  Version:     {}", manifest.solver_version);
    println!("  Status:      {}", manifest.status);
    println!("  Steps:       {}", manifest.steps);
    println!("  Max overlap: {:.3e}", manifest.max_overlap);
    println!("  Circles:     {}", manifest.n_circles);
    println!(
        "  Written:     {} ({} skipped)",
        manifest.retained, manifest.skipped
    );
    println!("  Trajectory:  {} rows", records.len());
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        println!("  Step range:  {} - {}", first.step, last.step);
    }

    Ok(())
}
