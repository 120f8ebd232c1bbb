//! iepsheet CLI - weekly IEP goal tracking sheets

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use iepsheet::batch::{discover_inputs, Batch, BatchOptions, BatchReport};

/// Input folder, next to the executable.
const INPUT_DIR: &str = "inputs";

/// Output folder, next to the executable.
const OUTPUT_DIR: &str = "outputs";

#[derive(Parser)]
#[command(name = "iepsheet")]
#[command(version)]
#[command(
    about = "Turn the IEP PDFs in ./inputs into weekly tracking sheets in ./outputs",
    long_about = "Reads every PDF in the `inputs` folder next to this executable, extracts \
                  the student name and competency goals, and writes one tracking-sheet \
                  report per student to the `outputs` folder. Set RUST_LOG=debug for \
                  detailed logging."
)]
struct Cli {}

fn main() {
    env_logger::init();
    let _cli = Cli::parse();

    let code = match run() {
        Ok(report) if report.is_success() => 0,
        Ok(_) => 1,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Result<BatchReport, Box<dyn std::error::Error>> {
    let root = executable_dir()?;
    let input_dir = root.join(INPUT_DIR);
    let output_dir = root.join(OUTPUT_DIR);

    let inputs = discover_inputs(&input_dir)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            input_dir.display()
        );
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Preparing reports...");

    let batch = Batch::new(BatchOptions::default());
    let report = batch.run_files(&inputs, &output_dir, |outcome| {
        pb.set_message(file_label(&outcome.input));
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    print_summary(&report);
    if let Ok(json) = report.to_json() {
        log::debug!("Batch summary:\n{}", json);
    }

    Ok(report)
}

fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(report: &BatchReport) {
    println!("\n{}", "Reports".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let total = report.outcomes.len();
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let branch = if i + 1 == total { "└─" } else { "├─" };
        match &outcome.result {
            Ok(written) => println!(
                "  {} {} {} {} ({} goals)",
                branch.dimmed(),
                "✓".green(),
                file_label(&outcome.input),
                file_label(&written.output).bold(),
                written.record.goals.len()
            ),
            Err(e) => println!(
                "  {} {} {} {}",
                branch.dimmed(),
                "✗".red(),
                file_label(&outcome.input),
                e.to_string().red()
            ),
        }
    }

    println!();
    println!(
        "{}: {}  {}: {}",
        "Written".green().bold(),
        report.succeeded(),
        "Failed".red().bold(),
        report.failed()
    );
}
