use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pallet_core::render::render_svg;
use pallet_core::{PackOutcome, PackReport, PackRequest, Tournament};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pallet")]
#[command(about = "Pallet Loading Calculator - Find the fullest box layout for a pallet", long_about = None)]
struct Cli {
    /// Log tournament progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack boxes onto the pallet
    Pack {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SVG visualization from result
    Render {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Pack { input, output } => {
            pack_command(input, output)?;
        }
        Commands::Render { input, output } => {
            render_command(input, output)?;
        }
    }

    Ok(())
}

fn read_request(input: &Path) -> Result<PackRequest> {
    let content = std::fs::read_to_string(input)?;
    let request: PackRequest = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    debug!(
        "Read {} box types from {}",
        request.items.len(),
        input.display()
    );
    Ok(request)
}

fn pack_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = read_request(&input)?;

    println!(
        "  Pallet {} x {}",
        request.bin.width.to_string().bright_white().bold(),
        request.bin.length.to_string().bright_white().bold()
    );
    println!(
        "  {} box types",
        request.items.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Running heuristic tournament...".bright_blue());

    let tournament = Tournament::new(request)?;
    let outcome = tournament.run()?;

    println!();
    match &outcome {
        PackOutcome::Packed(report) => print_report(report),
        PackOutcome::Infeasible(report) => {
            if let Some(dup) = &report.duplicate_dimension_warning {
                print_duplicate_warning(&dup.rid_a, &dup.rid_b);
            }
            println!(
                "{}",
                "❌ Could not find any layout that satisfies all TOP PRIORITY required quantities."
                    .bright_red()
                    .bold()
            );
            for shortfall in &report.unmet_priority {
                println!(
                    "    • {}: best layout packed {} of {}",
                    shortfall.rid.bright_white(),
                    shortfall.placed,
                    shortfall.required
                );
            }
        }
    }
    println!();

    let json = serde_json::to_string_pretty(&outcome)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    if !outcome.is_feasible() {
        bail!("No layout satisfies the priority quantities");
    }

    Ok(())
}

fn print_duplicate_warning(rid_a: &str, rid_b: &str) {
    println!(
        "{}",
        format!(
            "⚠️  Warning: {} has the same dimensions as {}. Results may be ambiguous.",
            rid_b, rid_a
        )
        .bright_yellow()
    );
}

fn print_report(report: &PackReport) {
    println!("{}", "✅ Packing complete!".bright_green().bold());
    println!();

    if let Some(dup) = &report.duplicate_dimension_warning {
        print_duplicate_warning(&dup.rid_a, &dup.rid_b);
    }

    for shortfall in &report.soft_shortfalls {
        println!(
            "{}",
            format!(
                "⚠️  Could not fit all required boxes. Only packed {} of {} for {}.",
                shortfall.placed, shortfall.required, shortfall.rid
            )
            .bright_yellow()
        );
    }

    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  Winning heuristic: {}",
        report.winning_combo.to_string().bright_white()
    );
    println!(
        "  Total boxes: {}",
        report.total_placed.to_string().bright_white().bold()
    );
    println!("  Waste: {:.1}%", report.summary.waste_percentage);

    println!("  Box breakdown:");
    for entry in &report.breakdown {
        if entry.rotated > 0 {
            println!(
                "    • {}: {} (standard: {}, rotated: {})",
                entry.rid.bright_white(),
                entry.total,
                entry.standard,
                entry.rotated
            );
        } else {
            println!("    • {}: {}", entry.rid.bright_white(), entry.total);
        }
    }
}

fn render_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let outcome: PackOutcome = serde_json::from_str(&content)?;
    let report = match outcome {
        PackOutcome::Packed(report) => report,
        PackOutcome::Infeasible(_) => bail!("Result file holds no layout to render"),
    };

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = render_svg(&report)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}
