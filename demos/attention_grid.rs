//! # Attention grid demo
//!
//! Splits text into sentences, scores every pair, and prints the grid, the
//! insights and (optionally) the detail view of one selected cell.
//!
//! ```bash
//! cargo run --example attention_grid -- "I love cats. Cats are great. Dogs bark."
//! cargo run --example attention_grid -- --mode scaled --select 1,2 "One. Two. Three."
//! echo "Piped text works too. Like this." | cargo run --example attention_grid
//! RUST_LOG=debug cargo run --example attention_grid -- "Verbose. Run."
//! ```

use std::io::Read;

use attention_lens::pipeline::sentence_label;
use attention_lens::{AttentionReport, ScoringMode, TextRenderer, Workbench};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Render a sentence attention map")]
struct Args {
    /// Scoring mode: cosine, dotProduct or scaled (anything else means cosine)
    #[arg(long, default_value = "cosine")]
    mode: String,

    /// Select a cell as SOURCE,TARGET using 1-based sentence numbers
    #[arg(long, value_parser = parse_cell)]
    select: Option<(usize, usize)>,

    /// Print the report as JSON instead of text (needs `--features serde`)
    #[arg(long)]
    json: bool,

    /// Text to analyse; read from stdin when omitted
    text: Vec<String>,
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected SOURCE,TARGET, got {s:?}"))?;
    let parse = |v: &str| -> Result<usize, String> {
        match v.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("sentence numbers start at 1, got {v:?}")),
        }
    };
    Ok((parse(a)?, parse(b)?))
}

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = (v * 20.0).round() as usize;
    let empty = 20usize.saturating_sub(filled);
    format!("[{}{}] {:.2}", "█".repeat(filled), "░".repeat(empty), v)
}

fn print_heat(report: &AttentionReport) {
    println!("Row averages (off-diagonal):");
    let n = report.sentence_count();
    for (i, row) in report.matrix.rows().enumerate() {
        let sum: f64 = row.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, v)| v).sum();
        let avg = if n > 1 { sum / (n - 1) as f64 } else { 0.0 };
        println!("  {:<4} {}", sentence_label(i), bar(avg));
    }
}

#[cfg(feature = "serde")]
fn print_json(report: &AttentionReport) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_report: &AttentionReport) -> Result<(), Box<dyn std::error::Error>> {
    Err("JSON output needs the `serde` feature".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.text.join(" ")
    };

    let mut workbench = Workbench::new();
    if let Err(err) = workbench.process(&text, ScoringMode::from_token(&args.mode)) {
        eprintln!("{}", err.notice());
        std::process::exit(1);
    }

    if let Some((source, target)) = args.select {
        workbench.select(source, target)?;
    }

    let Some(report) = workbench.report() else {
        return Ok(());
    };
    if args.json {
        return print_json(report);
    }

    if let Some(rendered) = workbench.render(&mut TextRenderer) {
        println!("{rendered}");
    }
    print_heat(report);

    if let Some(p) = report.insights.highest_attention {
        if let Some(cell) = report.cell(p.source, p.target) {
            println!();
            println!("Strongest link tooltip:");
            for line in cell.tooltip().lines() {
                println!("  {line}");
            }
        }
    }
    Ok(())
}
