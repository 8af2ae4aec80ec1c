mod demos;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use piano_fingering_core::distance::Side;
use piano_fingering_core::finger::Finger;
use piano_fingering_core::format::{NoteName, name_assignment};
use piano_fingering_core::optimizer::{OptimizerOptions, Solution, optimize};
use piano_fingering_core::pitch::{Accidental, Pitch, Step};
use piano_fingering_core::slice::{Hand, Note, build_hand};
use std::thread;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SideArg {
    Left,
    #[default]
    Right,
}

impl From<SideArg> for Side {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Left => Side::Left,
            SideArg::Right => Side::Right,
        }
    }
}

#[derive(Parser)]
#[command(name = "piano-fingering")]
#[command(about = "Exact optimal piano fingering oracle", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every cost-minimal fingering for a hand described on the command line
    Optimize {
        /// Space-separated note tokens, e.g. "C4 D4 E4" or "C4 +E4 +G4" for a
        /// chord (a leading '+' joins the previous note's slice)
        notes: String,

        /// Which hand plays these notes
        #[arg(short, long, value_enum, default_value_t = SideArg::Right)]
        side: SideArg,

        /// Disable R3/R4/R8/R9/R12 (the triplet-aware rules), reproducing the
        /// historical basic-optimizer numbers
        #[arg(long)]
        no_triplet_rules: bool,

        /// Emit machine-readable JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Run a built-in golden-set scenario (the worked rule examples)
    Demo {
        /// Scenario number 1..=6, or omit to run all of them
        which: Option<u8>,

        #[arg(long)]
        no_triplet_rules: bool,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize { notes, side, no_triplet_rules, json } => {
            let options = OptimizerOptions {
                triplet_rules: !no_triplet_rules,
                ..OptimizerOptions::default()
            };
            let hand = build_hand(&parse_notes(&notes)?, side.into())
                .context("failed to group notes into slices")?;
            run_report("custom hand", None, &hand, &options, json)?;
        }
        Commands::Demo { which, no_triplet_rules, json } => {
            let options = OptimizerOptions {
                triplet_rules: !no_triplet_rules,
                ..OptimizerOptions::default()
            };

            match which {
                Some(n) => {
                    let scenario = demos::scenario(n)?;
                    run_report(scenario.name, Some(scenario.description), &scenario.hand, &options, json)?;
                }
                None => {
                    // One thread per scenario, mirroring how the optimizer
                    // treats a score's two hands as independent workloads.
                    let handles: Vec<_> = (1..=demos::SCENARIO_COUNT)
                        .map(|n| {
                            let options = options;
                            thread::spawn(move || -> Result<()> {
                                let scenario = demos::scenario(n)?;
                                run_report(scenario.name, Some(scenario.description), &scenario.hand, &options, json)
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().expect("demo thread panicked")?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Parses a "C4", "C#4", or "Cb4"-style token into a [`Pitch`]; a leading
/// '+' marks the note as continuing the previous slice instead of opening a
/// new one.
fn parse_note_token(token: &str) -> Result<(Pitch, bool)> {
    let (continuation, token) = match token.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let mut chars = token.chars();
    let step_char = chars
        .next()
        .with_context(|| format!("empty note token: '{token}'"))?;
    let step = Step::parse(&step_char.to_string())
        .with_context(|| format!("invalid note token: '{token}'"))?;

    let rest: String = chars.collect();
    let (accidental, octave_str) = if let Some(stripped) = rest.strip_prefix('#') {
        (Accidental::Sharp, stripped)
    } else if let Some(stripped) = rest.strip_prefix('b') {
        (Accidental::Flat, stripped)
    } else {
        (Accidental::Natural, rest.as_str())
    };

    let octave: i32 = octave_str
        .parse()
        .with_context(|| format!("invalid octave in note token: '{token}'"))?;

    Ok((Pitch::new(step, accidental, octave), continuation))
}

fn parse_notes(notes_str: &str) -> Result<Vec<Note>> {
    notes_str
        .split_whitespace()
        .map(|token| {
            let (pitch, continuation) = parse_note_token(token)?;
            Ok(Note::new(pitch, continuation, 0, 0))
        })
        .collect()
}

fn run_report(
    label: &str,
    description: Option<&str>,
    hand: &Hand,
    options: &OptimizerOptions,
    json: bool,
) -> Result<()> {
    let solution = optimize(hand, options).context("optimization failed")?;

    if json {
        print_json(label, description, hand, &solution)?;
    } else {
        print_text(label, description, hand, &solution)?;
    }

    Ok(())
}

fn print_text(label: &str, description: Option<&str>, hand: &Hand, solution: &Solution) -> Result<()> {
    println!("\n{} {}", "Hand:".bold(), label.green().bold());
    if let Some(description) = description {
        println!("{} {}", "About:".dimmed(), description);
    }
    println!(
        "{} {} | {} {}",
        "Side:".dimmed(),
        hand.side(),
        "Slices:".dimmed(),
        hand.len()
    );
    println!(
        "{} {}\n",
        "Optimal cost:".bold(),
        solution.cost.to_string().cyan().bold()
    );

    if solution.fingerings.is_empty() {
        println!("{}", "No candidate fingerings (empty hand).".yellow());
        return Ok(());
    }

    println!(
        "{} ({} co-optimal)",
        "Fingerings:".bold(),
        solution.fingerings.len().to_string().cyan()
    );

    for (i, fingering_seq) in solution.fingerings.iter().enumerate() {
        let named = name_assignment(hand, fingering_seq)?;
        let rendered = render_slices(&named);
        println!("  {}. {}", (i + 1).to_string().cyan().bold(), rendered);
    }

    Ok(())
}

fn render_slices(slices: &[Vec<(NoteName, Finger)>]) -> String {
    slices
        .iter()
        .map(|slice| {
            let pairs: Vec<String> = slice.iter().map(|(name, finger)| format!("{name}/{finger}")).collect();
            format!("[{}]", pairs.join(","))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json(label: &str, description: Option<&str>, hand: &Hand, solution: &Solution) -> Result<()> {
    let mut solutions_json = Vec::with_capacity(solution.fingerings.len());
    for fingering_seq in &solution.fingerings {
        let named = name_assignment(hand, fingering_seq)?;
        let slices_json: Vec<Vec<serde_json::Value>> = named
            .iter()
            .map(|slice| {
                slice
                    .iter()
                    .map(|(name, finger)| {
                        serde_json::json!({ "note": name.to_string(), "finger": finger.get() })
                    })
                    .collect()
            })
            .collect();
        solutions_json.push(slices_json);
    }

    let mut report = serde_json::json!({
        "hand": label,
        "side": hand.side().to_string(),
        "cost": solution.cost.as_f64(),
        "solutions": solutions_json,
    });
    if let Some(description) = description {
        report["description"] = serde_json::json!(description);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
