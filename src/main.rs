mod cli;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::io::{BufRead, Write};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::{BrowseArgs, Cli, Command, LabelArgs, ScoreArgs, ShowArgs, StatsArgs, signal_kind};
use crate::input::{DatasetError, load_dataset};
use crate::model::mask::MaskPolicy;
use crate::model::score::{ScoreError, estimate};
use crate::pipeline::label::{LabelError, label_file};
use crate::pipeline::sample::{SampleError, Sampler};
use crate::pipeline::summary::summarize;
use crate::pipeline::view::{DisplayPayload, ReviewView, Trigger, ViewState};
use crate::report::OutputFormat;
use crate::report::json::{
    render_estimate_json, render_payload_json, render_summary_json, write_payloads_json,
};
use crate::report::text::{render_estimate_text, render_payload_text, render_summary_text};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Show(args) => run_show(&args, &mut out),
        Command::Browse(args) => run_browse(&args, std::io::stdin().lock(), &mut out),
        Command::Score(args) => run_score(&args, &mut out),
        Command::Label(args) => run_label(&args, &mut out),
        Command::Stats(args) => run_stats(&args, &mut out),
    }
}

fn make_sampler(seed: Option<u64>) -> Sampler {
    match seed {
        Some(seed) => {
            info!(seed, "seeded sampling");
            Sampler::seeded(seed)
        }
        None => Sampler::from_entropy(),
    }
}

fn run_show<W: Write>(args: &ShowArgs, out: &mut W) -> Result<(), AppError> {
    let policy = MaskPolicy::new(args.mask.threshold)?;
    let dataset = load_dataset(&args.data)?;
    let mut view = ReviewView::new(&dataset, make_sampler(args.seed), policy);

    let mut next = |i: u32| -> Result<DisplayPayload, AppError> {
        let trigger = if i == 0 { Trigger::Initial } else { Trigger::Refresh };
        Ok(view.handle(trigger)?)
    };

    match args.format {
        OutputFormat::Text => {
            for i in 0..args.count {
                if i > 0 {
                    writeln!(out)?;
                }
                out.write_all(render_payload_text(&next(i)?, &policy).as_bytes())?;
            }
        }
        OutputFormat::Json if args.count == 1 => {
            writeln!(out, "{}", render_payload_json(&next(0)?)?)?;
        }
        OutputFormat::Json => {
            write_payloads_json(out, args.count, next)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_browse<R: BufRead, W: Write>(
    args: &BrowseArgs,
    input: R,
    out: &mut W,
) -> Result<(), AppError> {
    let policy = MaskPolicy::new(args.mask.threshold)?;
    let dataset = load_dataset(&args.data)?;
    let mut view = ReviewView::new(&dataset, make_sampler(args.seed), policy);
    browse(&mut view, input, out)
}

fn browse<R: BufRead, W: Write, G: rand::Rng>(
    view: &mut ReviewView<'_, G>,
    input: R,
    out: &mut W,
) -> Result<(), AppError> {
    show_payload(out, &view.handle(Trigger::Initial)?, view.policy())?;
    for line in input.lines() {
        let line = line?;
        if matches!(line.trim(), "q" | "quit") {
            break;
        }
        show_payload(out, &view.handle(Trigger::Refresh)?, view.policy())?;
    }
    if let ViewState::Displayed(last) = view.state() {
        debug!(chars = last.text.len(), "browse finished");
    }
    Ok(())
}

fn show_payload<W: Write>(
    out: &mut W,
    payload: &DisplayPayload,
    policy: &MaskPolicy,
) -> Result<(), AppError> {
    out.write_all(render_payload_text(payload, policy).as_bytes())?;
    writeln!(out, "\n[Enter] new review, [q] quit")?;
    out.flush()?;
    Ok(())
}

fn run_score<W: Write>(args: &ScoreArgs, out: &mut W) -> Result<(), AppError> {
    let est = estimate(&args.values, signal_kind(args.probabilities))?;
    match args.format {
        OutputFormat::Text => out.write_all(render_estimate_text(&est).as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", render_estimate_json(&est)?)?,
    }
    Ok(())
}

fn run_label<W: Write>(args: &LabelArgs, out: &mut W) -> Result<(), AppError> {
    let written = label_file(&args.input, &args.out, signal_kind(args.probabilities))?;
    writeln!(out, "labelled {} reviews -> {}", written, args.out.display())?;
    Ok(())
}

fn run_stats<W: Write>(args: &StatsArgs, out: &mut W) -> Result<(), AppError> {
    let policy = MaskPolicy::new(args.mask.threshold)?;
    let dataset = load_dataset(&args.data)?;
    let summary = summarize(&dataset, &policy)?;
    match args.format {
        OutputFormat::Text => out.write_all(render_summary_text(&summary).as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", render_summary_json(&summary)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
