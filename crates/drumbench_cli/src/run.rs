//! `drumbench run`: runs phases against the reference models and reports.

use drumbench_diagnostics::TerminalRenderer;
use drumbench_harness::report::{render_json, render_text, save_recordings, verdict};
use drumbench_harness::{Bench, Phase};

use crate::pipeline::resolve_bench;
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the selected phases. Returns exit code 0 iff every check passed.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, root) = resolve_bench(global)?;
    let phases = if args.phases.is_empty() {
        Phase::ALL.to_vec()
    } else {
        args.phases.clone()
    };

    let bench = Bench::new(config, root);
    let board = bench.run(&phases, args.parallel)?;

    match args.format {
        ReportFormat::Json => println!("{}", render_json(&board)?),
        ReportFormat::Text if global.quiet => println!("{}", verdict(board.global())),
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            print!("{}", render_text(&board, &renderer));
        }
    }

    if let Some(ref dir) = args.save_recordings {
        let written = save_recordings(&board, dir)?;
        tracing::info!(files = written.len(), dir = %dir.display(), "recordings saved");
    }

    Ok(if board.success() { 0 } else { 1 })
}
