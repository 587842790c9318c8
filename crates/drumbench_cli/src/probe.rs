//! `drumbench probe`: pins the controller's request priority empirically.

use drumbench_common::Mode;
use drumbench_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use drumbench_harness::phases::controller::priority;
use drumbench_harness::probe_priority;
use drumbench_models::Controller;

use crate::pipeline::resolve_bench;
use crate::GlobalArgs;

fn ranking_text(ranking: [Mode; 3]) -> String {
    ranking.map(|m| m.to_string()).join(" > ")
}

/// Probes the reference controller. Exit code 0 iff the observed priority
/// matches the configured one.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config, _) = resolve_bench(global)?;
    let configured = priority(&config.controller)?;
    let probe = probe_priority(Controller::new)?;

    let renderer = TerminalRenderer::new(global.color);
    if !global.quiet {
        for note in probe.notes() {
            print!("{}", renderer.render(&note));
        }
    }

    match probe.ranking() {
        Some(observed) if observed == configured => {
            println!("priority: {} (matches configuration)", ranking_text(observed));
            Ok(0)
        }
        Some(observed) => {
            println!(
                "priority: {} (configured: {})",
                ranking_text(observed),
                ranking_text(configured)
            );
            Ok(1)
        }
        None => {
            println!("priority: observations are not consistent with a strict order");
            Ok(1)
        }
    }
}
