//! `drumbench list`: prints the phase catalogue.

use drumbench_harness::Phase;

use crate::GlobalArgs;

/// One catalogue line: name, description, and whether images are needed.
fn describe(phase: Phase) -> String {
    let images = if phase.needs_images() { " [images]" } else { "" };
    format!("{:<16} {}{images}", phase.name(), phase.description())
}

/// Prints every phase in run order.
pub fn run(_global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for phase in Phase::ALL {
        println!("{}", describe(phase));
    }
    Ok(0)
}
