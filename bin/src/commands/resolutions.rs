//! Resolutions command implementation.

use chartmill_lib::prelude::*;

/// List common resolution codes and chart types.
pub(crate) fn list_resolutions() {
    println!("{:<8} {:<8} {:>14}", "CODE", "KIND", "BAR SIZE");
    println!("{}", "-".repeat(32));

    for resolution in Resolution::common() {
        let (kind, size) = match (resolution.ticks_per_bar(), resolution.seconds()) {
            (Some(ticks), _) => ("ticks", format!("{ticks} ticks")),
            (None, Some(secs)) => ("time", format!("{secs} s")),
            (None, None) => ("time", String::new()),
        };
        println!("{:<8} {:<8} {:>14}", resolution.code(), kind, size);
    }

    println!("\nOther tick counts use count / 20 ticks per bar, clamped to 5..=50.");
    println!(
        "Chart types: {}",
        ChartType::all()
            .iter()
            .map(ChartType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
}
