//! Textual rendering of analysis results.

use itertools::Itertools;

use crate::analysis::Outcome;
use crate::dispatch::TimeChart;

/// Render an outcome as `true` followed by a line with the comma-joined
/// preemption counts, or as `false`.
pub fn render(outcome: &Outcome) -> String {
    match (&outcome.schedulable, &outcome.preemptions) {
        (true, Some(counts)) => format!("true\n{}", counts.iter().join(",")),
        (true, None) => "true".to_string(),
        (false, _) => "false".to_string(),
    }
}

/// Render a time chart as one line per maximal run of the same
/// occupant, e.g. `[0, 1000) task 0` or `[7000, 8000) idle`.
pub fn render_time_chart(chart: &TimeChart) -> String {
    let runs = chart
        .as_slice()
        .iter()
        .enumerate()
        .group_by(|(_, occupant)| **occupant);
    let lines: Vec<String> = runs
        .into_iter()
        .map(|(occupant, run)| {
            let ticks: Vec<usize> = run.map(|(tick, _)| tick).collect();
            let start = ticks.first().copied().unwrap_or_default();
            let end = ticks.last().map_or(start, |t| t + 1);
            match occupant {
                Some(task) => format!("[{}, {}) task {}", start, end, task),
                None => format!("[{}, {}) idle", start, end),
            }
        })
        .collect();
    lines.join("\n")
}
