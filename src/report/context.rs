use std::io::Write;

use anyhow::Result;

use super::{BANNER_WIDTH, FORCE_SPIKE_RATIO};
use crate::data::detect::{find_force_spikes, find_high_velocity, get_context, HIGH_VVEL_THRESHOLD};
use crate::data::model::TelemetryLog;

// ---------------------------------------------------------------------------
// Context reports: row dumps around times of interest
// ---------------------------------------------------------------------------

/// Half-width of the window printed around a detected problem (s).
const PROBLEM_WINDOW: f64 = 0.3;

/// Columns shown in a problem-context table.
const CONTEXT_COLUMNS: [&str; 5] = ["t", "altitude", "v_vel", "grounded", "hover_mag"];

/// Columns the around-time dump prefers, intersected with what the log has.
const PREFERRED_COLUMNS: [&str; 7] = [
    "t",
    "altitude",
    "v_vel",
    "grounded",
    "hover_mag",
    "pitch_deg",
    "speed",
];

/// Cell width of the fixed-column tables.
const COLUMN_WIDTH: usize = 11;

/// Print the context window around the first match of each problem
/// detector (high vertical velocity, then force spikes).
pub fn print_problem_context(log: &TelemetryLog, out: &mut impl Write) -> Result<()> {
    let weight = log.weight()?;

    let high_vvel = find_high_velocity(log, HIGH_VVEL_THRESHOLD)?;
    if !high_vvel.is_empty() {
        let first_time = high_vvel.value("t", 0)?;
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
        writeln!(out, "CONTEXT: First high v_vel at t={first_time:.3}s")?;
        writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
        let context = get_context(log, first_time, PROBLEM_WINDOW)?;
        render_table(&context, &CONTEXT_COLUMNS, out)?;
    }

    let force_spikes = find_force_spikes(log, weight, FORCE_SPIKE_RATIO)?;
    if !force_spikes.is_empty() {
        let first_time = force_spikes.value("t", 0)?;
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
        writeln!(out, "CONTEXT: First force spike at t={first_time:.3}s")?;
        writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
        let context = get_context(log, first_time, PROBLEM_WINDOW)?;
        render_table(&context, &CONTEXT_COLUMNS, out)?;
    }

    Ok(())
}

/// Print every sample whose `t` falls within `window` of `time`, showing
/// the preferred columns the log actually has.
pub fn print_around_time(
    log: &TelemetryLog,
    time: f64,
    window: f64,
    out: &mut impl Write,
) -> Result<()> {
    let context = get_context(log, time, window)?;

    if context.is_empty() {
        writeln!(out, "No data found around t={time}s")?;
        return Ok(());
    }

    writeln!(out, "Telemetry around t={time}s (±{window}s):")?;
    writeln!(out)?;

    let available: Vec<&str> = PREFERRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| context.has_column(c))
        .collect();
    render_table(&context, &available, out)
}

/// Fixed-width table: one header row, then one line per sample.
fn render_table(log: &TelemetryLog, columns: &[&str], out: &mut impl Write) -> Result<()> {
    for name in columns {
        write!(out, "{name:>COLUMN_WIDTH$}")?;
    }
    writeln!(out)?;

    for row in 0..log.len() {
        for name in columns {
            write!(out, "{:>COLUMN_WIDTH$.3}", log.value(name, row)?)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn log(columns: &[(&str, &[f64])]) -> TelemetryLog {
        let names = columns.iter().map(|(n, _)| n.to_string()).collect();
        let map: BTreeMap<String, Vec<f64>> = columns
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_vec()))
            .collect();
        TelemetryLog::from_columns(names, map).unwrap()
    }

    #[test]
    fn around_time_reports_empty_window() {
        let lg = log(&[("t", &[0.0, 0.02]), ("v_vel", &[0.0, 0.1])]);
        let mut buf = Vec::new();
        print_around_time(&lg, 99.0, 0.5, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No data found around t=99s"), "got:\n{text}");
    }

    #[test]
    fn around_time_intersects_preferred_columns() {
        // No pitch_deg or speed columns: the table must skip them.
        let lg = log(&[
            ("t", &[8.0, 8.5, 9.0]),
            ("altitude", &[1.0, 1.2, 1.1]),
            ("v_vel", &[0.0, 0.3, -0.1]),
            ("grounded", &[1.0, 1.0, 1.0]),
            ("hover_mag", &[11772.0, 11800.0, 11750.0]),
        ]);
        let mut buf = Vec::new();
        print_around_time(&lg, 8.5, 0.5, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Telemetry around t=8.5s"), "got:\n{text}");
        assert!(text.contains("hover_mag"), "got:\n{text}");
        assert!(!text.contains("pitch_deg"), "got:\n{text}");
        // Window [8.0, 9.0] keeps all three samples.
        assert_eq!(text.lines().count(), 2 + 1 + 3, "got:\n{text}");
    }

    #[test]
    fn problem_context_prints_window_around_first_match() {
        let lg = log(&[
            ("t", &[8.0, 8.25, 8.5, 8.75, 9.5]),
            ("altitude", &[1.0, 1.2, 2.0, 4.0, 9.0]),
            ("v_vel", &[0.0, 2.0, 16.0, 17.0, 12.0]),
            ("grounded", &[1.0, 1.0, 0.0, 0.0, 0.0]),
            ("hover_mag", &[11772.0, 11800.0, 12000.0, 11900.0, 11850.0]),
            ("mass", &[1200.0; 5]),
        ]);
        let mut buf = Vec::new();
        print_problem_context(&lg, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("CONTEXT: First high v_vel at t=8.500s"), "got:\n{text}");
        // ±0.3s around 8.5 keeps 8.25, 8.5 and 8.75 but not 8.0 or 9.5.
        assert!(text.contains("8.250"), "got:\n{text}");
        assert!(text.contains("8.750"), "got:\n{text}");
        assert!(!text.contains("9.500"), "got:\n{text}");
        // Hover never reaches 5x weight, so no force-spike section.
        assert!(!text.contains("force spike"), "got:\n{text}");
    }

    #[test]
    fn problem_context_silent_when_nothing_detected() {
        let lg = log(&[
            ("t", &[0.0, 0.02]),
            ("altitude", &[1.0, 1.0]),
            ("v_vel", &[0.0, 0.1]),
            ("grounded", &[1.0, 1.0]),
            ("hover_mag", &[11772.0, 11772.0]),
            ("mass", &[1200.0, 1200.0]),
        ]);
        let mut buf = Vec::new();
        print_problem_context(&lg, &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
