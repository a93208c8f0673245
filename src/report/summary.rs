use std::io::Write;

use anyhow::Result;

use super::{BANNER_WIDTH, FORCE_SPIKE_RATIO};
use crate::data::detect::{
    self, HIGH_VVEL_THRESHOLD, LAUNCH_DELTA_THRESHOLD,
};
use crate::data::model::TelemetryLog;
use crate::data::stats::{max, mean, min};

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

/// Print summary statistics followed by the problem-detection block.
///
/// Print order is fixed: banner, time range, altitude, velocity, forces,
/// grounded, then detections (high velocity → force spikes → launch deltas).
pub fn print_summary(log: &TelemetryLog, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
    writeln!(out, "TELEMETRY SUMMARY")?;
    writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;

    let t = log.column("t")?;
    let t_min = min(t)?;
    let t_max = max(t)?;
    let mass = log.last_mass()?;
    let weight = log.weight()?;

    writeln!(out)?;
    writeln!(
        out,
        "Time range: {t_min:.2}s - {t_max:.2}s ({:.2}s total)",
        t_max - t_min
    )?;
    writeln!(out, "Samples: {}", log.len())?;
    writeln!(out, "Mass: {mass:.1} kg")?;
    writeln!(out, "Weight: {weight:.0} N")?;

    // Negative altitude is the "no raycast hit" sentinel, excluded from the
    // stats and counted separately.
    writeln!(out, "\n--- Altitude ---")?;
    let altitude = log.column("altitude")?;
    let valid_alt: Vec<f64> = altitude.iter().copied().filter(|&a| a > 0.0).collect();
    if !valid_alt.is_empty() {
        writeln!(out, "  Min (valid): {:.3} m", min(&valid_alt)?)?;
        writeln!(out, "  Max (valid): {:.3} m", max(&valid_alt)?)?;
        writeln!(out, "  Mean (valid): {:.3} m", mean(&valid_alt)?)?;
    }
    let no_raycast = altitude.iter().filter(|&&a| a < 0.0).count();
    writeln!(
        out,
        "  No raycast hit: {} samples ({:.1}%)",
        no_raycast,
        no_raycast as f64 / log.len() as f64 * 100.0
    )?;

    writeln!(out, "\n--- Velocity ---")?;
    let speed = log.column("speed")?;
    let max_speed = max(speed)?;
    writeln!(
        out,
        "  Max speed: {max_speed:.1} m/s ({:.1} km/h)",
        max_speed * 3.6
    )?;
    let v_vel = log.column("v_vel")?;
    writeln!(out, "  Max v_vel (up): {:.2} m/s", max(v_vel)?)?;
    writeln!(out, "  Min v_vel (down): {:.2} m/s", min(v_vel)?)?;

    writeln!(out, "\n--- Forces ---")?;
    let hover_mag = log.column("hover_mag")?;
    let max_hover = max(hover_mag)?;
    writeln!(out, "  Max hover force: {max_hover:.0} N")?;
    writeln!(out, "  Max hover/weight: {:.2}x", max_hover / weight)?;
    let grounded = log.column("grounded")?;
    let grounded_rows = log.filter_rows(|i| grounded[i] == 1.0);
    writeln!(
        out,
        "  Mean hover (grounded): {:.0} N",
        mean(grounded_rows.column("hover_mag")?)?
    )?;

    writeln!(out, "\n--- Grounded ---")?;
    let grounded_pct = grounded_rows.len() as f64 / log.len() as f64 * 100.0;
    writeln!(out, "  Time grounded: {grounded_pct:.1}%")?;

    writeln!(out, "\n--- PROBLEM DETECTION ---")?;

    let high_vvel = detect::find_high_velocity(log, HIGH_VVEL_THRESHOLD)?;
    if !high_vvel.is_empty() {
        writeln!(
            out,
            "  HIGH VERTICAL VELOCITY: {} samples with v_vel > {HIGH_VVEL_THRESHOLD:.0} m/s",
            high_vvel.len()
        )?;
        writeln!(
            out,
            "    First at t={:.3}s: v_vel={:.1} m/s, alt={:.2}m",
            high_vvel.value("t", 0)?,
            high_vvel.value("v_vel", 0)?,
            high_vvel.value("altitude", 0)?
        )?;
    }

    let force_spikes = detect::find_force_spikes(log, weight, FORCE_SPIKE_RATIO)?;
    if !force_spikes.is_empty() {
        writeln!(
            out,
            "  FORCE SPIKES: {} samples with hover > {FORCE_SPIKE_RATIO:.0}x weight",
            force_spikes.len()
        )?;
        let first_force = force_spikes.value("hover_mag", 0)?;
        writeln!(
            out,
            "    First at t={:.3}s: force={first_force:.0}N ({:.1}x weight)",
            force_spikes.value("t", 0)?,
            first_force / weight
        )?;
    }

    let launches = detect::find_launches(log, LAUNCH_DELTA_THRESHOLD)?;
    if !launches.is_empty() {
        writeln!(
            out,
            "  VELOCITY SPIKES: {} samples with v_vel delta > {LAUNCH_DELTA_THRESHOLD:.0} m/s",
            launches.len()
        )?;
    }

    Ok(())
}
