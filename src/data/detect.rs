use anyhow::Result;

use super::model::TelemetryLog;

// ---------------------------------------------------------------------------
// Anomaly detectors: row predicates → filtered sub-logs
// ---------------------------------------------------------------------------

/// Default step in `v_vel` between consecutive samples that flags a launch
/// (m/s per sample).
pub const LAUNCH_DELTA_THRESHOLD: f64 = 10.0;

/// Default sustained vertical velocity that flags an already-launched
/// vehicle (m/s).
pub const HIGH_VVEL_THRESHOLD: f64 = 15.0;

/// Default half-width of a context window around a time of interest (s).
pub const CONTEXT_WINDOW: f64 = 0.5;

/// Samples where vertical velocity jumps upward by more than `threshold`
/// relative to the previous sample (potential launches). The first sample
/// has no predecessor and never matches.
pub fn find_launches(log: &TelemetryLog, threshold: f64) -> Result<TelemetryLog> {
    let v_vel = log.column("v_vel")?;
    Ok(log.filter_rows(|i| i > 0 && v_vel[i] - v_vel[i - 1] > threshold))
}

/// Samples where vertical velocity exceeds `threshold` (already launched).
pub fn find_high_velocity(log: &TelemetryLog, threshold: f64) -> Result<TelemetryLog> {
    let v_vel = log.column("v_vel")?;
    Ok(log.filter_rows(|i| v_vel[i] > threshold))
}

/// Samples where hover force exceeds `ratio_threshold` times the vehicle
/// weight.
pub fn find_force_spikes(
    log: &TelemetryLog,
    weight: f64,
    ratio_threshold: f64,
) -> Result<TelemetryLog> {
    let hover_mag = log.column("hover_mag")?;
    Ok(log.filter_rows(|i| hover_mag[i] > weight * ratio_threshold))
}

/// Samples whose `t` lies in `[time - window, time + window]`, bounds
/// inclusive.
pub fn get_context(log: &TelemetryLog, time: f64, window: f64) -> Result<TelemetryLog> {
    let t = log.column("t")?;
    Ok(log.filter_rows(|i| t[i] >= time - window && t[i] <= time + window))
}
