/// Data layer: core types, loading, and anomaly detection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TelemetryLog
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ TelemetryLog  │  column-major samples, header order
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  detect   │  row predicates → filtered sub-logs
///   └──────────┘
/// ```

pub mod detect;
pub mod loader;
pub mod model;
pub mod stats;
