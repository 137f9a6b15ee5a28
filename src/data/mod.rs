/// Data layer: core types, loading, and the view queries.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  Vec<Record>, country index, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  pure per-chart views: range / window /
///   └──────────┘  positivity / ranking / search
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod query;
