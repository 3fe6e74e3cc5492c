/// Data layer: core types, loading, and row selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LineSet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  LineSet  │  Vec<ExcitationLine>, row boundaries, source unit
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ selection  │  keep the chosen snapshot rows
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod selection;
