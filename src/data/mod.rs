/// Data layer: core types, loading, normalization, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  loader   │────▶│ citations  │  "Citations Per Year" text → year map
///   └──────────┘      └───────────┘
///        │  Table + sentinel columns
///        ▼
///   ┌────────────────────────────┐
///   │ PublicationSet / AuthorSet  │  held in a DatasetCache
///   └────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌─────────┐
///   │  filter   │───▶│  stats   │  year range → indices → per-year aggregates
///   └──────────┘     └─────────┘
/// ```

pub mod cache;
pub mod citations;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
