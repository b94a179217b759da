/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → EmployeeDataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ EmployeeDataset │  Vec<Employee>, widget bounds
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  FilterCriteria → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline │  KPIs + chart tables → DashboardView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  filtered rows → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod pipeline;
