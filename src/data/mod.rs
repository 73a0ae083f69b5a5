/// Data layer: customer records, line validation, distance filtering and
/// output.
///
/// Architecture:
/// ```text
///  customers.txt (one JSON object per line)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split lines → validate → Vec<CustomerRecord> + diagnostics
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  great-circle distance ≤ radius, stable sort by user_id
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  one JSON object per line, original fields and key order
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod validate;
pub mod writer;
