// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between the input file and the trainer:
//
//   delimited file
//       │
//       ▼
//   DelimitedLoader   → parses rows into a Dataset
//       │
//       ▼
//   split_train_test  → seeded train/test index partition
//       │
//       ▼
//   Dataset::subset   → feature/label pairs for each side
//
// Reference: csv and rand crate documentation

/// Reads delimited numeric files into a Dataset
pub mod loader;

/// Deterministic train/test splitting
pub mod splitter;
