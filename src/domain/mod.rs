// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// pipeline works on.
//
// Rules for this layer:
//   - NO file I/O
//   - NO linear algebra (that's Layer 5)
//   - Only data types, invariants and the collaborator traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Numeric rows with the label in the last column
pub mod dataset;

// Train/test row-index partition
pub mod split;

// The fitted ridge regression model
pub mod model;

// Pipeline state machine and run status
pub mod state;

// Error taxonomy shared by every layer
pub mod error;

// DataSource and RunRecorder abstractions
pub mod traits;
