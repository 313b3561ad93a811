// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Coordinates the other layers to accomplish one training run.
//
// Rules for this layer:
//   - No linear algebra here (Layer 5)
//   - No argument parsing here (Layer 1)
//   - No direct file formats here (Layers 4 and 6)
//   - Only workflow coordination and the run state machine
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Load → Split → Train → Evaluate → Record
pub mod train_use_case;
