//! Purpose: Library crate behind the `csvsift` CLI and its tests.
//! Exports: `core` (table model, expression parsing, filter/order/aggregate stages, loader, errors).
//! Role: Everything testable without spawning the binary lives here.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod core;
