//! Deterministic signals and payload builders shared by unit tests.
//!
//! Only compiled for tests. Integration tests under `tests/` carry their own
//! copy of the few helpers they need in `tests/common`.

pub mod containers;
pub mod signals;
