//! Integration and property tests for the lilgraph workspace.
//!
//! Everything lives under `tests/`; sample documents and expected outputs
//! live under `fixtures/`.
