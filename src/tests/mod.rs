// src/tests/mod.rs

//! Tests for _ttlib_.
//!
//! Tests are placed at `src/tests/`, inside the `ttlib`. This is a
//! reasonable trade-off of separation and access: tests placed at
//! top-level path `tests/` do not have crate-internal visibility, which
//! in practice often makes tests difficult or impossible to implement.

pub mod common;
pub mod windowlocator_tests;
