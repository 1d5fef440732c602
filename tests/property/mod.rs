// Copyright 2026 Cowboy AI, LLC.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify
//! invariants of record resolution and statement compilation.

mod resolution;
mod statements;
