//! Property-based law tests.
//!
//! Run with: `cargo test --test property`
