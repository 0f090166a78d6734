//! Integration tests for arranger-base
//!
//! Run with: cargo test --test tests_main

#[path = "helpers/mod.rs"]
mod helpers;

#[path = "parser/mod.rs"]
mod parser;

#[path = "arrange/mod.rs"]
mod arrange;
