// ABOUTME: Output formatting helpers for paddock-cli
// ABOUTME: Prints command results as pretty JSON on stdout, keeping logs on stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use anyhow::{Context, Result};
use serde::Serialize;

/// Print any serializable result as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}

/// Print a confirmation for operations that return nothing
pub fn print_deleted(kind: &str, id: &impl std::fmt::Display) -> Result<()> {
    print_json(&serde_json::json!({ "deleted": kind, "id": id.to_string() }))
}
