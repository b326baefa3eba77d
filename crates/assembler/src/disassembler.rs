//! Disassembler: listing → canonical text.
//!
//! One `method` block per method, instructions indented by two spaces,
//! blank line between blocks, no comments.

use jstep_common::Listing;
use std::fmt::Write;

/// Disassemble a listing into canonical text.
///
/// The output is guaranteed to reassemble to an equal listing
/// (`assemble(&disassemble(listing)) == listing`).
pub fn disassemble(listing: &Listing) -> String {
    let mut out = String::new();
    for (i, method) in listing.methods.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String cannot fail.
        let _ = writeln!(out, "method {}", method.id);
        for instruction in &method.code {
            let _ = writeln!(out, "  {instruction}");
        }
        out.push_str("end\n");
    }
    out
}
