// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Shortening: the cleanup pass run on a merged document.
//!
//! Fragments may carry commands split over several physical lines with a trailing `\`, and
//! blank or `#` comment lines for readability. Shortening joins every logical command back
//! into a single line and drops the filler, without reordering anything. A section left with
//! no lines disappears. Applying it twice gives the same result as applying it once.

use crate::document::Document;

/// Line continuation marker
pub const CONTINUATION: char = '\\';
/// Comment marker
pub const COMMENT: char = '#';

/// Shorten a document. See the module documentation.
#[must_use]
pub fn shorten(doc: &Document) -> Document {
    let mut out = Document::new();
    for (section, lines) in doc.sections() {
        out.extend(section, shorten_lines(lines));
    }
    out
}

/// Strip all trailing continuation markers. Returns the remaining text and whether the
/// logical line continues on the next physical line.
fn strip_continuation(line: &str) -> (&str, bool) {
    let mut body = line;
    let mut continues = false;
    while let Some(rest) = body.strip_suffix(CONTINUATION) {
        body = rest.trim_end();
        continues = true;
    }
    (body, continues)
}

fn emit(out: &mut Vec<String>, logical: String) {
    if !logical.is_empty() && !logical.starts_with(COMMENT) {
        out.push(logical);
    }
}

fn shorten_lines(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut pending: Option<String> = None;

    for line in lines.iter().map(|l| l.trim()) {
        if let Some(mut logical) = pending.take() {
            let (body, continues) = strip_continuation(line);
            if !body.is_empty() {
                if !logical.is_empty() {
                    logical.push(' ');
                }
                logical.push_str(body);
            }
            if continues {
                pending = Some(logical);
            } else {
                emit(&mut out, logical);
            }
            continue;
        }
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }
        let (body, continues) = strip_continuation(line);
        if continues {
            pending = Some(body.to_owned());
        } else {
            emit(&mut out, body.to_owned());
        }
    }
    // a dangling continuation at the end of a section just ends the command
    if let Some(logical) = pending {
        emit(&mut out, logical);
    }
    out
}
