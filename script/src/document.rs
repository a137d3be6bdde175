// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The script document and its merge algebra

use std::fmt::Display;
use std::ops::AddAssign;

use ordermap::OrderMap;
use tracing::trace;

use crate::command::Command;

/// Ordered mapping from section (menu path) to the command lines replayed under it.
///
/// Sections keep the order in which they were first seen, and lines within a section are
/// never reordered. A section is only present if it has at least one line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    sections: OrderMap<String, Vec<String>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line to a section
    pub fn push(&mut self, section: &str, line: impl Into<String>) {
        self.lines_mut(section).push(line.into());
    }

    /// Render a [`Command`] and append it to a section
    pub fn push_cmd(&mut self, section: &str, cmd: &Command) {
        self.push(section, cmd.to_string());
    }

    /// Append several lines to a section. Nothing is created if there are no lines.
    pub fn extend<I, S>(&mut self, section: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines = lines.into_iter().map(Into::into).peekable();
        if lines.peek().is_some() {
            self.lines_mut(section).extend(lines);
        }
    }

    fn lines_mut(&mut self, section: &str) -> &mut Vec<String> {
        self.sections.entry(section.to_owned()).or_default()
    }

    /// The lines of a section, if present
    #[must_use]
    pub fn section(&self, section: &str) -> Option<&[String]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// All sections with their lines, in document order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(section, lines)| (section.as_str(), lines.as_slice()))
    }

    /// Every line with its section, in document order
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections().flat_map(|(section, lines)| {
            lines.iter().map(move |line| (section, line.as_str()))
        })
    }

    /// The section names, in document order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn num_lines(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Append the sections of `other` after ours, preserving the order of both
    fn append(&mut self, other: &Document) {
        for (section, lines) in other.sections() {
            self.extend(section, lines.iter().cloned());
        }
    }
}

/// Merge fragments into a new [`Document`].
///
/// Sections appear in the order they are first seen across the fragments, and the lines of a
/// section are the concatenation of that section's lines in every fragment, in the order the
/// fragments are given. No fragment is modified. Merging nothing gives the empty document.
#[must_use]
pub fn merge<'a, I>(fragments: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut merged = Document::new();
    let mut count = 0usize;
    for fragment in fragments {
        merged.append(fragment);
        count += 1;
    }
    trace!(
        "Merged {count} fragments into {} sections",
        merged.num_sections()
    );
    merged
}

impl AddAssign<&Document> for Document {
    fn add_assign(&mut self, rhs: &Document) {
        self.append(rhs);
    }
}
impl AddAssign<Document> for Document {
    fn add_assign(&mut self, rhs: Document) {
        if self.is_empty() {
            *self = rhs;
        } else {
            self.append(&rhs);
        }
    }
}

/// Renders the document as a RouterOS script: each section path on its own line followed by
/// the section's commands.
impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (section, lines) in &self.sections {
            writeln!(f, "{section}")?;
            for line in lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(entries: &[(&str, &str)]) -> Document {
        let mut doc = Document::new();
        for (section, line) in entries {
            doc.push(section, *line);
        }
        doc
    }

    /// Build a document from fuzzer input: few section names so that fragments overlap
    fn generated(entries: &[(u8, u8)]) -> Document {
        let mut doc = Document::new();
        for (section, line) in entries {
            doc.push(&format!("/s{}", section % 4), format!("add n={line}"));
        }
        doc
    }

    #[test]
    fn test_merge_concatenates_in_argument_order() {
        let a = fragment(&[("/ip route", "a1"), ("/ip pool", "a2")]);
        let b = fragment(&[("/ip firewall mangle", "b1"), ("/ip route", "b2")]);
        let c = fragment(&[("/ip pool", "c1"), ("/ip route", "c2")]);

        let merged = merge([&a, &b, &c]);
        let names: Vec<_> = merged.section_names().collect();
        assert_eq!(names, vec!["/ip route", "/ip pool", "/ip firewall mangle"]);
        assert_eq!(
            merged.section("/ip route"),
            Some(["a1", "b2", "c2"].map(String::from).as_slice())
        );
        assert_eq!(
            merged.section("/ip pool"),
            Some(["a2", "c1"].map(String::from).as_slice())
        );
        // inputs untouched
        assert_eq!(a.num_lines(), 2);
        assert_eq!(b.num_lines(), 2);
    }

    #[test]
    fn test_merge_nothing_is_empty() {
        let merged = merge(std::iter::empty());
        assert!(merged.is_empty());
        assert_eq!(merged.num_sections(), 0);
        assert_eq!(merged.to_string(), "");
    }

    #[test]
    fn test_empty_sections_are_never_created() {
        let mut doc = Document::new();
        doc.extend("/ip route", Vec::<String>::new());
        assert!(doc.is_empty());

        let merged = merge([&Document::new(), &doc, &Document::new()]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_duplicate_lines_are_kept() {
        let masquerade = "add action=masquerade chain=srcnat out-interface-list=\"WAN\"";
        let a = fragment(&[("/ip firewall nat", masquerade)]);
        let b = fragment(&[("/ip firewall nat", masquerade)]);
        let merged = merge([&a, &b]);
        assert_eq!(merged.section("/ip firewall nat").map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_add_assign_matches_merge() {
        let a = fragment(&[("/x", "1"), ("/y", "2")]);
        let b = fragment(&[("/y", "3"), ("/z", "4")]);
        let mut acc = Document::new();
        acc += &a;
        acc += b.clone();
        assert_eq!(acc, merge([&a, &b]));
    }

    #[test]
    fn test_lines() {
        let doc = fragment(&[("/a", "1"), ("/b", "2"), ("/a", "3")]);
        let lines: Vec<_> = doc.lines().collect();
        assert_eq!(lines, vec![("/a", "1"), ("/a", "3"), ("/b", "2")]);
    }

    #[test]
    fn test_display() {
        let doc = fragment(&[("/ip pool", "add name=\"p\""), ("/ip route", "add x=1")]);
        assert_eq!(doc.to_string(), "/ip pool\nadd name=\"p\"\n/ip route\nadd x=1\n");
    }

    #[test]
    fn test_merge_associativity() {
        type Input = (Vec<(u8, u8)>, Vec<(u8, u8)>, Vec<(u8, u8)>);
        bolero::check!().with_type().for_each(|(a, b, c): &Input| {
            let (a, b, c) = (generated(a), generated(b), generated(c));
            let flat = merge([&a, &b, &c]);
            let left = merge([&merge([&a, &b]), &c]);
            let right = merge([&a, &merge([&b, &c])]);
            assert_eq!(flat, left);
            assert_eq!(flat, right);
            assert_eq!(flat.num_lines(), a.num_lines() + b.num_lines() + c.num_lines());
        });
    }
}
