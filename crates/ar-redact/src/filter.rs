//! The redaction filter: an ordered rule list applied line by line.

use crate::rule::{Ipv4Mode, RedactionRule, RuleKind};
use std::collections::BTreeMap;

/// Result of redacting a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedLine {
    /// The rewritten line.
    pub output: String,
    /// Substitutions made, per rule kind.
    pub hits: BTreeMap<RuleKind, usize>,
}

impl RedactedLine {
    /// Total number of substitutions on this line.
    pub fn total_hits(&self) -> usize {
        self.hits.values().sum()
    }

    pub fn was_modified(&self) -> bool {
        self.total_hits() > 0
    }
}

/// Running substitution counts across many lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionStats {
    pub lines: usize,
    pub modified_lines: usize,
    pub hits: BTreeMap<RuleKind, usize>,
}

impl RedactionStats {
    pub fn record(&mut self, line: &RedactedLine) {
        self.lines += 1;
        if line.was_modified() {
            self.modified_lines += 1;
        }
        for (kind, count) in &line.hits {
            *self.hits.entry(*kind).or_insert(0) += count;
        }
    }

    pub fn merge(&mut self, other: &RedactionStats) {
        self.lines += other.lines;
        self.modified_lines += other.modified_lines;
        for (kind, count) in &other.hits {
            *self.hits.entry(*kind).or_insert(0) += count;
        }
    }

    pub fn total_hits(&self) -> usize {
        self.hits.values().sum()
    }
}

/// Sequential composition of redaction rules.
///
/// Rules run in order over each line; every rule sees the output of the
/// rules before it. An empty rule list is the identity.
#[derive(Debug, Clone)]
pub struct RedactionFilter {
    rules: Vec<RedactionRule>,
}

impl RedactionFilter {
    /// Filter with the four built-in rules and syntactic IPv4 matching.
    pub fn new() -> Self {
        Self::with_rules(RedactionRule::builtin(Ipv4Mode::Syntactic))
    }

    pub fn with_rules(rules: Vec<RedactionRule>) -> Self {
        Self { rules }
    }

    /// Filter that passes everything through.
    pub fn disabled() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Redact one line, reporting per-rule hit counts.
    pub fn redact_line(&self, line: &str) -> RedactedLine {
        let mut output = line.to_string();
        let mut hits = BTreeMap::new();
        for rule in &self.rules {
            let (next, count) = rule.apply(&output);
            if count > 0 {
                *hits.entry(rule.kind()).or_insert(0) += count;
            }
            output = next;
        }
        RedactedLine { output, hits }
    }

    /// Redact one line, returning only the text.
    pub fn redact(&self, line: &str) -> String {
        self.redact_line(line).output
    }

    /// Lazily redact a sequence of lines.
    pub fn redact_lines<'a, I>(&'a self, lines: I) -> RedactedLines<'a, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        RedactedLines {
            filter: self,
            inner: lines.into_iter(),
            stats: RedactionStats::default(),
        }
    }

    /// Redact a multi-line blob, preserving every line terminator.
    pub fn redact_text(&self, text: &str) -> (String, RedactionStats) {
        let mut stats = RedactionStats::default();
        let mut out = String::with_capacity(text.len());
        for chunk in text.split_inclusive('\n') {
            let (body, terminator) = split_terminator(chunk);
            let line = self.redact_line(body);
            stats.record(&line);
            out.push_str(&line.output);
            out.push_str(terminator);
        }
        (out, stats)
    }
}

impl Default for RedactionFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn split_terminator(chunk: &str) -> (&str, &str) {
    if let Some(body) = chunk.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = chunk.strip_suffix('\n') {
        (body, "\n")
    } else {
        (chunk, "")
    }
}

/// Iterator returned by [`RedactionFilter::redact_lines`].
pub struct RedactedLines<'a, I> {
    filter: &'a RedactionFilter,
    inner: I,
    stats: RedactionStats,
}

impl<I> RedactedLines<'_, I> {
    /// Counts for the lines yielded so far.
    pub fn stats(&self) -> &RedactionStats {
        &self.stats
    }
}

impl<I> Iterator for RedactedLines<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.inner.next()?;
        let redacted = self.filter.redact_line(line.as_ref());
        self.stats.record(&redacted);
        Some(redacted.output)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
