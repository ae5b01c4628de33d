//! Human-readable output for callers of the engine
//!
//! The engine returns data; whoever drives it decides what to print. A
//! `Reporter` is created by that caller and carries its own quiet and
//! debug switches.

use std::io::{self, Write};

use crate::inference::{PatternReport, Schema};

pub struct Reporter<W: Write> {
    out: W,
    quiet: bool,
    debug: bool,
}

impl Reporter<io::Stderr> {
    pub fn stderr(quiet: bool) -> Self {
        Self::new(io::stderr(), quiet)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            debug: false,
        }
    }

    /// Print score breakdown rows in pattern tables
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Progress line, suppressed when quiet
    pub fn status(&mut self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{}", message)
    }

    /// Ranked candidate table. Always printed: the caller asked for it.
    pub fn pattern_table(&mut self, patterns: &[PatternReport]) -> io::Result<()> {
        writeln!(self.out, "{} candidate patterns", patterns.len())?;
        for (rank, pattern) in patterns.iter().enumerate() {
            let score = match pattern.score {
                Some(score) => format!("{:8.2}", score),
                None => format!("{:>8}", "manual"),
            };
            let gate = if pattern.gated { "  [gated]" } else { "" };
            writeln!(
                self.out,
                "{:>3}. {} {:>5} items  depth {:>2}  {}{}",
                rank + 1,
                score,
                pattern.item_count,
                pattern.depth,
                pattern.selector,
                gate
            )?;

            if let Some(b) = pattern.breakdown.as_ref().filter(|_| self.debug) {
                writeln!(
                    self.out,
                    "       diversity {:.2}  count {:.2}  depth {:.2}  diversity+ {:.2}  children {:.2}  table {:.2}  anchor {:.2}",
                    b.diversity, b.count, b.depth, b.diversity_bonus, b.children, b.table, b.anchor
                )?;
            }
            for sample in &pattern.samples {
                writeln!(self.out, "       | {}", sample)?;
            }
        }
        Ok(())
    }

    /// One-screen summary of an inferred schema
    pub fn schema_summary(&mut self, schema: &Schema) -> io::Result<()> {
        writeln!(
            self.out,
            "container {}  ({} items, confidence {:.2})",
            schema.container_selector, schema.meta.item_count, schema.meta.confidence
        )?;
        for field in &schema.fields {
            writeln!(
                self.out,
                "  {:<24} {:<7} {:.2}  {}",
                field.name, field.field_type, field.confidence, field.selector
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
