//! Indentation-aware line writer shared by the header and source renderers

use std::fmt::{self, Write};

#[derive(Debug)]
pub struct Emitter {
    output: String,
    indent_size: usize,
    level: usize,
}

impl Emitter {
    pub fn new(indent_size: usize) -> Self {
        Self {
            output: String::new(),
            indent_size,
            level: 0,
        }
    }

    fn indent(&self) -> String {
        " ".repeat(self.level * self.indent_size)
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let indent = self.indent();
        writeln!(self.output, "{}{}", indent, args)
    }

    pub fn blank(&mut self) -> fmt::Result {
        writeln!(self.output)
    }

    pub fn push(&mut self) {
        self.level += 1;
    }

    pub fn pop(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Write `line` then indent everything after it
    pub fn open(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.line(args)?;
        self.push();
        Ok(())
    }

    /// Dedent then write `line`
    pub fn close(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.pop();
        self.line(args)
    }

    pub fn finish(self) -> String {
        self.output
    }
}
