//! Command line parser
//!
//! Simple split on whitespace, max 3 arguments. The raw text after each
//! argument stays reachable so values may contain spaces.

/// Parsed command with up to 3 arguments
#[derive(Debug, Clone)]
pub struct ParsedCommand<'a> {
    /// The command name (first token)
    pub command: &'a str,
    /// Up to 3 arguments
    pub args: [Option<&'a str>; 3],
    line: &'a str,
}

impl<'a> ParsedCommand<'a> {
    /// Create empty command
    pub const fn empty() -> Self {
        Self {
            command: "",
            args: [None, None, None],
            line: "",
        }
    }

    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied().flatten()
    }

    /// Argument `idx` and everything after it, trailing whitespace removed.
    pub fn rest(&self, idx: usize) -> Option<&'a str> {
        let arg = self.arg(idx)?;
        // Arguments are subslices of `line`.
        let start = arg.as_ptr() as usize - self.line.as_ptr() as usize;
        Some(self.line[start..].trim_end())
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut parts = line.split_whitespace();

    let command = parts.next().unwrap_or("");

    let mut args = [None, None, None];
    for (i, arg) in parts.take(3).enumerate() {
        args[i] = Some(arg);
    }

    ParsedCommand {
        command,
        args,
        line,
    }
}
