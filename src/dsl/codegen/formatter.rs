//! Final pretty-printing of generated parser source
//!
//! The assembler hands syntactically valid but whitespace-irregular text to a
//! [`Formatter`]. [`BraceFormatter`] is the built-in one; [`CommandFormatter`] pipes the
//! text through an external program such as `prettier --parser typescript`.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to run formatter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("formatter `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("formatter `{program}` produced invalid UTF-8")]
    Encoding { program: String },
}

pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Leaves the text untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Formatter for Verbatim {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}

/// Re-indents by bracket nesting
///
/// Breaks lines after `{`, `[`, `;`, and after `,` directly inside `{` or `[`, and before
/// the matching closers. Parentheses never break or indent. Empty `{}` and `[]` stay
/// inline. String literals and comments are copied untouched. Runs of whitespace
/// collapse to one space, except that a newline at brace level is kept.
#[derive(Debug, Clone)]
pub struct BraceFormatter {
    indent: String,
}

impl Default for BraceFormatter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl BraceFormatter {
    pub fn new(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

impl Formatter for BraceFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut printer = Printer {
            out: String::with_capacity(source.len() * 2),
            stack: Vec::new(),
            indent: &self.indent,
            pending_space: false,
            line_start: true,
        };
        let chars: Vec<char> = source.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match c {
                '"' | '\'' | '`' => {
                    let end = string_end(&chars, i);
                    printer.word(&chars[i..end]);
                    i = end;
                    continue;
                }
                '/' if next == Some('/') => {
                    let end = chars[i..]
                        .iter()
                        .position(|&ch| ch == '\n')
                        .map_or(chars.len(), |p| i + p);
                    printer.word(&chars[i..end]);
                    printer.newline();
                    i = end;
                    continue;
                }
                '/' if next == Some('*') => {
                    let end = block_comment_end(&chars, i);
                    printer.word(&chars[i..end]);
                    i = end;
                    continue;
                }
                '\n' if printer.at_brace_level() => printer.newline(),
                c if c.is_whitespace() => printer.pending_space = true,
                '{' | '[' => {
                    let close = if c == '{' { '}' } else { ']' };
                    let after = skip_whitespace(&chars, i + 1);
                    if chars.get(after) == Some(&close) {
                        printer.word(&[c, close]);
                        i = after + 1;
                        continue;
                    }
                    printer.word(&[c]);
                    printer.stack.push(c);
                    printer.newline();
                }
                '}' | ']' => {
                    printer.stack.pop();
                    printer.newline();
                    printer.word(&[c]);
                }
                '(' => {
                    printer.word(&['(']);
                    printer.stack.push('(');
                    printer.pending_space = false;
                }
                ')' => {
                    printer.stack.pop();
                    printer.pending_space = false;
                    printer.word(&[')']);
                }
                ',' => {
                    printer.pending_space = false;
                    printer.word(&[',']);
                    if printer.at_brace_level() {
                        printer.newline();
                    } else {
                        printer.pending_space = true;
                    }
                }
                ';' => {
                    printer.pending_space = false;
                    printer.word(&[';']);
                    if printer.at_brace_level() {
                        printer.newline();
                    }
                }
                _ => printer.word(&[c]),
            }
            i += 1;
        }

        let mut out = printer.out.trim_end().to_string();
        out.push('\n');
        Ok(out)
    }
}

struct Printer<'a> {
    out: String,
    stack: Vec<char>,
    indent: &'a str,
    pending_space: bool,
    line_start: bool,
}

impl Printer<'_> {
    fn at_brace_level(&self) -> bool {
        !matches!(self.stack.last(), Some('('))
    }

    fn depth(&self) -> usize {
        self.stack.iter().filter(|&&c| c != '(').count()
    }

    fn word(&mut self, chars: &[char]) {
        if self.pending_space && !self.line_start {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.line_start = false;
        self.out.extend(chars);
    }

    fn newline(&mut self) {
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.depth() {
            self.out.push_str(self.indent);
        }
        self.pending_space = false;
        self.line_start = true;
    }
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    i
}

/// Index just past the string literal opening at `start`
fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn block_comment_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// Pipes source through an external program's stdin and reads stdout
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a shell-like command line on whitespace; no quoting support
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let spawn_error = |source| FormatError::Spawn {
            program: self.program.clone(),
            source,
        };
        debug!(program = %self.program, args = ?self.args, "running external formatter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| FormatError::Encoding {
            program: self.program.clone(),
        })
    }
}
