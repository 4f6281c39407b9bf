//! Canonical layout of HCL text.
//!
//! The layout pass works line by line and never reorders or rewrites tokens:
//!
//! - indentation is two spaces per open `{`, `[` or `(`, with lines starting
//!   in a closing bracket dedented
//! - trailing whitespace is stripped
//! - runs of blank lines collapse to one, and blank lines directly after an
//!   opening bracket or before a closing bracket are dropped
//! - the file ends with exactly one newline
//!
//! Brackets inside strings, comments and `${ ... }` interpolations do not
//! count. Heredoc bodies and the continuation lines of `/* */` comments are
//! copied unchanged apart from trailing whitespace.

const INDENT: &str = "  ";

/// Format `content`; already canonical text is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use tgscaffold_cli::format::format_hcl;
///
/// let input = "inputs = {\n\n      region = \"us-east-1\"   \n\n\n   tags = {}\n}";
/// assert_eq!(
///     format_hcl(input),
///     "inputs = {\n  region = \"us-east-1\"\n\n  tags = {}\n}\n"
/// );
/// ```
#[must_use]
pub fn format_hcl(content: &str) -> String {
    let mut scanner = Scanner::default();
    let mut lines: Vec<Line> = Vec::new();

    for raw in content.lines() {
        let line = scanner.layout(raw);
        push_line(&mut lines, line);
    }

    while lines.last().is_some_and(|line| line.blank) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }

    let mut formatted = lines.into_iter().map(|line| line.text).collect::<Vec<_>>().join("\n");
    formatted.push('\n');
    formatted
}

fn push_line(lines: &mut Vec<Line>, line: Line) {
    if line.blank {
        let keep = lines.last().is_some_and(|previous| !previous.blank && !previous.opens);
        if keep {
            lines.push(line);
        }
        return;
    }
    if line.closes && lines.last().is_some_and(|previous| previous.blank) {
        lines.pop();
    }
    lines.push(line);
}

#[derive(Debug)]
struct Line {
    text: String,
    /// Collapsible blank line
    blank: bool,
    /// Ends with an opening bracket
    opens: bool,
    /// Starts with a closing bracket
    closes: bool,
}

impl Line {
    fn verbatim(raw: &str) -> Self {
        Self {
            text: raw.trim_end().to_string(),
            blank: false,
            opens: false,
            closes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    String,
    /// Open braces inside a `${ ... }` or `%{ ... }` sequence
    Interpolation(usize),
}

#[derive(Debug, Default)]
struct Scanner {
    depth: usize,
    in_block_comment: bool,
    heredoc: Option<String>,
}

impl Scanner {
    fn layout(&mut self, raw: &str) -> Line {
        if let Some(marker) = &self.heredoc {
            if raw.trim() == marker {
                self.heredoc = None;
            }
            return Line::verbatim(raw);
        }

        if self.in_block_comment {
            self.scan(raw);
            return Line::verbatim(raw);
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Line {
                text: String::new(),
                blank: true,
                opens: false,
                closes: false,
            };
        }

        let closers = leading_closers(trimmed);
        let indent = self.depth.saturating_sub(closers);
        let opens = self.scan(trimmed);

        Line {
            text: format!("{}{}", INDENT.repeat(indent), trimmed),
            blank: false,
            opens,
            closes: closers > 0,
        }
    }

    /// Update bracket depth and comment/heredoc state from one line.
    ///
    /// Returns whether the last code character is an opening bracket.
    fn scan(&mut self, line: &str) -> bool {
        let bytes = line.as_bytes();
        let mut stack: Vec<Mode> = Vec::new();
        let mut last_code: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            let c = bytes[i];
            let next = bytes.get(i + 1).copied();

            if self.in_block_comment {
                if c == b'*' && next == Some(b'/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            if stack.last() == Some(&Mode::String) {
                match c {
                    b'\\' => i += 1,
                    b'"' => {
                        stack.pop();
                        if stack.is_empty() {
                            last_code = Some(c);
                        }
                    }
                    b'$' | b'%' if next == Some(c) && bytes.get(i + 2) == Some(&b'{') => i += 2,
                    b'$' | b'%' if next == Some(b'{') => {
                        stack.push(Mode::Interpolation(1));
                        i += 1;
                    }
                    _ => {}
                }
                i += 1;
                continue;
            }

            match c {
                b'#' => break,
                b'/' if next == Some(b'/') => break,
                b'/' if next == Some(b'*') => {
                    self.in_block_comment = true;
                    i += 2;
                    continue;
                }
                b'"' => stack.push(Mode::String),
                b'<' if next == Some(b'<') && stack.is_empty() => {
                    if let Some(marker) = heredoc_marker(&line[i + 2..]) {
                        self.heredoc = Some(marker);
                        return false;
                    }
                }
                b'{' => match stack.last_mut() {
                    Some(Mode::Interpolation(open)) => *open += 1,
                    _ => self.depth += 1,
                },
                b'}' => match stack.last_mut() {
                    Some(Mode::Interpolation(open)) => {
                        *open -= 1;
                        if *open == 0 {
                            stack.pop();
                        }
                    }
                    _ => self.depth = self.depth.saturating_sub(1),
                },
                b'[' | b'(' if stack.is_empty() => self.depth += 1,
                b']' | b')' if stack.is_empty() => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }

            if stack.is_empty() && !c.is_ascii_whitespace() {
                last_code = Some(c);
            }
            i += 1;
        }

        matches!(last_code, Some(b'{' | b'[' | b'('))
    }
}

/// Number of closing brackets a trimmed line starts with.
fn leading_closers(trimmed: &str) -> usize {
    trimmed
        .bytes()
        .take_while(|c| matches!(c, b'}' | b']' | b')') || c.is_ascii_whitespace())
        .filter(|c| !c.is_ascii_whitespace())
        .count()
}

/// Marker of a heredoc opened by the text after `<<`, if the line ends there.
fn heredoc_marker(rest: &str) -> Option<String> {
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (marker, tail) = rest.split_at(end);

    let starts_ok = marker.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if starts_ok && tail.trim().is_empty() {
        Some(marker.to_string())
    } else {
        None
    }
}
