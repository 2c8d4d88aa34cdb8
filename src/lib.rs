#![allow(clippy::module_inception)]

use std::{fmt::Write, path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

/// Byte offset into a source file, paired with the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Finds the line containing `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` inside that line. A position at the very end of the source
/// (where the EOF token lives) maps onto the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // EOF position: point just past the last line
    let last = source.split_inclusive('\n').last().unwrap_or("");
    let line_number = line_number.saturating_sub(1).max(1);
    Some((line_number, last.to_string(), last.trim_end_matches('\n').len()))
}

pub fn display_error(error: &Error, file: &Path, source: &str) {
    eprint!("{}", render_error(error, file, source));
}

/// Renders an error report with the offending line and a caret under the
/// error's column.
pub fn render_error(error: &Error, file: &Path, source: &str) -> String {
    /*
        Error: UnexpectedToken (expected `return`, found `}`)
        -> add.lc
           |
         1 | f(a,b){ }
           | --------^
    */

    let mut report = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(report, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(
            report,
            "Error: {} ({})",
            error.get_error_name(),
            error.get_tip()
        );
    }
    let _ = writeln!(report, "-> {}", file.as_os_str().to_string_lossy());

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return report;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(report, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(report, "{} | {}", line_string, line_text_removed.trim_end());

    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |prefix| prefix.chars().count());
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(report, "{:>padding$} {:->arrows$}", "|", "^");
    report
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
