//! Utility macros for the compiler.
//!
//! - `MK_SPAN!` - Creates a Span between two byte offsets of one file
//! - `MK_TOKEN!` - Creates a Token instance

/// Creates a Span covering `$start..$end` in `$file`.
///
/// # Example
///
/// ```ignore
/// let span = MK_SPAN!(0, 3, Rc::clone(&file));
/// ```
#[macro_export]
macro_rules! MK_SPAN {
    ($start:expr, $end:expr, $file:expr) => {
        Span {
            start: Position($start as u32, Rc::clone(&$file)),
            end: Position($end as u32, Rc::clone(&$file)),
        }
    };
}

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}
