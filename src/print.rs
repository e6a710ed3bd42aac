use once_cell::sync::Lazy;
use std::env;
use std::fmt;

pub const BODY_PRINT_LIMIT: usize = 10_000;

static DEFAULT_BODY_PRINT_LIMIT: Lazy<BodyPrintLimit> = Lazy::new(|| {
    match env::var("MOCKWIRE_BODY_PRINT_LIMIT")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
    {
        Some(limit) => BodyPrintLimit::Limited(limit),
        None => BodyPrintLimit::Limited(BODY_PRINT_LIMIT),
    }
});

/// Specifies limitations on printing bodies when logging requests and responses or when an
/// assertion fails. Some bodies may be too large to reasonably print.
///
/// The default is read once from the `MOCKWIRE_BODY_PRINT_LIMIT` environment variable (a number
/// of bytes) and falls back to [`BODY_PRINT_LIMIT`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyPrintLimit {
    /// Maximum length of a body to print in bytes.
    Limited(usize),
    /// There is no limit to the size of a body that may be printed.
    Unlimited,
}

impl Default for BodyPrintLimit {
    fn default() -> Self {
        *DEFAULT_BODY_PRINT_LIMIT
    }
}

pub(crate) fn print_body(
    mut buffer: impl fmt::Write,
    body: &[u8],
    limit: BodyPrintLimit,
) -> fmt::Result {
    if body.is_empty() {
        return writeln!(buffer, "<<empty body>>");
    }
    match limit {
        BodyPrintLimit::Limited(limit) if body.len() > limit => {
            // Back off a few bytes at most, looking for a char boundary.
            for end_byte in (limit.saturating_sub(3)..=limit).rev() {
                if let Ok(truncated) = std::str::from_utf8(&body[..end_byte]) {
                    writeln!(buffer, "{}", truncated)?;
                    return writeln!(
                        buffer,
                        "We truncated the body because it was too large: {} bytes (limit: {} bytes)",
                        body.len(),
                        limit
                    );
                }
            }
            writeln!(
                buffer,
                "Body is likely binary (invalid utf-8) size is {} bytes",
                body.len()
            )
        }
        _ => {
            if let Ok(body) = std::str::from_utf8(body) {
                writeln!(buffer, "{}", body)
            } else {
                writeln!(
                    buffer,
                    "Body is likely binary (invalid utf-8) size is {} bytes",
                    body.len()
                )
            }
        }
    }
}

/// Shift every line of `text` two spaces to the right.
pub(crate) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
