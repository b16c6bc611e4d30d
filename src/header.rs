// https://www.rfc-editor.org/rfc/rfc5322#section-2.2

use crate::errors::{HeaderError, Result};

/// How a field value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderFormat {
    /// Text as stored, never MIME-encoded.
    #[default]
    Raw,
    /// Wire-ready text: non-ASCII parts are turned into encoded-words.
    Encoded,
}

/// Behaviour shared by every header field type.
pub trait Header {
    /// Build the field from a raw `Name: value` line.
    fn parse(line: &str) -> Result<Self>
    where
        Self: Sized;

    fn field_name(&self) -> &'static str;

    fn field_value(&self, format: HeaderFormat) -> String;

    fn encoding(&self) -> &str;

    /// The full wire-ready header line.
    fn serialize(&self) -> String {
        format!(
            "{}: {}",
            self.field_name(),
            self.field_value(HeaderFormat::Encoded)
        )
    }
}

/// Split a header line at its first colon into name and value.
///
/// One space after the colon is dropped from the value.
pub fn split_header_line(line: &str) -> Result<(&str, &str)> {
    let (name, value) = line.split_once(':').ok_or_else(|| {
        HeaderError::Parse(format!("Expected ':' separating name and value in {:?}", line))
    })?;

    if name.is_empty() {
        return Err(HeaderError::Parse(format!(
            "Missing header field name in {:?}",
            line
        )));
    }

    if let Some(c) = name.chars().find(|c| !is_field_name_char(*c)) {
        return Err(HeaderError::Parse(format!(
            "Invalid character {:?} in header field name '{}'",
            c, name
        )));
    }

    let value = value.strip_prefix(' ').unwrap_or(value);
    if !is_valid_value(value) {
        return Err(HeaderError::Parse(format!(
            "Invalid line break in value of header field '{}'",
            name
        )));
    }

    Ok((name, value))
}

/// Undo header folding: every CRLF followed by a space or tab is removed, the whitespace stays.
pub fn unfold(line: &str) -> String {
    let mut unfolded = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(i) = rest.find("\r\n") {
        unfolded.push_str(&rest[..i]);
        let after = &rest[i + 2..];
        if !after.starts_with([' ', '\t']) {
            unfolded.push_str("\r\n");
        }
        rest = after;
    }

    unfolded.push_str(rest);
    unfolded
}

// 1*<any CHAR, excluding CTLs, SPACE, and ":">
fn is_field_name_char(c: char) -> bool {
    c.is_ascii_graphic() && c != ':'
}

// CR and LF may only appear together, as a fold: CRLF followed by SP or HTAB
fn is_valid_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\r' => match (bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) {
                (Some(b'\n'), Some(b' ' | b'\t')) => i += 3,
                _ => return false,
            },
            b'\n' => return false,
            _ => i += 1,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_colon() {
        let (name, value) = split_header_line("Sender: Bob <bob@example.com>").unwrap();
        assert_eq!("Sender", name);
        assert_eq!("Bob <bob@example.com>", value);

        let (name, value) = split_header_line("X-Time: 12:30").unwrap();
        assert_eq!("X-Time", name);
        assert_eq!("12:30", value);
    }

    #[test]
    fn strips_exactly_one_space() {
        assert_eq!("  x", split_header_line("Sender:   x").unwrap().1);
        assert_eq!("x", split_header_line("Sender:x").unwrap().1);
        assert_eq!("", split_header_line("Sender: ").unwrap().1);
    }

    #[test]
    fn missing_colon_or_name() {
        assert!(matches!(
            split_header_line("Sender bob@example.com"),
            Err(HeaderError::Parse(_))
        ));
        assert!(matches!(
            split_header_line(": bob@example.com"),
            Err(HeaderError::Parse(_))
        ));
    }

    #[test]
    fn invalid_name_characters() {
        assert!(split_header_line("Sen der: x").is_err());
        assert!(split_header_line("Sender\t: x").is_err());
        assert!(split_header_line("Sénder: x").is_err());
    }

    #[test]
    fn line_breaks_in_value() {
        assert!(split_header_line("Sender: Bob\r\n <bob@example.com>").is_ok());
        assert!(split_header_line("Sender: Bob\r\n\tSmith").is_ok());
        assert!(split_header_line("Sender: Bob\r\nBcc: eve@example.com").is_err());
        assert!(split_header_line("Sender: Bob\n <bob@example.com>").is_err());
        assert!(split_header_line("Sender: Bob\r").is_err());
    }

    #[test]
    fn unfolds_continuation_lines() {
        assert_eq!("Sender: Bob Smith", unfold("Sender: Bob\r\n Smith"));
        assert_eq!("Sender:\tBob", unfold("Sender:\r\n\tBob"));
        assert_eq!("a  b", unfold("a\r\n \r\n b"));
        assert_eq!("Sender: Bob", unfold("Sender: Bob"));
        assert_eq!("Sender: Bob\r\nBcc: x", unfold("Sender: Bob\r\nBcc: x"));
    }
}
