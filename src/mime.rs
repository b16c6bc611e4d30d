//! RFC 2047 encoded-words: lenient decoding and encoding of header text.

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static ENCODED_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"=\?[^?\s]+\?[QqBb]\?[^?\s]*\?=").expect("encoded-word pattern must compile")
});

/// Longest encoded-word RFC 2047 allows.
pub const MAX_WORD_LEN: usize = 75;

/// Decode every encoded-word in `text`.
///
/// Never fails: words that cannot be decoded are kept literally and the rest of the text is
/// still decoded.
pub fn decode(text: &str) -> String {
    if !text.contains("=?") {
        return text.to_string();
    }

    match rfc2047_decoder::decode(text.as_bytes()) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!("cannot decode {:?} as a whole ({}), decoding word by word", text, err);
            decode_words(text)
        }
    }
}

fn decode_words(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut last = 0;
    let mut previous_was_word = false;

    for word in ENCODED_WORD.find_iter(text) {
        let gap = &text[last..word.start()];
        last = word.end();

        match rfc2047_decoder::decode(word.as_str().as_bytes()) {
            Ok(plain) if plain != word.as_str() => {
                // whitespace between two adjacent encoded-words is not part of the text
                if !(previous_was_word && is_linear_whitespace(gap)) {
                    decoded.push_str(gap);
                }
                decoded.push_str(&plain);
                previous_was_word = true;
            }
            result => {
                if let Err(err) = result {
                    debug!("keeping malformed encoded-word {:?}: {}", word.as_str(), err);
                }
                decoded.push_str(gap);
                decoded.push_str(word.as_str());
                previous_was_word = false;
            }
        }
    }

    decoded.push_str(&text[last..]);
    decoded
}

fn is_linear_whitespace(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Encode `text` as encoded-words in `charset` with the default settings.
pub fn encode(text: &str, charset: &str) -> String {
    MimeEncoder::new(charset).encode(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingScheme {
    /// The "Q" (quoted-printable like) encoding.
    #[default]
    Q,
    /// The "B" (base64) encoding.
    B,
}

impl EncodingScheme {
    fn letter(self) -> char {
        match self {
            EncodingScheme::Q => 'Q',
            EncodingScheme::B => 'B',
        }
    }

    fn encoded_len(self, bytes: &[u8]) -> usize {
        match self {
            EncodingScheme::Q => bytes
                .iter()
                .map(|b| if is_q_literal(*b) { 1 } else { 3 })
                .sum(),
            EncodingScheme::B => (bytes.len() + 2) / 3 * 4,
        }
    }

    fn encode_bytes(self, bytes: &[u8]) -> String {
        match self {
            EncodingScheme::Q => {
                let mut encoded = String::with_capacity(bytes.len() * 3);
                for b in bytes {
                    if is_q_literal(*b) {
                        encoded.push(*b as char);
                    } else {
                        encoded.push_str(&format!("={:02X}", b));
                    }
                }
                encoded
            }
            EncodingScheme::B => base64.encode(bytes),
        }
    }
}

// Characters allowed unencoded in an encoded-word used as a phrase (RFC 2047 5.3)
fn is_q_literal(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'!' | b'*' | b'+' | b'-' | b'/')
}

/// Turns header text into one or more encoded-words.
///
/// Words longer than the configured maximum are split on character boundaries and folded onto
/// continuation lines.
#[derive(Debug, Clone)]
pub struct MimeEncoder {
    charset: String,
    scheme: EncodingScheme,
    max_word_len: usize,
    line_end: String,
}

impl MimeEncoder {
    pub fn new(charset: impl Into<String>) -> Self {
        MimeEncoder {
            charset: charset.into(),
            scheme: EncodingScheme::default(),
            max_word_len: MAX_WORD_LEN,
            line_end: String::from("\r\n"),
        }
    }

    // Builder pattern methods
    pub fn with_scheme(mut self, scheme: EncodingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len;
        self
    }

    pub fn with_line_end(mut self, line_end: impl Into<String>) -> Self {
        self.line_end = line_end.into();
        self
    }

    pub fn encode(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let (charset, encoding) = self.resolve_charset(text);
        let prefix = format!("=?{}?{}?", charset, self.scheme.letter());
        let budget = self.max_word_len.saturating_sub(prefix.len() + 2);

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        let mut chunk: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4];

        for c in text.chars() {
            let (bytes, _, _) = encoding.encode(c.encode_utf8(&mut buf));
            let mut grown = chunk.clone();
            grown.extend_from_slice(&bytes);

            if !chunk.is_empty() && self.scheme.encoded_len(&grown) > budget {
                chunks.push(std::mem::replace(&mut chunk, bytes.into_owned()));
            } else {
                chunk = grown;
            }
        }
        chunks.push(chunk);

        chunks
            .iter()
            .map(|bytes| format!("{}{}?=", prefix, self.scheme.encode_bytes(bytes)))
            .collect::<Vec<_>>()
            .join(&format!("{} ", self.line_end))
    }

    fn resolve_charset(&self, text: &str) -> (String, &'static Encoding) {
        match Encoding::for_label(self.charset.trim().as_bytes()) {
            Some(encoding) if encoding == UTF_8 => (self.charset.clone(), UTF_8),
            Some(encoding) => {
                let (_, used, had_errors) = encoding.encode(text);
                if had_errors || used != encoding {
                    warn!(
                        "cannot represent {:?} in charset {}, encoding as UTF-8",
                        text, self.charset
                    );
                    (String::from("UTF-8"), UTF_8)
                } else {
                    (self.charset.clone(), encoding)
                }
            }
            None => {
                warn!("unknown charset {}, encoding as UTF-8", self.charset);
                (String::from("UTF-8"), UTF_8)
            }
        }
    }
}
