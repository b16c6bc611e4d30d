use crate::address::{Address, AddressSource};
use crate::errors::{HeaderError, Result};
use crate::header::{split_header_line, unfold, Header, HeaderFormat};
use crate::mime;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Encoding tag of a field whose text needed no MIME decoding.
pub const ASCII: &str = "ASCII";
/// Encoding tag set when the raw line had to be unfolded or decoded.
pub const UTF_8: &str = "UTF-8";

// Display name, then an address in angle brackets closing the value
static NAME_ADDR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?)<(?P<email>[^>]+)>$").expect("name-addr pattern must compile")
});

mod private {
    pub trait Sealed {}
}

/// The closed set of header fields carrying a single mailbox.
pub trait FieldKind: private::Sealed {
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SenderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResentSenderKind;

impl private::Sealed for SenderKind {}
impl private::Sealed for ResentSenderKind {}

impl FieldKind for SenderKind {
    const NAME: &'static str = "Sender";
}

impl FieldKind for ResentSenderKind {
    const NAME: &'static str = "Resent-Sender";
}

/// The `Sender` header.
pub type Sender = MailboxField<SenderKind>;
/// The `Resent-Sender` header.
pub type ResentSender = MailboxField<ResentSenderKind>;

/// A header field holding at most one address, e.g. `Sender: Bob Smith <bob@example.com>`.
///
/// Which header it is comes from `K`, so a `Sender` can never be built from a `From:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxField<K: FieldKind> {
    address: Option<Address>,
    encoding: String,
    kind: PhantomData<K>,
}

impl<K: FieldKind> MailboxField<K> {
    /// An empty field: no address, ASCII encoding.
    pub fn new() -> Self {
        MailboxField {
            address: None,
            encoding: String::from(ASCII),
            kind: PhantomData,
        }
    }

    // Builder pattern methods
    pub fn with_address<S: Into<AddressSource>>(
        mut self,
        source: S,
        name: Option<&str>,
    ) -> Result<Self> {
        self.set_address(source, name)?;
        Ok(self)
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.set_encoding(encoding);
        self
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Replace the address.
    ///
    /// An email string is validated and combined with `name`; a ready-made [`Address`] is stored
    /// as is and `name` is ignored. On error the previous address is kept.
    pub fn set_address<S: Into<AddressSource>>(
        &mut self,
        source: S,
        name: Option<&str>,
    ) -> Result<&mut Self> {
        let address = match source.into() {
            AddressSource::Email(email) => Address::new(email, name)?,
            AddressSource::Address(address) => address,
        };

        self.address = Some(address);
        Ok(self)
    }

    pub fn take_address(&mut self) -> Option<Address> {
        self.address.take()
    }

    pub fn clear_address(&mut self) -> &mut Self {
        self.address = None;
        self
    }

    pub fn set_encoding(&mut self, encoding: impl Into<String>) -> &mut Self {
        self.encoding = encoding.into();
        self
    }
}

impl<K: FieldKind> Header for MailboxField<K> {
    fn parse(line: &str) -> Result<Self> {
        let decoded = mime::decode(&unfold(line));
        let (name, value) = split_header_line(&decoded)?;

        if !name.eq_ignore_ascii_case(K::NAME) {
            return Err(HeaderError::Parse(format!(
                "wrong field type: expected '{}', got '{}'",
                K::NAME,
                name
            )));
        }

        let mut field = MailboxField::new();
        if decoded != line {
            debug!("{} line was folded or encoded, marking it {}", K::NAME, UTF_8);
            field.set_encoding(UTF_8);
        }

        let captures = match NAME_ADDR.captures(value) {
            Some(captures) => captures,
            None => {
                trace!("no bracketed address in {} value {:?}", K::NAME, value);
                return Ok(field);
            }
        };

        let display_name = captures["name"].trim();
        let display_name = if display_name.is_empty() {
            None
        } else {
            Some(mime::decode(display_name))
        };

        trace!(
            "{}: email {:?}, name {:?}",
            K::NAME,
            &captures["email"],
            display_name
        );
        field.address = Some(Address::new(&captures["email"], display_name)?);

        Ok(field)
    }

    fn field_name(&self) -> &'static str {
        K::NAME
    }

    fn field_value(&self, format: HeaderFormat) -> String {
        let address = match &self.address {
            Some(address) => address,
            None => return String::new(),
        };

        let email = format!("<{}>", address.email());
        match address.name() {
            Some(name) if !name.is_empty() => {
                if format == HeaderFormat::Encoded && self.encoding != ASCII {
                    format!("{} {}", mime::encode(name, &self.encoding), email)
                } else {
                    format!("{} {}", name, email)
                }
            }
            _ => email,
        }
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl<K: FieldKind> Default for MailboxField<K> {
    fn default() -> Self {
        MailboxField::new()
    }
}

impl<K: FieldKind> FromStr for MailboxField<K> {
    type Err = HeaderError;

    fn from_str(line: &str) -> Result<Self> {
        <Self as Header>::parse(line)
    }
}

/// Renders the wire-ready header line.
impl<K: FieldKind> fmt::Display for MailboxField<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
