use crate::errors::{HeaderError, Result};
use std::fmt;

/// Anything that can hand out an email address and an optional display name.
pub trait Mailbox {
    fn email(&self) -> &str;
    fn name(&self) -> Option<&str>;
}

/// A validated email address with an optional display name.
///
/// The email is never empty, and a name is either absent or non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    email: String,
    name: Option<String>,
}

impl Address {
    pub fn new<E, N>(email: E, name: Option<N>) -> Result<Self>
    where
        E: Into<String>,
        N: Into<String>,
    {
        let email = email.into();
        Address::verify(&email)?;

        let name = match name.map(Into::into) {
            Some(name) if name.contains(['\r', '\n']) => {
                return Err(HeaderError::InvalidInput(format!(
                    "Display name for '{}' must not contain CR or LF",
                    email
                )))
            }
            Some(name) if name.trim().is_empty() => None,
            name => name,
        };

        Ok(Address { email, name })
    }

    /// Check that `email` is a plausible `local@domain` token.
    ///
    /// Whitespace is only accepted inside a quoted local part such as `"john doe"@example.com`.
    pub fn verify(email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(HeaderError::InvalidInput(String::from(
                "Email address must not be empty",
            )));
        }

        let (local, domain) = match email.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => (local, domain),
            _ => {
                return Err(HeaderError::InvalidInput(format!(
                    "Email address '{}' is not of the form local@domain",
                    email
                )))
            }
        };

        let quoted = local.len() >= 2 && local.starts_with('"') && local.ends_with('"');
        let bad_local = local.chars().find(|c| is_forbidden(*c, quoted));
        let bad_domain = domain.chars().find(|c| is_forbidden(*c, false));

        match bad_local.or(bad_domain) {
            Some(c) => Err(HeaderError::InvalidInput(format!(
                "Email address '{}' contains forbidden character {:?}",
                email, c
            ))),
            None => Ok(()),
        }
    }

    /// Copy any [`Mailbox`] into an owned, validated address.
    pub fn from_mailbox<M: Mailbox + ?Sized>(mailbox: &M) -> Result<Self> {
        Address::new(mailbox.email(), mailbox.name())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn is_forbidden(c: char, quoted: bool) -> bool {
    if quoted && (c == ' ' || c == '\t') {
        return false;
    }
    c == '<' || c == '>' || c.is_whitespace() || c.is_control()
}

impl Mailbox for Address {
    fn email(&self) -> &str {
        &self.email
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl TryFrom<&str> for Address {
    type Error = HeaderError;

    fn try_from(email: &str) -> Result<Self> {
        Address::new(email, None::<String>)
    }
}

impl TryFrom<String> for Address {
    type Error = HeaderError;

    fn try_from(email: String) -> Result<Self> {
        Address::new(email, None::<String>)
    }
}

/// Renders as `Name <email>`, or `<email>` when there is no name.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => write!(f, "<{}>", self.email),
        }
    }
}

/// What a field's address can be replaced with: a bare email to be validated, or a
/// ready-made [`Address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    Email(String),
    Address(Address),
}

impl From<&str> for AddressSource {
    fn from(email: &str) -> Self {
        AddressSource::Email(email.to_string())
    }
}

impl From<String> for AddressSource {
    fn from(email: String) -> Self {
        AddressSource::Email(email)
    }
}

impl From<Address> for AddressSource {
    fn from(address: Address) -> Self {
        AddressSource::Address(address)
    }
}

impl From<&Address> for AddressSource {
    fn from(address: &Address) -> Self {
        AddressSource::Address(address.clone())
    }
}
