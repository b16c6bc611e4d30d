// https://www.rfc-editor.org/rfc/rfc5322#section-3.6.2
// https://www.rfc-editor.org/rfc/rfc2047

mod address;
mod errors;
mod header;
mod mailbox_field;
mod mime;

pub use address::{Address, AddressSource, Mailbox};
pub use errors::{HeaderError, Result};
pub use header::{split_header_line, unfold, Header, HeaderFormat};
pub use mailbox_field::{
    FieldKind, MailboxField, ResentSender, ResentSenderKind, Sender, SenderKind, ASCII, UTF_8,
};
pub use mime::{decode, encode, EncodingScheme, MimeEncoder, MAX_WORD_LEN};
