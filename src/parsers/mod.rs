//! Chat export parsers.
//!
//! Each parser turns an export file into [`RawMessage`](crate::RawMessage)s
//! and implements [`Parser`](crate::parser::Parser).
//!
//! - [`WhatsAppParser`] - WhatsApp TXT exports (feature `whatsapp`)
//! - [`PlainTextParser`] - a text file holding one pasted message

mod plain;
#[cfg(feature = "whatsapp")]
mod whatsapp;

pub use plain::PlainTextParser;
#[cfg(feature = "whatsapp")]
pub use whatsapp::WhatsAppParser;
