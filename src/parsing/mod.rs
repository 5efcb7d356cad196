//! Export-format grammars shared by the parsers.

#[cfg(feature = "whatsapp")]
pub mod whatsapp;

#[cfg(feature = "whatsapp")]
pub use whatsapp::{
    DateFormat as WhatsAppDateFormat, detect_whatsapp_format, is_whatsapp_system_message,
    parse_whatsapp_timestamp,
};
