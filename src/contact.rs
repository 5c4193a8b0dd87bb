//! Contact bridge: turns a submitted form into a prefilled WhatsApp deep
//! link. The destination number and message template are fixed site content.

use url::form_urlencoded;

pub const WHATSAPP_NUMBER: &str = "628873434754";

/// A validated contact submission. All fields are trimmed; `email` may be
/// empty.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// Trim and validate the raw form fields. Name and message are required.
    pub fn from_input(name: &str, email: &str, message: &str) -> Result<Self, String> {
        let name = name.trim();
        let message = message.trim();
        if name.is_empty() || message.is_empty() {
            return Err("Please fill in your name and a message".to_string());
        }
        Ok(ContactMessage {
            name: name.to_string(),
            email: email.trim().to_string(),
            message: message.to_string(),
        })
    }

    /// The fixed outbound template.
    pub fn compose(&self) -> String {
        let mut text = format!("Halo! Nama saya {}.", self.name);
        if !self.email.is_empty() {
            text.push_str(&format!(" Email: {}.", self.email));
        }
        text.push_str(&format!(" Pesan: {}", self.message));
        text
    }

    /// Percent-encoded `wa.me` deep link carrying the composed text.
    pub fn deep_link(&self) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("text", &self.compose())
            .finish();
        format!("https://wa.me/{}?{}", WHATSAPP_NUMBER, query)
    }
}
