//! Outgoing message model, cleaning and validation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PostmarkError, Result};

/// Bare address check: one `@`, no whitespace or angle brackets, dotted domain,
/// and no empty dot-separated label on either side
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@<>,;.]+(\.[^\s@<>,;.]+)*@[^\s@<>,;.]+(\.[^\s@<>,;.]+)+$")
        .expect("address regex is valid")
});

/// A custom mail header sent with the message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A file attached to the message, content already base64 encoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content: String,
    pub content_type: String,
}

impl Attachment {
    /// Create an attachment from raw bytes
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            name: name.into(),
            content: STANDARD.encode(bytes),
            content_type: content_type.into(),
        }
    }
}

/// One email message
///
/// `to`, `cc`, `bcc` and `reply_to` accept comma-separated lists; `from` is a
/// single address. Addresses may be bare (`user@example.com`) or carry a
/// display name (`"Jane Doe" <jane@example.com>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_html: bool,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create a plain-text message with the required fields
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: Some(subject.into()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark the body as HTML (sent as `HtmlBody` instead of `TextBody`)
    pub fn with_html(mut self, is_html: bool) -> Self {
        self.is_html = is_html;
        self
    }

    /// Append a header; duplicates are kept and order is preserved
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Normalize the message before validation
    ///
    /// Trims address fields and re-joins address lists as `a, b`, turns empty
    /// optional fields into `None` so they are left off the wire, and drops
    /// headers without a name. Applying it twice changes nothing.
    pub fn clean(&mut self) {
        self.from = self.from.trim().to_string();
        self.to = normalize_list(&self.to);
        self.reply_to = self.reply_to.as_deref().map(normalize_list).filter(|s| !s.is_empty());
        self.cc = self.cc.as_deref().map(normalize_list).filter(|s| !s.is_empty());
        self.bcc = self.bcc.as_deref().map(normalize_list).filter(|s| !s.is_empty());

        self.subject = self.subject.take().filter(|s| !s.trim().is_empty());
        self.body = self.body.take().filter(|s| !s.trim().is_empty());
        self.tag = self
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        for header in &mut self.headers {
            header.name = header.name.trim().to_string();
        }
        self.headers.retain(|h| !h.name.is_empty());
    }

    /// Check the message can be submitted
    ///
    /// Expects a cleaned message. Never mutates it.
    pub fn validate(&self) -> Result<()> {
        if self.to.trim().is_empty() {
            return Err(PostmarkError::Validation(
                "Message must have at least one recipient in To".to_string(),
            ));
        }

        if !self.from.trim().is_empty() {
            validate_address("From", &self.from)?;
        }
        validate_list("To", &self.to)?;
        if let Some(reply_to) = &self.reply_to {
            validate_list("ReplyTo", reply_to)?;
        }
        if let Some(cc) = &self.cc {
            validate_list("Cc", cc)?;
        }
        if let Some(bcc) = &self.bcc {
            validate_list("Bcc", bcc)?;
        }

        let subject_empty = self.subject.as_deref().map_or(true, |s| s.trim().is_empty());
        let body_empty = self.body.as_deref().map_or(true, |s| s.trim().is_empty());
        if subject_empty && body_empty {
            return Err(PostmarkError::Validation(
                "Message must have a subject or a body".to_string(),
            ));
        }

        for attachment in &self.attachments {
            if attachment.name.trim().is_empty() {
                return Err(PostmarkError::Validation(
                    "Attachment name cannot be empty".to_string(),
                ));
            }
            if attachment.content_type.trim().is_empty() {
                return Err(PostmarkError::Validation(format!(
                    "Attachment '{}' has no content type",
                    attachment.name
                )));
            }
        }

        Ok(())
    }

    /// Wire representation of the message
    pub fn to_wire(&self) -> WireMessage<'_> {
        let body = self.body.as_deref();
        WireMessage {
            from: non_empty(&self.from),
            to: non_empty(&self.to),
            cc: self.cc.as_deref(),
            bcc: self.bcc.as_deref(),
            reply_to: self.reply_to.as_deref(),
            subject: self.subject.as_deref(),
            tag: self.tag.as_deref(),
            html_body: if self.is_html { body } else { None },
            text_body: if self.is_html { None } else { body },
            headers: self
                .headers
                .iter()
                .map(|h| WireHeader {
                    name: &h.name,
                    value: &h.value,
                })
                .collect(),
            attachments: self
                .attachments
                .iter()
                .map(|a| WireAttachment {
                    name: &a.name,
                    content: &a.content,
                    content_type: &a.content_type,
                })
                .collect(),
        }
    }
}

/// JSON shape of a message as the provider expects it
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<WireHeader<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<WireAttachment<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireHeader<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAttachment<'a> {
    pub name: &'a str,
    pub content: &'a str,
    pub content_type: &'a str,
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Split an address list on commas and semicolons outside quotes and angle brackets
fn split_addresses(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => in_angle = true,
            '>' if !in_quotes => in_angle = false,
            ',' | ';' if !in_quotes && !in_angle => {
                parts.push(&list[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Trim each entry, collapse inner whitespace runs and re-join as `a, b`
fn normalize_list(list: &str) -> String {
    split_addresses(list)
        .into_iter()
        .map(|entry| entry.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pull the bare address out of `Name <addr>` or return the input as-is
fn extract_address(entry: &str) -> Option<&str> {
    match (entry.rfind('<'), entry.rfind('>')) {
        (Some(start), Some(end)) if start < end && entry[end + 1..].trim().is_empty() => {
            Some(entry[start + 1..end].trim())
        }
        (None, None) => Some(entry.trim()),
        _ => None,
    }
}

fn is_valid_address(entry: &str) -> bool {
    extract_address(entry).map_or(false, |addr| ADDRESS_RE.is_match(addr))
}

fn validate_address(field: &str, entry: &str) -> Result<()> {
    if is_valid_address(entry) {
        Ok(())
    } else {
        Err(PostmarkError::Validation(format!(
            "{} contains an invalid email address: '{}'",
            field, entry
        )))
    }
}

fn validate_list(field: &str, list: &str) -> Result<()> {
    split_addresses(list)
        .into_iter()
        .try_for_each(|entry| validate_address(field, entry))
}
