use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    To,
    Cc,
    Bcc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RecipientType>,
}

impl Recipient {
    pub fn to(email: &str) -> Self {
        Recipient {
            email: email.to_owned(),
            name: None,
            kind: Some(RecipientType::To),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeVar {
    pub name: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcptMergeVars {
    pub rcpt: String,
    pub vars: Vec<MergeVar>,
}

// content is base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContent {
    pub name: String,
    pub content: String,
}

/// The `message` object shared by every send call. Only the fields the
/// server acts on; empty optionals are left out of the JSON entirely,
/// the way the upstream API expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub from_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<MergeVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<RcptMergeVars>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Envelope options common to send, send-template and send-raw.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendOptions {
    #[serde(rename = "async", skip_serializing_if = "is_false")]
    pub async_send: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub key: String,
    pub message: Message,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendTemplateRequest {
    pub key: String,
    pub template_name: String,
    pub template_content: Vec<TemplateContent>,
    pub message: Message,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendRawRequest {
    pub key: String,
    pub raw_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Queued,
    Scheduled,
    Rejected,
    Invalid,
    Canceled,
}

/// One entry per recipient in the server's reply to any send call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub email: String,
    pub status: SendStatus,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}
