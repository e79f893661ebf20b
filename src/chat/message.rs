//! Chat messages: one entry in the conversation transcript.
//!
//! DESIGN
//! ======
//! A message carries exactly one payload (text, uploaded photo, verdict, or
//! generated visualization), so the payload is an enum rather than a bag of
//! optional fields. Loading placeholders can only be built from text, which
//! keeps "placeholder" and "result" mutually exclusive.
//!
//! The wire shape keeps the flat camelCase layout the presentation layer
//! renders (`text`, `image`, `isVerdict` + `verdictData`, ...).

use serde::{Serialize, Serializer};

use crate::advisor::types::{ImageRef, Verdict};

/// Unique within a session; allocated in insertion order.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Image(ImageRef),
    Verdict(Verdict),
    Visualization(ImageRef),
}

/// A message before the log assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    role: Role,
    payload: Payload,
    is_loading: bool,
    options: Vec<String>,
}

impl MessageDraft {
    fn new(role: Role, payload: Payload) -> Self {
        Self { role, payload, is_loading: false, options: Vec::new() }
    }

    #[must_use]
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Payload::Text(text.into()))
    }

    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, Payload::Text(text.into()))
    }

    #[must_use]
    pub fn user_image(image: ImageRef) -> Self {
        Self::new(Role::User, Payload::Image(image))
    }

    /// Transient assistant placeholder for an in-flight advisor call.
    #[must_use]
    pub fn loading(text: impl Into<String>) -> Self {
        Self { is_loading: true, ..Self::assistant_text(text) }
    }

    #[must_use]
    pub fn verdict(verdict: Verdict) -> Self {
        Self::new(Role::Assistant, Payload::Verdict(verdict))
    }

    #[must_use]
    pub fn visualization(image: ImageRef) -> Self {
        Self::new(Role::Assistant, Payload::Visualization(image))
    }

    /// Attach quick-reply labels.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_message(self, id: MessageId) -> Message {
        Message { id, role: self.role, payload: self.payload, is_loading: self.is_loading, options: self.options }
    }
}

/// A logged message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    role: Role,
    payload: Payload,
    is_loading: bool,
    options: Vec<String>,
}

impl Message {
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.payload {
            Payload::Verdict(verdict) => Some(verdict),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_visualization(&self) -> bool {
        matches!(self.payload, Payload::Visualization(_))
    }
}

// =============================================================================
// WIRE SHAPE
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage<'a> {
    id: String,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a ImageRef>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_loading: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_verdict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict_data: Option<&'a Verdict>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_visualization: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    visualization_image: Option<&'a ImageRef>,
    #[serde(skip_serializing_if = "no_options")]
    options: &'a [String],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_options(options: &&[String]) -> bool {
    options.is_empty()
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut wire = WireMessage {
            id: self.id.to_string(),
            role: self.role,
            text: None,
            image: None,
            is_loading: self.is_loading,
            is_verdict: false,
            verdict_data: None,
            is_visualization: false,
            visualization_image: None,
            options: &self.options,
        };
        match &self.payload {
            Payload::Text(text) => wire.text = Some(text.as_str()),
            Payload::Image(image) => wire.image = Some(image),
            Payload::Verdict(verdict) => {
                wire.is_verdict = true;
                wire.verdict_data = Some(verdict);
            }
            Payload::Visualization(image) => {
                wire.is_visualization = true;
                wire.visualization_image = Some(image);
            }
        }
        wire.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_verdict() -> Verdict {
        Verdict {
            verdict: "Cluttered but fixable".into(),
            estimated_cost: "₹5,000 – ₹9,000".into(),
            worth_fixing: vec!["Paint walls".into()],
            avoid_spending_on: vec!["New sofa".into()],
            reasoning: "Light changes energy".into(),
            ultra_budget_cost: None,
            transformation_logic: None,
            breakup: vec![],
        }
    }

    #[test]
    fn loading_draft_is_assistant_text() {
        let msg = MessageDraft::loading("thinking").into_message(4);
        assert!(msg.is_loading());
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.text(), Some("thinking"));
        assert_eq!(msg.id(), 4);
    }

    #[test]
    fn text_message_wire_shape() {
        let msg = MessageDraft::assistant_text("hello").with_options(["A", "B"]).into_message(1);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["text"], "hello");
        assert_eq!(value["options"], serde_json::json!(["A", "B"]));
        assert!(value.get("isLoading").is_none());
        assert!(value.get("isVerdict").is_none());
        assert!(value.get("image").is_none());
    }

    #[test]
    fn image_message_wire_shape() {
        let msg = MessageDraft::user_image(ImageRef::new("image/jpeg", vec![1, 2, 3])).into_message(2);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["image"], "data:image/jpeg;base64,AQID");
        assert!(value.get("text").is_none());
        assert!(value.get("options").is_none());
    }

    #[test]
    fn verdict_message_wire_shape() {
        let msg = MessageDraft::verdict(sample_verdict()).into_message(3);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["isVerdict"], true);
        assert_eq!(value["verdictData"]["verdict"], "Cluttered but fixable");
        assert!(value.get("text").is_none());
        assert_eq!(msg.verdict(), Some(&sample_verdict()));
    }

    #[test]
    fn visualization_message_wire_shape() {
        let msg = MessageDraft::visualization(ImageRef::new("image/png", vec![9])).into_message(5);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["isVisualization"], true);
        assert_eq!(value["visualizationImage"], "data:image/png;base64,CQ==");
        assert!(msg.is_visualization());
        assert!(!msg.is_loading());
    }

    #[test]
    fn loading_message_wire_flag() {
        let msg = MessageDraft::loading("Scanning...").into_message(6);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["isLoading"], true);
        assert_eq!(value["text"], "Scanning...");
    }
}
