// Request and response envelopes exchanged with the voice platform.
//
// Only the fields the skill reads are modelled; everything else in the JSON
// is ignored by serde.

use crate::core::slots::{normalize_slots, RawSlot, Resolution, Slots};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dialog state the platform reports once every required slot is filled.
pub const DIALOG_COMPLETED: &str = "COMPLETED";

// ============================================================================
// INBOUND
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

impl RequestEnvelope {
    /// The application id the request was addressed to, preferring the
    /// context block (always present) over the session block.
    pub fn application_id(&self) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.system.as_ref())
            .and_then(|s| s.application.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.application.as_ref()))
            .map(|app| app.application_id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The request kinds the skill reacts to. Anything else decodes as `Unknown`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(other)]
    Unknown,
}

impl Request {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Request::LaunchRequest(r) => r.request_id.as_deref(),
            Request::IntentRequest(r) => r.request_id.as_deref(),
            Request::SessionEndedRequest(r) => r.request_id.as_deref(),
            Request::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub dialog_state: Option<String>,
    pub intent: Intent,
}

impl IntentRequest {
    /// A request without a dialog state has no dialog model, so there is
    /// nothing left to fill.
    pub fn dialog_complete(&self) -> bool {
        self.dialog_state
            .as_deref()
            .map_or(true, |state| state == DIALOG_COMPLETED)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, SlotPayload>,
}

impl Intent {
    pub fn normalized_slots(&self) -> Slots {
        let raw: HashMap<String, RawSlot> = self
            .slots
            .iter()
            .map(|(name, slot)| (name.clone(), slot.to_raw_slot()))
            .collect();
        normalize_slots(&raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotPayload {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub resolutions: Option<Resolutions>,
}

impl SlotPayload {
    /// Only the first resolution authority is consulted.
    pub fn to_raw_slot(&self) -> RawSlot {
        let resolution = self
            .resolutions
            .as_ref()
            .and_then(|r| r.resolutions_per_authority.first())
            .map(|authority| {
                Resolution::from_status(
                    &authority.status.code,
                    authority.values.iter().map(|v| v.value.name.clone()),
                )
            })
            .unwrap_or(Resolution::Unresolved);

        RawSlot {
            value: self.value.clone(),
            resolution,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default)]
    pub resolutions_per_authority: Vec<ResolutionAuthority>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionAuthority {
    pub status: ResolutionStatus,
    #[serde(default)]
    pub values: Vec<ResolvedValueWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionStatus {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedValueWrapper {
    pub value: ResolvedValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedValue {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// What a handler wants said back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillResponse {
    pub speech_text: String,
    pub reprompt_text: Option<String>,
    pub card: Option<SimpleCard>,
    pub should_end_session: bool,
    pub delegate_dialog: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleCard {
    pub title: String,
    pub content: String,
}

impl SkillResponse {
    /// Speaks `text` and ends the session.
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            reprompt_text: None,
            card: None,
            should_end_session: true,
            delegate_dialog: false,
        }
    }

    /// Says nothing.
    pub fn empty() -> Self {
        Self::speak("")
    }

    /// Hands slot filling back to the platform's dialog manager.
    pub fn delegate() -> Self {
        Self {
            should_end_session: false,
            delegate_dialog: true,
            ..Self::empty()
        }
    }

    /// Keeps the session open and sets what to say if the user stays silent.
    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt_text = Some(text.into());
        self.should_end_session = false;
        self
    }

    pub fn with_simple_card(mut self, title: &str, content: impl Into<String>) -> Self {
        self.card = Some(SimpleCard {
            title: title.to_string(),
            content: content.into(),
        });
        self
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        let output_speech = Some(self.speech_text)
            .filter(|text| !text.is_empty())
            .map(OutputSpeech::plain);
        let reprompt = self.reprompt_text.map(|text| Reprompt {
            output_speech: OutputSpeech::plain(text),
        });
        let card = self.card.map(|card| Card {
            kind: "Simple",
            title: card.title,
            content: card.content,
        });
        let directives = if self.delegate_dialog {
            vec![Directive {
                kind: "Dialog.Delegate",
            }]
        } else {
            Vec::new()
        };

        ResponseEnvelope {
            version: "1.0",
            response: ResponseBody {
                output_speech,
                reprompt,
                card,
                directives,
                should_end_session: self.should_end_session,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<Card>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    directives: Vec<Directive>,
    should_end_session: bool,
}

#[derive(Debug, Serialize)]
struct OutputSpeech {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl OutputSpeech {
    fn plain(text: String) -> Self {
        Self {
            kind: "PlainText",
            text,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reprompt {
    output_speech: OutputSpeech,
}

#[derive(Debug, Serialize)]
struct Card {
    #[serde(rename = "type")]
    kind: &'static str,
    title: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Directive {
    #[serde(rename = "type")]
    kind: &'static str,
}
