//! Provider webhook event types.
//!
//! Defines the structures for parsing payment provider webhook payloads.
//! Only fields relevant to our processing are captured.

use serde::{Deserialize, Serialize};

/// Provider webhook event (simplified).
///
/// Contains the essential fields needed for webhook processing.
/// Additional fields from the provider's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: ProviderEventData,

    /// Whether this is a live mode event (vs test mode).
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEventData {
    /// The object that triggered the event (a payment intent for the events
    /// we act on).
    pub object: serde_json::Value,
}

impl ProviderEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> Option<ActionableEventType> {
        ActionableEventType::from_type_str(&self.event_type)
    }

    /// Provider intent id carried in the event payload, if present.
    pub fn intent_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }

    /// Amount the provider reports as received, in minor units.
    ///
    /// Succeeded events carry `amount_received`; some renderings only carry
    /// `amount`, which we fall back to.
    pub fn amount_received(&self) -> Option<i64> {
        self.data
            .object
            .get("amount_received")
            .and_then(|v| v.as_i64())
            .or_else(|| self.data.object.get("amount").and_then(|v| v.as_i64()))
    }

    /// Lowercase ISO currency code from the event payload.
    pub fn currency(&self) -> Option<String> {
        self.data
            .object
            .get("currency")
            .and_then(|v| v.as_str())
            .map(|c| c.trim().to_ascii_lowercase())
    }

    /// Payment method identifier, when the provider includes one.
    pub fn payment_method(&self) -> Option<&str> {
        self.data
            .object
            .get("payment_method")
            .and_then(|v| v.as_str())
    }
}

/// Event types that drive payment state transitions.
///
/// Everything else is acknowledged without processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionableEventType {
    PaymentSucceeded,
    PaymentFailed,
}

impl ActionableEventType {
    /// Parse event type from the provider's type string. Returns `None` for
    /// types outside the allow-list.
    pub fn from_type_str(s: &str) -> Option<Self> {
        match s {
            "payment_intent.succeeded" => Some(Self::PaymentSucceeded),
            "payment_intent.payment_failed" => Some(Self::PaymentFailed),
            _ => None,
        }
    }

    /// Convert to the provider's event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentSucceeded => "payment_intent.succeeded",
            Self::PaymentFailed => "payment_intent.payment_failed",
        }
    }
}

/// Builder for creating test ProviderEvent instances.
#[cfg(test)]
pub struct ProviderEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for ProviderEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl ProviderEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> ProviderEvent {
        ProviderEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: ProviderEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false
        }"#;

        let event: ProviderEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.created, 1704067200);
        assert!(!event.livemode);
        assert!(event.api_version.is_none());
    }

    #[test]
    fn intent_id_reads_object_id() {
        let event = ProviderEventBuilder::new()
            .object(json!({"id": "pi_abc123"}))
            .build();

        assert_eq!(event.intent_id(), Some("pi_abc123"));
    }

    #[test]
    fn intent_id_missing_when_object_empty() {
        let event = ProviderEventBuilder::new().build();
        assert_eq!(event.intent_id(), None);
    }

    #[test]
    fn amount_received_prefers_amount_received_field() {
        let event = ProviderEventBuilder::new()
            .object(json!({"amount_received": 2550, "amount": 9999}))
            .build();

        assert_eq!(event.amount_received(), Some(2550));
    }

    #[test]
    fn amount_received_falls_back_to_amount() {
        let event = ProviderEventBuilder::new()
            .object(json!({"amount": 2550}))
            .build();

        assert_eq!(event.amount_received(), Some(2550));
    }

    #[test]
    fn currency_is_trimmed_and_lowercased() {
        let event = ProviderEventBuilder::new()
            .object(json!({"currency": " USD "}))
            .build();

        assert_eq!(event.currency(), Some("usd".to_string()));
    }

    #[test]
    fn payment_method_extracted_when_present() {
        let event = ProviderEventBuilder::new()
            .object(json!({"payment_method": "pm_card_visa"}))
            .build();

        assert_eq!(event.payment_method(), Some("pm_card_visa"));
    }

    #[test]
    fn actionable_type_parses_succeeded_and_failed() {
        assert_eq!(
            ActionableEventType::from_type_str("payment_intent.succeeded"),
            Some(ActionableEventType::PaymentSucceeded)
        );
        assert_eq!(
            ActionableEventType::from_type_str("payment_intent.payment_failed"),
            Some(ActionableEventType::PaymentFailed)
        );
    }

    #[test]
    fn actionable_type_rejects_everything_else() {
        assert_eq!(
            ActionableEventType::from_type_str("payment_intent.created"),
            None
        );
        assert_eq!(ActionableEventType::from_type_str("charge.refunded"), None);
        assert_eq!(ActionableEventType::from_type_str(""), None);
    }

    #[test]
    fn actionable_type_round_trips() {
        for t in [
            ActionableEventType::PaymentSucceeded,
            ActionableEventType::PaymentFailed,
        ] {
            assert_eq!(ActionableEventType::from_type_str(t.as_str()), Some(t));
        }
    }

    #[test]
    fn parsed_type_returns_none_for_ignored_events() {
        let event = ProviderEventBuilder::new()
            .event_type("customer.created")
            .build();
        assert_eq!(event.parsed_type(), None);
    }
}
