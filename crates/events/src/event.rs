use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use slicecheck_core::create_id;

/// Field name → value mapping carried by every event. Key order is irrelevant.
pub type Tags = Map<String, Value>;

/// Free-form event metadata (correlation ids, authorship, ...).
pub type Metadata = Map<String, Value>;

/// Typed payload of a domain event.
///
/// Each domain declares a closed enum of its event kinds and implements this
/// once on the enum; the variants hold the typed fields.
pub trait EventPayload: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable classification tag (e.g. "course_created").
    fn event_name(&self) -> &'static str;

    /// The typed fields projected into the event's tag map.
    fn tags(&self) -> Tags;

    /// Natural name this event is about, if any. Used to derive `event_id`.
    fn natural_key(&self) -> Option<&str> {
        None
    }
}

/// The `{type, data}` comparison shape of an event.
///
/// Expected events in fixtures are rebuilt values, never the instances a
/// handler returned, so equality between events always goes through this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Tags,
}

impl EventDetails {
    pub fn new(event_type: impl Into<String>, data: Tags) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }
}

/// Capability shared by every event: a pure, stable detail projection.
pub trait DetailProjection {
    fn details(&self) -> EventDetails;
}

/// A recorded domain event: payload plus identity, tags, metadata and time.
///
/// Immutable once appended to a history. The `with_*` builders consume the
/// event and are meant for fixture/handler construction only.
///
/// `event_name` and `tags` are always derived from the payload, including on
/// deserialization (see [`StoredEvent`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent<P> {
    event_id: String,
    event_name: String,
    tags: Tags,
    #[serde(default)]
    metadata: Metadata,
    stored_at: DateTime<Utc>,
    payload: P,
}

impl<P> DomainEvent<P>
where
    P: EventPayload,
{
    /// Build an event stored now.
    pub fn new(payload: P) -> Self {
        Self::recorded_at(payload, Utc::now())
    }

    /// Build an event with an explicit storage time.
    pub fn recorded_at(payload: P, stored_at: DateTime<Utc>) -> Self {
        let event_id = match payload.natural_key() {
            Some(name) => create_id(name),
            None => timestamp_id(stored_at),
        };
        Self {
            event_id,
            event_name: payload.event_name().to_string(),
            tags: payload.tags(),
            metadata: Metadata::new(),
            stored_at,
            payload,
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    /// Merge an extra tag. Typed fields win: a key the payload already sets is
    /// left untouched.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl<P> DomainEvent<P> {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Look up a tag by field name; absent fields are `None`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.tags.get(field)
    }
}

/// Wire form of a [`DomainEvent`].
///
/// Only the payload is authoritative: an incoming `event_name` is ignored and
/// incoming tags are merged like [`DomainEvent::with_tag`], so a tag can never
/// contradict a typed field.
#[derive(Debug, Deserialize)]
struct StoredEvent<P> {
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    stored_at: Option<DateTime<Utc>>,
    payload: P,
}

impl<P> StoredEvent<P>
where
    P: EventPayload,
{
    fn into_event(self) -> DomainEvent<P> {
        let mut event =
            DomainEvent::recorded_at(self.payload, self.stored_at.unwrap_or_else(Utc::now));
        if let Some(event_id) = self.event_id {
            event = event.with_event_id(event_id);
        }
        for (key, value) in self.tags {
            event = event.with_tag(key, value);
        }
        event.metadata = self.metadata;
        event
    }
}

impl<'de, P> Deserialize<'de> for DomainEvent<P>
where
    P: EventPayload + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        StoredEvent::<P>::deserialize(deserializer).map(StoredEvent::into_event)
    }
}

impl<P> DetailProjection for DomainEvent<P> {
    fn details(&self) -> EventDetails {
        EventDetails::new(self.event_name.clone(), self.tags.clone())
    }
}

/// `"<unix seconds>.<microseconds>"` of the given instant.
fn timestamp_id(at: DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum TestEvent {
        Named { name: String },
        Anonymous { value: i64 },
    }

    impl EventPayload for TestEvent {
        fn event_name(&self) -> &'static str {
            match self {
                TestEvent::Named { .. } => "named",
                TestEvent::Anonymous { .. } => "anonymous",
            }
        }

        fn tags(&self) -> Tags {
            let mut tags = Tags::new();
            match self {
                TestEvent::Named { name } => {
                    tags.insert("name".into(), json!(name));
                }
                TestEvent::Anonymous { value } => {
                    tags.insert("value".into(), json!(value));
                }
            }
            tags
        }

        fn natural_key(&self) -> Option<&str> {
            match self {
                TestEvent::Named { name } => Some(name.as_str()),
                TestEvent::Anonymous { .. } => None,
            }
        }
    }

    #[test]
    fn event_id_derives_from_the_natural_key() {
        let event = DomainEvent::new(TestEvent::Named {
            name: "Bob Marley".into(),
        });
        assert_eq!(event.event_id(), create_id("Bob Marley"));
    }

    #[test]
    fn event_id_falls_back_to_the_storage_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = DomainEvent::recorded_at(TestEvent::Anonymous { value: 7 }, at);
        assert_eq!(event.event_id(), format!("{}.000000", at.timestamp()));
        assert_eq!(event.stored_at(), at);
    }

    #[test]
    fn details_are_type_and_tags() {
        let event = DomainEvent::new(TestEvent::Anonymous { value: 3 });
        let details = event.details();
        assert_eq!(details.event_type, "anonymous");
        assert_eq!(details.data.get("value"), Some(&json!(3)));
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            json!({ "type": "anonymous", "data": { "value": 3 } })
        );
    }

    #[test]
    fn missing_tag_reads_as_none() {
        let event = DomainEvent::new(TestEvent::Anonymous { value: 3 });
        assert_eq!(event.get("value"), Some(&json!(3)));
        assert_eq!(event.get("nope"), None);
    }

    #[test]
    fn extra_tags_never_override_typed_fields() {
        let event = DomainEvent::new(TestEvent::Named { name: "a".into() })
            .with_tag("name", "b")
            .with_tag("source", "fixture");
        assert_eq!(event.get("name"), Some(&json!("a")));
        assert_eq!(event.get("source"), Some(&json!("fixture")));
    }

    #[test]
    fn metadata_does_not_leak_into_details() {
        let plain = DomainEvent::new(TestEvent::Anonymous { value: 1 });
        let annotated = plain.clone().with_metadata("actor", "tester");
        assert_eq!(annotated.metadata().get("actor"), Some(&json!("tester")));
        assert_eq!(plain.details(), annotated.details());
    }

    #[test]
    fn events_built_at_different_times_share_details() {
        let a = DomainEvent::recorded_at(
            TestEvent::Anonymous { value: 1 },
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        );
        let b = DomainEvent::new(TestEvent::Anonymous { value: 1 });
        assert_ne!(a.event_id(), b.event_id());
        assert_eq!(a.details(), b.details());
    }

    #[test]
    fn deserialized_tags_cannot_contradict_the_payload() {
        let mut stored = serde_json::to_value(DomainEvent::new(TestEvent::Named {
            name: "Math 201".into(),
        }))
        .unwrap();
        stored["event_name"] = json!("renamed");
        stored["tags"] = json!({ "name": "English 101", "room": "B12" });

        let event: DomainEvent<TestEvent> = serde_json::from_value(stored).unwrap();
        assert_eq!(event.event_name(), "named");
        assert_eq!(event.get("name"), Some(&json!("Math 201")));
        assert_eq!(event.get("room"), Some(&json!("B12")));
        assert_eq!(event.event_id(), create_id("Math 201"));
    }

    #[test]
    fn stored_identity_and_metadata_survive_a_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = DomainEvent::recorded_at(TestEvent::Anonymous { value: 9 }, at)
            .with_event_id("evt-1")
            .with_metadata("actor", "tester");

        let restored: DomainEvent<TestEvent> =
            serde_json::from_value(serde_json::to_value(&event).unwrap()).unwrap();
        assert_eq!(restored, event);
        assert_eq!(restored.event_id(), "evt-1");
    }

    #[test]
    fn payload_alone_is_enough_to_deserialize() {
        let event: DomainEvent<TestEvent> =
            serde_json::from_value(json!({ "payload": { "Anonymous": { "value": 4 } } })).unwrap();
        assert_eq!(event.event_name(), "anonymous");
        assert_eq!(event.get("value"), Some(&json!(4)));
        assert!(event.metadata().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the detail projection of one instance is stable.
        #[test]
        fn details_are_stable(name in "[A-Za-z0-9 ]{1,40}") {
            let event = DomainEvent::new(TestEvent::Named { name });
            prop_assert_eq!(event.details(), event.details());
        }
    }
}
