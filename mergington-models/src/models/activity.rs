use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tracing::trace;

/// A named offering with a schedule, description, capacity and participant roster.
///
/// The name is the key of the activity in the collection sent by the API, so it is not part
/// of the serialized value itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Activity {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Emails in registration order, as returned by the API.
    pub participants: Vec<String>,
}

impl Activity {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_schedule<S: Into<String>>(mut self, schedule: S) -> Self {
        self.schedule = schedule.into();
        self
    }

    pub fn with_capacity(mut self, max_participants: u32) -> Self {
        self.max_participants = max_participants;
        self
    }

    pub fn with_participant<S: Into<String>>(mut self, email: S) -> Self {
        self.participants.push(email.into());
        self
    }

    /// Capacity minus registered participants. Never negative, the API enforces capacity and
    /// an over-full activity simply has no spots left.
    pub fn spots_left(&self) -> u32 {
        let taken = u32::try_from(self.participants.len()).unwrap_or(u32::MAX);
        self.max_participants.saturating_sub(taken)
    }

    pub fn has_participants(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn is_registered(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// The activity collection as fetched in one render cycle.
///
/// Keeps the key order of the JSON object the API sent, which is the order activities are
/// displayed in. A roster is never mutated after it has been fetched; a refresh replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityRoster {
    activities: Vec<Activity>,
}

impl ActivityRoster {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.activities.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActivityRoster {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}

impl FromIterator<Activity> for ActivityRoster {
    fn from_iter<T: IntoIterator<Item = Activity>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

struct RosterVisitor;

impl<'de> Visitor<'de> for RosterVisitor {
    type Value = ActivityRoster;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping activity names to activity details")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut activities = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, mut activity)) = map.next_entry::<String, Activity>()? {
            activity.name = name;
            activities.push(activity);
        }
        trace!("decoded roster with {} activities", activities.len());
        Ok(ActivityRoster { activities })
    }
}

impl<'de> Deserialize<'de> for ActivityRoster {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RosterVisitor)
    }
}

impl Serialize for ActivityRoster {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.activities.len()))?;
        for activity in &self.activities {
            map.serialize_entry(&activity.name, activity)?;
        }
        map.end()
    }
}
