use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

// ---------------------------------------------------------------------------
// Coordinates – a latitude/longitude pair in degrees
// ---------------------------------------------------------------------------

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// The fixed point every customer distance is measured from.
pub type ReferencePoint = Coordinates;

// ---------------------------------------------------------------------------
// CustomerRecord – one accepted input line
// ---------------------------------------------------------------------------

/// Names of the fields every customer line must carry.
pub const USER_ID: &str = "user_id";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const NAME: &str = "name";

/// Integer sort key parsed from `user_id`. Wide enough for any `u64` id.
pub type UserId = i128;

/// A validated customer.
///
/// `user_id` and `position` are typed copies of the required fields; `fields`
/// is the original JSON object, key order included, and is the only thing
/// that gets serialized back out.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    /// Integer sort key derived from the `user_id` field.
    pub user_id: UserId,
    /// Coordinates coerced from the `latitude` / `longitude` fields.
    pub position: Coordinates,
    fields: Map<String, JsonValue>,
}

impl CustomerRecord {
    pub(crate) fn new(user_id: UserId, position: Coordinates, fields: Map<String, JsonValue>) -> Self {
        Self {
            user_id,
            position,
            fields,
        }
    }

    /// All fields of the source line, unmodified.
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// The `name` field as written in the input.
    pub fn name(&self) -> &JsonValue {
        self.fields.get(NAME).unwrap_or(&JsonValue::Null)
    }

    /// Look up any field, required or not.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }
}

impl Serialize for CustomerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
