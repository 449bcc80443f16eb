//! Flat records as delivered by the data source.
//!
//! Every record carries a reference to its parent rather than a list of
//! children. The [`Tree`](crate::Tree) turns these into a hierarchy.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::id::{RecordId, deserialize_optional};

/// A company whose asset hierarchy can be browsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier of the company.
    pub id: RecordId,
    /// Display name.
    pub name: String,
}

/// A physical site or area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Identifier. Records without one are skipped when building the tree.
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub id: Option<RecordId>,

    /// Display name. `null` reads as the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// The enclosing location, if any.
    #[serde(
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<RecordId>,
}

impl LocationRecord {
    /// Creates a location record with no parent.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Sets the parent location.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<RecordId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }
}

/// A piece of equipment, or a sensor component if `sensor_type` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Identifier. Records without one are skipped when building the tree.
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub id: Option<RecordId>,

    /// Display name. `null` reads as the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// The asset this record is nested under. Takes precedence over
    /// `location_id`.
    #[serde(
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<RecordId>,

    /// The location this record sits in. Only consulted when `parent_id` is
    /// absent.
    #[serde(
        default,
        deserialize_with = "deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_id: Option<RecordId>,

    /// Kind of sensor. Its presence makes this record a component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<SensorType>,

    /// Operational status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Hardware identifier of the sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,

    /// Identifier of the gateway the sensor reports through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
}

impl AssetRecord {
    /// Creates an asset record with no parent, location or sensor.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Nests this record under another asset.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<RecordId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Places this record in a location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<RecordId>) -> Self {
        self.location_id = Some(location.into());
        self
    }

    /// Marks this record as a sensor component.
    #[must_use]
    pub fn with_sensor(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    /// Sets the operational status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether this record describes a sensor component rather than a plain
    /// asset.
    #[must_use]
    pub const fn is_component(&self) -> bool {
        self.sensor_type.is_some()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Type of sensor attached to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    /// Measures energy consumption.
    Energy,
    /// Measures vibration.
    Vibration,
    /// Any sensor type this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Operational status of an asset or component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Running normally.
    Operating,
    /// Needs attention.
    Alert,
    /// Failed or in a critical state.
    Critical,
    /// Healthy.
    Normal,
    /// Any status this crate does not know about.
    #[serde(other)]
    Unknown,
}
