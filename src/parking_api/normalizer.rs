use crate::parking_api::models::master_device::MasterDevice;
use crate::parking_api::models::parking_snapshot::ParkingSnapshot;
use crate::parking_api::models::parking_spot::{ParkingSpot, ParkingStatus, SystemStatus};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

pub const MASTER_DEVICE_KEY: &str = "Devicemaster";
pub const DEVICE_KEY_PREFIX: &str = "Device";
pub const DEVICE_COUNT_KEY: &str = "DeviceCount";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record `{key}` is not an object")]
    NotAnObject { key: String },

    #[error("field `{field}` of record `{key}` should be {expected}, found {found}")]
    WrongType {
        key: String,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Turns the `data` object of a parking response into a snapshot.
///
/// Keys are classified as the master record, a spot record (`Device<id>`,
/// except `DeviceCount`) or noise. Absent fields fall back to their zero
/// value; present fields of the wrong type abort the whole payload.
pub fn normalize(data: &Map<String, Value>) -> Result<ParkingSnapshot, NormalizeError> {
    let mut spots = HashMap::new();
    let mut master = None;

    for (key, value) in data {
        if key == MASTER_DEVICE_KEY {
            master = Some(parse_master(&Record::new(key, value)?)?);
        } else if key == DEVICE_COUNT_KEY {
            continue;
        } else if let Some(device_id) = key.strip_prefix(DEVICE_KEY_PREFIX) {
            let spot = parse_spot(&Record::new(key, value)?)?;
            if spot.removed {
                trace!("Skipping removed device {}", device_id);
                continue;
            }
            spots.insert(device_id.to_string(), spot);
        } else {
            trace!("Ignoring unrecognised record {}", key);
        }
    }

    Ok(ParkingSnapshot { spots, master })
}

fn parse_master(record: &Record) -> Result<MasterDevice, NormalizeError> {
    Ok(MasterDevice {
        is_online: record.bool("isOnline")?,
        system_status: record.string("System Status")?,
        last_health_ping: record.string("lastHealthPing")?,
    })
}

fn parse_spot(record: &Record) -> Result<ParkingSpot, NormalizeError> {
    Ok(ParkingSpot {
        parking_status: ParkingStatus::from_raw(&record.string("Parking Status")?),
        system_status: SystemStatus::from_raw(&record.string("System Status")?),
        sensor_error: record.bool("Sensor Error")?,
        time_since_update_ms: record.unsigned("timeSinceUpdateMs")?,
        removed: record.bool("removed")?,
    })
}

/// Typed, optional access to the fields of one device record.
struct Record<'a> {
    key: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    fn new(key: &'a str, value: &'a Value) -> Result<Self, NormalizeError> {
        match value {
            Value::Object(fields) => Ok(Self { key, fields }),
            _ => Err(NormalizeError::NotAnObject {
                key: key.to_string(),
            }),
        }
    }

    // null is treated the same as a missing field
    fn field(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    fn wrong_type(
        &self,
        field: &'static str,
        expected: &'static str,
        found: &Value,
    ) -> NormalizeError {
        NormalizeError::WrongType {
            key: self.key.to_string(),
            field,
            expected,
            found: kind_of(found),
        }
    }

    fn bool(&self, name: &'static str) -> Result<bool, NormalizeError> {
        match self.field(name) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.wrong_type(name, "a boolean", other)),
        }
    }

    fn string(&self, name: &'static str) -> Result<String, NormalizeError> {
        match self.field(name) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.wrong_type(name, "a string", other)),
        }
    }

    fn unsigned(&self, name: &'static str) -> Result<u64, NormalizeError> {
        match self.field(name) {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| self.wrong_type(name, "a non-negative integer", value)),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_u64() => "an integer",
        Value::Number(n) if n.is_i64() => "a negative integer",
        Value::Number(_) => "a float",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
