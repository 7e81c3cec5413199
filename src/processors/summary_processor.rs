use crate::parking_api::models::parking_snapshot::ParkingSnapshot;
use crate::parking_api::models::parking_spot::ParkingSpot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotState {
    Offline,
    SensorError,
    Available,
    Occupied,
    Unknown,
}

impl SpotState {
    pub fn of(spot: &ParkingSpot) -> Self {
        if !spot.is_online() {
            SpotState::Offline
        } else if spot.sensor_error {
            SpotState::SensorError
        } else if spot.is_available() {
            SpotState::Available
        } else if spot.is_occupied() {
            SpotState::Occupied
        } else {
            SpotState::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpotState::Offline => "Offline",
            SpotState::SensorError => "Sensor Error",
            SpotState::Available => "Available",
            SpotState::Occupied => "Occupied",
            SpotState::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotSummary {
    pub device_id: String,
    pub state: SpotState,
    pub last_seen_secs: u64,
}

/// Aggregate availability for one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// Online, error-free spots reporting Open.
    pub available: usize,
    /// Online, error-free spots reporting Occupied.
    pub occupied: usize,
    pub offline: usize,
    pub sensor_errors: usize,
    /// True only when a master is present and online.
    pub parking_open: bool,
    pub master_status_text: String,
    pub master_last_health_ping: Option<String>,
    pub spots: Vec<SpotSummary>,
}

pub fn summarize(snapshot: &ParkingSnapshot) -> Summary {
    let mut available = 0;
    let mut occupied = 0;
    let mut offline = 0;
    let mut sensor_errors = 0;

    for spot in snapshot.spots.values() {
        if spot.is_reliable() {
            if spot.is_available() {
                available += 1;
            } else if spot.is_occupied() {
                occupied += 1;
            }
        }
        if !spot.is_online() {
            offline += 1;
        }
        if spot.sensor_error {
            sensor_errors += 1;
        }
    }

    let parking_open = snapshot.master.as_ref().is_some_and(|m| m.is_online);
    let master_status_text = match &snapshot.master {
        Some(master) if !master.system_status.is_empty() => master.system_status.clone(),
        Some(master) if master.is_online => "online".to_string(),
        Some(_) => "offline".to_string(),
        None => "not reporting".to_string(),
    };
    let master_last_health_ping = snapshot
        .master
        .as_ref()
        .map(|m| m.last_health_ping.clone())
        .filter(|ping| !ping.is_empty());

    let mut spots: Vec<SpotSummary> = snapshot
        .spots
        .iter()
        .map(|(device_id, spot)| SpotSummary {
            device_id: device_id.clone(),
            state: SpotState::of(spot),
            last_seen_secs: spot.time_since_update_ms / 1000,
        })
        .collect();
    // "2" before "10"
    spots.sort_by(|a, b| {
        (a.device_id.len(), &a.device_id).cmp(&(b.device_id.len(), &b.device_id))
    });

    Summary {
        total: snapshot.spots.len(),
        available,
        occupied,
        offline,
        sensor_errors,
        parking_open,
        master_status_text,
        master_last_health_ping,
        spots,
    }
}
