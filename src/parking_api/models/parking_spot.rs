#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParkingStatus {
    Open,
    Occupied,
    #[default]
    Unknown,
}

impl ParkingStatus {
    pub fn from_raw(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("open") {
            ParkingStatus::Open
        } else if raw.eq_ignore_ascii_case("occupied") {
            ParkingStatus::Occupied
        } else {
            ParkingStatus::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl SystemStatus {
    pub fn from_raw(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("online") {
            SystemStatus::Online
        } else if raw.eq_ignore_ascii_case("offline") {
            SystemStatus::Offline
        } else {
            SystemStatus::Unknown
        }
    }
}

/// One sensor-equipped parking space as reported by its slave device.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParkingSpot {
    pub parking_status: ParkingStatus,
    pub system_status: SystemStatus,
    pub sensor_error: bool,
    /// Milliseconds since the sensor last reported.
    pub time_since_update_ms: u64,
    /// Soft-delete marker. Removed spots never make it into a snapshot.
    pub removed: bool,
}

impl ParkingSpot {
    pub fn is_available(&self) -> bool {
        self.parking_status == ParkingStatus::Open
    }

    pub fn is_occupied(&self) -> bool {
        self.parking_status == ParkingStatus::Occupied
    }

    pub fn is_online(&self) -> bool {
        self.system_status == SystemStatus::Online
    }

    /// Whether this spot may contribute to the available/occupied totals.
    pub fn is_reliable(&self) -> bool {
        self.is_online() && !self.sensor_error
    }
}
