use crate::parking_api::models::master_device::MasterDevice;
use crate::parking_api::models::parking_spot::ParkingSpot;
use std::collections::HashMap;

/// Point-in-time view of every visible spot plus the optional master.
///
/// Built fresh on each successful fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParkingSnapshot {
    /// Keyed by device id (the record key without its `Device` prefix).
    pub spots: HashMap<String, ParkingSpot>,
    pub master: Option<MasterDevice>,
}
