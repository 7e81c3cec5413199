pub mod response;

pub mod master_device;
pub mod parking_snapshot;
pub mod parking_spot;
