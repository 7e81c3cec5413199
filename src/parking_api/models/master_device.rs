/// The supervisory controller. Its `system_status` and `last_health_ping`
/// are free text and only ever displayed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterDevice {
    pub is_online: bool,
    pub system_status: String,
    pub last_health_ping: String,
}
