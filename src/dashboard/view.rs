use crate::parking_api::error::FetchError;
use crate::processors::summary_processor::{SpotState, Summary};
use chrono::{DateTime, Local};

/// Outcome of one tick, as handed to the presentation path.
pub type TickOutcome = Result<Summary, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Open,
    Closed,
    Unknown,
}

impl Indicator {
    pub fn color(&self) -> &'static str {
        match self {
            Indicator::Open => "#4CAF50",
            Indicator::Closed => "#F44336",
            Indicator::Unknown => "#FF9800",
        }
    }
}

/// Everything a sink needs to draw the dashboard, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub indicator: Indicator,
    pub parking_status_text: String,
    pub master_status_text: String,
    pub total_spots: String,
    pub available_spots: String,
    pub occupied_spots: String,
    pub spot_health_text: String,
    pub master_detail_text: Option<String>,
    pub last_updated: Option<String>,
    pub error: Option<String>,
    pub spot_lines: Vec<String>,
}

const PLACEHOLDER: &str = "--";

pub fn render(outcome: &TickOutcome, now: DateTime<Local>) -> DashboardView {
    match outcome {
        Ok(summary) => render_summary(summary, now),
        Err(e) => render_error(e),
    }
}

fn render_summary(summary: &Summary, now: DateTime<Local>) -> DashboardView {
    let (indicator, parking_status_text, master_status_text) = if summary.parking_open {
        (Indicator::Open, "Parking: OPEN", "Master ESP32: Online")
    } else {
        (Indicator::Closed, "Parking: CLOSED", "Master ESP32: Offline")
    };

    let spot_lines = summary
        .spots
        .iter()
        .map(|spot| match spot.state {
            SpotState::Offline if spot.last_seen_secs > 0 => format!(
                "Spot {}: {} (last seen {}s ago)",
                spot.device_id,
                spot.state.label(),
                spot.last_seen_secs
            ),
            _ => format!("Spot {}: {}", spot.device_id, spot.state.label()),
        })
        .collect();

    let ping = summary
        .master_last_health_ping
        .as_ref()
        .map(|ping| format!(" (last ping {})", ping))
        .unwrap_or_default();

    DashboardView {
        indicator,
        parking_status_text: parking_status_text.to_string(),
        master_status_text: master_status_text.to_string(),
        total_spots: summary.total.to_string(),
        available_spots: summary.available.to_string(),
        occupied_spots: summary.occupied.to_string(),
        spot_health_text: format!(
            "Offline: {}  Sensor errors: {}",
            summary.offline, summary.sensor_errors
        ),
        master_detail_text: Some(format!(
            "Master status: {}{}",
            summary.master_status_text, ping
        )),
        last_updated: Some(format!(
            "Last updated: {}",
            now.format("%b %d, %Y %H:%M:%S")
        )),
        error: None,
        spot_lines,
    }
}

fn render_error(error: &FetchError) -> DashboardView {
    DashboardView {
        indicator: Indicator::Unknown,
        parking_status_text: "Parking: UNKNOWN".to_string(),
        master_status_text: "Unable to connect to server".to_string(),
        total_spots: PLACEHOLDER.to_string(),
        available_spots: PLACEHOLDER.to_string(),
        occupied_spots: PLACEHOLDER.to_string(),
        spot_health_text: format!("Offline: {0}  Sensor errors: {0}", PLACEHOLDER),
        master_detail_text: None,
        last_updated: None,
        error: Some(format!("Error: {}", error)),
        spot_lines: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::summary_processor::SpotSummary;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap()
    }

    fn summary(parking_open: bool) -> Summary {
        Summary {
            total: 3,
            available: 1,
            occupied: 1,
            offline: 1,
            sensor_errors: 0,
            parking_open,
            master_status_text: "online".to_string(),
            master_last_health_ping: Some("2024-03-01T09:05:00Z".to_string()),
            spots: vec![
                SpotSummary {
                    device_id: "1".to_string(),
                    state: SpotState::Available,
                    last_seen_secs: 3,
                },
                SpotSummary {
                    device_id: "2".to_string(),
                    state: SpotState::Offline,
                    last_seen_secs: 95,
                },
            ],
        }
    }

    #[test]
    fn open_parking_renders_green() {
        let view = render(&Ok(summary(true)), now());
        assert_eq!(
            view,
            DashboardView {
                indicator: Indicator::Open,
                parking_status_text: "Parking: OPEN".to_string(),
                master_status_text: "Master ESP32: Online".to_string(),
                total_spots: "3".to_string(),
                available_spots: "1".to_string(),
                occupied_spots: "1".to_string(),
                spot_health_text: "Offline: 1  Sensor errors: 0".to_string(),
                master_detail_text: Some(
                    "Master status: online (last ping 2024-03-01T09:05:00Z)".to_string()
                ),
                last_updated: Some("Last updated: Mar 01, 2024 09:05:07".to_string()),
                error: None,
                spot_lines: vec![
                    "Spot 1: Available".to_string(),
                    "Spot 2: Offline (last seen 95s ago)".to_string(),
                ],
            }
        );
        assert_eq!(view.indicator.color(), "#4CAF50");
    }

    #[test]
    fn closed_parking_renders_red() {
        let view = render(&Ok(summary(false)), now());
        assert_eq!(view.indicator, Indicator::Closed);
        assert_eq!(view.parking_status_text, "Parking: CLOSED");
        assert_eq!(view.master_status_text, "Master ESP32: Offline");
        assert_eq!(view.indicator.color(), "#F44336");
    }

    #[test]
    fn failure_resets_counts_to_placeholders() {
        let view = render(&Err(FetchError::Server { status: 500 }), now());
        assert_eq!(view.indicator, Indicator::Unknown);
        assert_eq!(view.parking_status_text, "Parking: UNKNOWN");
        assert_eq!(view.total_spots, "--");
        assert_eq!(view.available_spots, "--");
        assert_eq!(view.occupied_spots, "--");
        assert_eq!(view.spot_health_text, "Offline: --  Sensor errors: --");
        assert_eq!(view.master_detail_text, None);
        assert_eq!(view.error.as_deref(), Some("Error: Server error: 500"));
        assert_eq!(view.last_updated, None);
        assert!(view.spot_lines.is_empty());
    }
}
