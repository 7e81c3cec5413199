use crate::dashboard::DashboardSink;
use crate::dashboard::view::{DashboardView, Indicator};
use tracing::{debug, info, warn};

/// Prints each dashboard view to stdout.
#[derive(Default)]
pub struct ConsoleSink {
    refreshing: bool,
    last_indicator: Option<Indicator>,
}

impl DashboardSink for ConsoleSink {
    fn set_refreshing(&mut self, refreshing: bool) {
        if self.refreshing != refreshing {
            debug!("Refreshing: {}", refreshing);
        }
        self.refreshing = refreshing;
    }

    fn show(&mut self, view: DashboardView) {
        if self.last_indicator != Some(view.indicator) {
            match view.indicator {
                Indicator::Unknown => warn!("Dashboard state changed to {:?}", view.indicator),
                _ => info!("Dashboard state changed to {:?}", view.indicator),
            }
        }
        self.last_indicator = Some(view.indicator);

        println!("────────────────────────────────────────────");
        println!("{}  [{}]", view.parking_status_text, view.indicator.color());
        println!("{}", view.master_status_text);
        if let Some(detail) = &view.master_detail_text {
            println!("{}", detail);
        }
        println!(
            "Total: {}  Available: {}  Occupied: {}",
            view.total_spots, view.available_spots, view.occupied_spots
        );
        println!("{}", view.spot_health_text);
        for line in &view.spot_lines {
            println!("  {}", line);
        }
        if let Some(error) = &view.error {
            println!("{}", error);
        }
        if let Some(last_updated) = &view.last_updated {
            println!("{}", last_updated);
        }
    }
}
