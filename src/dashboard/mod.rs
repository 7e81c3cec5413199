use crate::dashboard::view::DashboardView;

pub mod console_sink;
pub mod view;

/// Receives rendered dashboard state. Only ever called from the scheduler's
/// own task, so implementations need no internal locking.
pub trait DashboardSink: Send + 'static {
    /// Loading indicator for user-visible (forced) fetches.
    fn set_refreshing(&mut self, refreshing: bool);

    fn show(&mut self, view: DashboardView);
}
