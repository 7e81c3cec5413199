use crate::dashboard::DashboardSink;
use crate::dashboard::view::render;
use crate::parking_api::error::FetchError;
use crate::parking_api::models::parking_snapshot::ParkingSnapshot;
use crate::parking_api::parking_client::ParkingApiTrait;
use crate::processors::summary_processor::summarize;
use chrono::Local;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active,
    Suspended,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerCommand {
    Start,
    ForceRefresh,
    Suspend,
    Resume,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Started by the host or user; drives the loading indicator.
    Forced,
    /// Started by the ticker; silent.
    Background,
}

struct InFlight {
    generation: u64,
    kind: FetchKind,
    handle: JoinHandle<()>,
}

struct FetchCompletion {
    generation: u64,
    result: Result<ParkingSnapshot, FetchError>,
}

/// Lifecycle contract handed to the host. Cheap to clone; every call is a
/// message to the scheduler task.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    pub async fn start(&self) -> anyhow::Result<()> {
        self.send(SchedulerCommand::Start).await
    }

    pub async fn force_refresh(&self) -> anyhow::Result<()> {
        self.send(SchedulerCommand::ForceRefresh).await
    }

    pub async fn suspend(&self) -> anyhow::Result<()> {
        self.send(SchedulerCommand::Suspend).await
    }

    pub async fn resume(&self) -> anyhow::Result<()> {
        self.send(SchedulerCommand::Resume).await
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.send(SchedulerCommand::Stop).await
    }

    async fn send(&self, command: SchedulerCommand) -> anyhow::Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("Poll scheduler has already stopped"))
    }
}

/// Drives fetch -> summarize -> render on a fixed cadence.
///
/// The scheduler task is the only owner of the sink. Fetches run in their
/// own tasks and report back over a channel tagged with a generation
/// number; anything that doesn't match the current in-flight generation is
/// dropped, so cancelled fetches can never reach the sink.
pub struct PollScheduler<T, S>
where
    T: ParkingApiTrait + Clone + Send + Sync + 'static,
    S: DashboardSink,
{
    client: T,
    sink: S,
    refresh_interval: Duration,
    state: SchedulerState,
    ticker: Option<Interval>,
    in_flight: Option<InFlight>,
    generation: u64,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl<T, S> PollScheduler<T, S>
where
    T: ParkingApiTrait + Clone + Send + Sync + 'static,
    S: DashboardSink,
{
    pub fn new(client: T, sink: S, refresh_interval: Duration) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            client,
            sink,
            refresh_interval,
            state: SchedulerState::Idle,
            ticker: None,
            in_flight: None,
            generation: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Moves the scheduler onto its own task. The task ends on `stop()` (or
    /// once every handle is dropped) and hands the sink back.
    pub fn spawn(self, command_channel_size: usize) -> (SchedulerHandle, JoinHandle<S>) {
        let (tx, rx) = mpsc::channel(command_channel_size);
        let join = tokio::spawn(self.run(rx));
        (SchedulerHandle { tx }, join)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<SchedulerCommand>) -> S {
        while self.state != SchedulerState::Stopped {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    // every handle dropped
                    None => self.stop(),
                },
                _ = next_tick(&mut self.ticker) => self.request_fetch(FetchKind::Background),
                Some(completion) = self.completion_rx.recv() => self.complete(completion),
            }
        }
        self.sink
    }

    fn handle_command(&mut self, command: SchedulerCommand) {
        debug!("Scheduler command {:?} in state {:?}", command, self.state);
        match command {
            SchedulerCommand::Start | SchedulerCommand::Resume => self.activate(),
            SchedulerCommand::ForceRefresh => {
                if self.state == SchedulerState::Active {
                    self.request_fetch(FetchKind::Forced);
                } else {
                    debug!("Ignoring refresh while {:?}", self.state);
                }
            }
            SchedulerCommand::Suspend => self.suspend(),
            SchedulerCommand::Stop => self.stop(),
        }
    }

    fn activate(&mut self) {
        // replaces any existing ticker, so there is never more than one
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.refresh_interval, self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.state = SchedulerState::Active;
        info!("Polling every {}ms", self.refresh_interval.as_millis());
        self.request_fetch(FetchKind::Forced);
    }

    fn suspend(&mut self) {
        if self.state != SchedulerState::Active {
            return;
        }
        self.ticker = None;
        if self.cancel_in_flight() == Some(FetchKind::Forced) {
            self.sink.set_refreshing(false);
        }
        self.state = SchedulerState::Suspended;
        info!("Polling suspended");
    }

    // Teardown: the sink is not touched again.
    fn stop(&mut self) {
        self.ticker = None;
        self.cancel_in_flight();
        self.state = SchedulerState::Stopped;
        info!("Polling stopped");
    }

    fn cancel_in_flight(&mut self) -> Option<FetchKind> {
        let in_flight = self.in_flight.take()?;
        in_flight.handle.abort();
        debug!("Cancelled fetch generation {}", in_flight.generation);
        Some(in_flight.kind)
    }

    fn request_fetch(&mut self, kind: FetchKind) {
        if let Some(in_flight) = &mut self.in_flight {
            if kind == FetchKind::Forced && in_flight.kind == FetchKind::Background {
                in_flight.kind = FetchKind::Forced;
                self.sink.set_refreshing(true);
            } else {
                debug!(
                    "Skipping {:?} fetch, generation {} still in flight",
                    kind, in_flight.generation
                );
            }
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        if kind == FetchKind::Forced {
            self.sink.set_refreshing(true);
        }

        let client = self.client.clone();
        let completion_tx = self.completion_tx.clone();
        let handle = tokio::spawn(async move {
            let result = client.fetch_parking_data().await;
            // receiver only goes away on teardown
            let _ = completion_tx.send(FetchCompletion { generation, result });
        });
        trace!("Started {:?} fetch generation {}", kind, generation);
        self.in_flight = Some(InFlight {
            generation,
            kind,
            handle,
        });
    }

    fn complete(&mut self, completion: FetchCompletion) {
        let Some(in_flight) = self
            .in_flight
            .take_if(|f| f.generation == completion.generation)
        else {
            debug!("Dropping result of stale fetch generation {}", completion.generation);
            return;
        };

        if in_flight.kind == FetchKind::Forced {
            self.sink.set_refreshing(false);
        }

        let outcome = completion.result.map(|snapshot| summarize(&snapshot));
        match &outcome {
            Ok(summary) => info!(
                "Spots: {} total, {} available, {} occupied, parking open: {}",
                summary.total, summary.available, summary.occupied, summary.parking_open
            ),
            Err(e) => warn!("Fetch failed: {}", e),
        }
        self.sink.show(render(&outcome, Local::now()));
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
