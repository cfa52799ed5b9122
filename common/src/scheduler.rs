use std::{future::Future, time::Duration};

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info};

/// A repeating background task. Runs once straight away, then every `period`.
pub struct Scheduler;

/// Stops a task started by [`Scheduler::spawn`]. A run already in progress
/// finishes before the task exits. Dropping the handle stops the task too.
pub struct ScheduleHandle {
    name: &'static str,
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Scheduler {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut task: F) -> ScheduleHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = &mut cancelled => break,
                }

                debug!("Running scheduled task {name}");
                task().await;
            }
        });

        info!("Scheduled {name} every {:?}", period);
        ScheduleHandle {
            name,
            cancel,
            task: join,
        }
    }
}

impl ScheduleHandle {
    pub async fn cancel(self) {
        // The task may already be gone, in which case there is nothing to stop.
        let _ = self.cancel.send(());
        let _ = self.task.await;
        info!("Stopped {}", self.name);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
