pub mod calibration;
pub mod computer;
pub mod rotation;
pub mod types;

pub use computer::OrientationComputer;
pub use types::{Entry, RawSample};

use tokio::sync::mpsc;

/// Queue depth for inbound samples and sync toggles.
const CHANNEL_CAPACITY: usize = 10;

/// Handle to the background orientation pipeline.
///
/// A single task owns the calibration state and merges the two inbound
/// event kinds (raw samples, sync toggles). There is no priority
/// between the two channels; interleaving is whatever the scheduler
/// produces. Computed entries flow out on the channel given to
/// [`OrientationPipeline::spawn`].
pub struct OrientationPipeline {
    sample_tx: mpsc::Sender<RawSample>,
    sync_tx: mpsc::Sender<bool>,
    _task: tokio::task::JoinHandle<()>,
}

impl OrientationPipeline {
    /// Start the pipeline task. Entries are delivered on `entry_tx`.
    pub fn spawn(entry_tx: mpsc::Sender<Entry>) -> Self {
        let (sample_tx, sample_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (sync_tx, sync_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(pipeline_loop(sample_rx, sync_rx, entry_tx));
        Self {
            sample_tx,
            sync_tx,
            _task: task,
        }
    }

    /// Sender for parsed raw samples.
    pub fn sample_sender(&self) -> mpsc::Sender<RawSample> {
        self.sample_tx.clone()
    }

    /// Sender for calibration toggles (`true` = calibrate now).
    pub fn sync_sender(&self) -> mpsc::Sender<bool> {
        self.sync_tx.clone()
    }
}

async fn pipeline_loop(
    mut sample_rx: mpsc::Receiver<RawSample>,
    mut sync_rx: mpsc::Receiver<bool>,
    entry_tx: mpsc::Sender<Entry>,
) {
    let mut computer = OrientationComputer::new();
    let mut processed: u64 = 0;

    loop {
        tokio::select! {
            sample = sample_rx.recv() => {
                let Some(sample) = sample else { break };
                let entry = computer.process(&sample);
                processed += 1;
                tracing::trace!(heading = entry.heading, pitch = entry.pitch, "Computed entry");
                if entry_tx.send(entry).await.is_err() {
                    tracing::warn!("Entry consumer gone, stopping pipeline");
                    break;
                }
            }
            Some(sync) = sync_rx.recv() => {
                computer.set_sync(sync);
            }
        }
    }

    tracing::debug!(processed, "Orientation pipeline stopped");
}
