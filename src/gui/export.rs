//! Chart export running off the UI thread.

use crate::charts::{DashboardData, ExportSummary, StaticChartRenderer};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Export result from background thread
pub enum ExportResult {
    Complete(ExportSummary),
    Error(String),
}

/// One export in flight.
pub struct ExportTask {
    rx: Receiver<ExportResult>,
}

impl ExportTask {
    pub fn spawn(data: DashboardData, dir: PathBuf, size: (u32, u32)) -> Self {
        let (tx, rx) = channel();
        thread::spawn(move || {
            let result = match StaticChartRenderer::export(&data, &dir, size) {
                Ok(summary) => ExportResult::Complete(summary),
                Err(e) => ExportResult::Error(format!("{:#}", e)),
            };
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// The result once the export has finished.
    pub fn poll(&self) -> Option<ExportResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(ExportResult::Error("Export thread stopped".to_string()))
            }
        }
    }
}
