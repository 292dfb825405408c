//! Schedule sink trait and in-memory implementation.

use std::sync::{Arc, Mutex};

use crate::errors::{Error, Result};
use crate::schedule::Schedule;

/// Receives finished schedules.
///
/// The engine hands over structured values only; headers, number and date
/// formatting belong to the sink.
pub trait ScheduleSink {
    fn write_schedule(&mut self, schedule: &Schedule) -> Result<()>;

    /// Writes several schedules in order.
    ///
    /// Default implementation calls `write_schedule()` for each one and stops
    /// at the first failure.
    fn write_batch(&mut self, schedules: &[Schedule]) -> Result<()> {
        for schedule in schedules {
            self.write_schedule(schedule)?;
        }
        Ok(())
    }
}

/// Collects schedules in memory. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryScheduleSink {
    schedules: Arc<Mutex<Vec<Schedule>>>,
}

impl MemoryScheduleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected schedules.
    pub fn schedules(&self) -> Vec<Schedule> {
        self.schedules
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.schedules.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScheduleSink for MemoryScheduleSink {
    fn write_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        self.schedules
            .lock()
            .map_err(|_| Error::Sink("memory sink lock poisoned".to_string()))?
            .push(schedule.clone());
        Ok(())
    }
}
