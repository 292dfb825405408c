//! Schedule sinks - consumers that lay a finished schedule out somewhere.

mod csv_sink;
mod schedule_sink;

pub use csv_sink::CsvScheduleSink;
pub use schedule_sink::{MemoryScheduleSink, ScheduleSink};
