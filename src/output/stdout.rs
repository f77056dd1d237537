use super::{OutputError, OutputHandler};
use crate::format::{Formattable, OutputFormat};
use crate::model::{Event, EventList, NO_EVENTS_FOUND};
use async_trait::async_trait;
use std::io::Write;

/// Prints events to stdout in the chosen format.
#[derive(Debug, Clone, Copy)]
pub struct StdoutHandler {
    format: OutputFormat,
}

impl StdoutHandler {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// An empty batch renders the same notice in every format.
    pub fn render(&self, events: &[Event]) -> Result<String, OutputError> {
        if events.is_empty() {
            return Ok(NO_EVENTS_FOUND.to_string());
        }
        Ok(EventList::new(events.to_vec()).format(self.format)?)
    }
}

#[async_trait]
impl OutputHandler for StdoutHandler {
    async fn write(&self, events: &[Event]) -> Result<(), OutputError> {
        let rendered = self.render(events)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end_matches('\n'))?;
        Ok(())
    }
}
