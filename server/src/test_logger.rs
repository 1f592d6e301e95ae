#![cfg(test)]

use std::sync::{Mutex, Once};

use log::{Log, Metadata, Record};

pub struct TestLogger {
    pub messages: Mutex<Vec<String>>,
}

pub static LOGGER: TestLogger = TestLogger {
    messages: Mutex::new(Vec::new()),
};

pub static INIT: Once = Once::new();

impl Log for TestLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format!("{} {}", record.level(), record.args());
            match self.messages.lock() {
                Ok(mut messages) => messages.push(line),
                Err(poisoned) => poisoned.into_inner().push(line),
            }
        }
    }

    fn flush(&self) {}
}
