//! In-memory fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::DateTime;
use relayhub_domain::device::{Device, OutputHandle};
use relayhub_domain::time::Timestamp;

use crate::ports::OutputDriver;

/// Output driver that remembers the last level of every handle.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    levels: Mutex<HashMap<OutputHandle, bool>>,
    writes: Mutex<usize>,
}

impl RecordingOutput {
    pub fn level(&self, output: OutputHandle) -> Option<bool> {
        self.levels.lock().unwrap().get(&output).copied()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl OutputDriver for RecordingOutput {
    fn set_output(&self, output: OutputHandle, asserted: bool) {
        self.levels.lock().unwrap().insert(output, asserted);
        *self.writes.lock().unwrap() += 1;
    }
}

pub fn at(secs: i64) -> Timestamp {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn devices(specs: &[(&str, u8)]) -> Vec<Device> {
    specs
        .iter()
        .map(|(name, pin)| {
            Device::builder()
                .name(*name)
                .output(OutputHandle::new(*pin))
                .build()
                .unwrap()
        })
        .collect()
}
