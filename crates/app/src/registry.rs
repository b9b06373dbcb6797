//! Device registry: sole owner of the configured devices and their state.
//!
//! Devices live in a `Vec` addressed by a stable [`DeviceKey`]; a lowercase
//! name index resolves case-insensitive lookups. The set is fixed at
//! construction.

use std::collections::HashMap;

use relayhub_domain::device::Device;
use relayhub_domain::error::{NotFoundError, RelayHubError, ValidationError};
use relayhub_domain::event::{DeviceEvent, DeviceEventKind, OffCause};
use relayhub_domain::time::Timestamp;
use relayhub_domain::usage::Usage;

use crate::ports::OutputDriver;

/// Stable handle to a device inside one [`DeviceRegistry`].
///
/// Only the registry hands these out, and the device set never changes, so
/// a key obtained from a registry is valid for that registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey(usize);

/// Owns every [`Device`] and drives their outputs.
pub struct DeviceRegistry<O> {
    devices: Vec<Device>,
    index: HashMap<String, DeviceKey>,
    output: O,
    outbox: Vec<DeviceEvent>,
}

impl<O: OutputDriver> DeviceRegistry<O> {
    /// Build the registry and drive every output low.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`] when two devices share a
    /// name (ignoring case), or any validation error of the devices.
    pub fn new(devices: Vec<Device>, output: O) -> Result<Self, RelayHubError> {
        let mut index = HashMap::with_capacity(devices.len());
        for (position, device) in devices.iter().enumerate() {
            device.validate()?;
            let key = device.name().to_lowercase();
            if index.insert(key, DeviceKey(position)).is_some() {
                return Err(ValidationError::DuplicateName(device.name().to_string()).into());
            }
        }

        for device in &devices {
            output.set_output(device.output(), false);
        }

        Ok(Self {
            devices,
            index,
            output,
            outbox: Vec::new(),
        })
    }

    /// Resolve a name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::NotFound`] when no device has that name.
    pub fn lookup(&self, name: &str) -> Result<DeviceKey, RelayHubError> {
        self.index
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: name.to_string(),
                }
                .into()
            })
    }

    #[must_use]
    pub fn get(&self, key: DeviceKey) -> &Device {
        &self.devices[key.0]
    }

    /// All devices in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceKey, &Device)> {
        self.devices
            .iter()
            .enumerate()
            .map(|(position, device)| (DeviceKey(position), device))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// The driver this registry writes to.
    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Switch a device on. No-op (returns `false`) when already on.
    #[tracing::instrument(skip(self))]
    pub fn turn_on(&mut self, key: DeviceKey, now: Timestamp) -> bool {
        let device = &mut self.devices[key.0];
        if !device.turn_on(now) {
            return false;
        }
        self.output.set_output(device.output(), true);
        tracing::info!(device = device.name(), output = %device.output(), "device turned on");
        self.outbox.push(DeviceEvent::for_device(
            device.name(),
            DeviceEventKind::TurnedOn,
            now,
        ));
        true
    }

    /// Switch a device off, folding its running usage. No-op (returns
    /// `false`) when already off.
    #[tracing::instrument(skip(self))]
    pub fn turn_off(&mut self, key: DeviceKey, now: Timestamp, cause: OffCause) -> bool {
        let device = &mut self.devices[key.0];
        if !device.turn_off(now) {
            return false;
        }
        self.output.set_output(device.output(), false);
        tracing::info!(
            device = device.name(),
            output = %device.output(),
            ?cause,
            usage_hours = device.accumulated_usage().hours(),
            "device turned off"
        );
        self.outbox.push(DeviceEvent::for_device(
            device.name(),
            DeviceEventKind::TurnedOff { cause },
            now,
        ));
        true
    }

    /// Set or replace the auto-off deadline of a device that is on.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DeviceOff`] when the device is off.
    #[tracing::instrument(skip(self))]
    pub fn schedule_auto_off(
        &mut self,
        key: DeviceKey,
        deadline: Timestamp,
        now: Timestamp,
    ) -> Result<(), RelayHubError> {
        let device = &mut self.devices[key.0];
        device.schedule_auto_off(deadline)?;
        tracing::info!(device = device.name(), %deadline, "auto-off scheduled");
        self.outbox.push(DeviceEvent::for_device(
            device.name(),
            DeviceEventKind::AutoOffScheduled { deadline },
            now,
        ));
        Ok(())
    }

    /// Usage of one device including its running ON period.
    #[must_use]
    pub fn current_usage(&self, key: DeviceKey, now: Timestamp) -> Usage {
        self.get(key).current_usage(now)
    }

    /// Zero every accumulator. State, activation times, and deadlines are
    /// left as they are.
    #[tracing::instrument(skip(self))]
    pub fn reset_all_usage(&mut self, now: Timestamp) {
        for device in &mut self.devices {
            device.reset_usage();
        }
        tracing::info!(devices = self.devices.len(), "usage counters reset");
        self.outbox
            .push(DeviceEvent::global(DeviceEventKind::UsageReset, now));
    }

    /// Keys of devices whose auto-off deadline is at or before `now`.
    #[must_use]
    pub fn due_auto_off(&self, now: Timestamp) -> Vec<DeviceKey> {
        self.iter()
            .filter(|(_, device)| device.is_auto_off_due(now))
            .map(|(key, _)| key)
            .collect()
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.outbox)
    }
}
