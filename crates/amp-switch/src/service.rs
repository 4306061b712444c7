//! Host-facing lifecycle hooks.
//!
//! The host platform calls [`attach`](SwitchService::attach) when matching
//! configuration is discovered, [`detach`](SwitchService::detach) at
//! shutdown/removal, and [`resume`](SwitchService::resume) after a sleep
//! cycle. The service tolerates being called in any order: detach is
//! idempotent and resume on a never-attached service is a successful no-op.

use platform::lines::LineHost;

use crate::config::SwitchConfig;
use crate::error::AttachError;
use crate::switch::{AmpSwitch, InputErrorOf};

/// Lifecycle wrapper around an optional attached device.
pub struct SwitchService<H: LineHost> {
    device: Option<AmpSwitch<H>>,
}

impl<H: LineHost> SwitchService<H> {
    /// Create an unattached service.
    pub const fn new() -> Self {
        Self { device: None }
    }

    /// Attach a device from the host's lines and the given configuration.
    pub fn attach(
        &mut self,
        host: &mut H,
        config: &SwitchConfig,
    ) -> Result<(), AttachError<InputErrorOf<H>>> {
        if self.device.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        self.device = Some(AmpSwitch::attach(host, config)?);
        Ok(())
    }

    /// Force the outputs off and release the lines.
    ///
    /// Idempotent: calling it again (or without a prior successful attach)
    /// is a no-op.
    pub fn detach(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.detach();
            // Dropping the device releases the lines back to the host.
        }
    }

    /// Re-sample the input and re-drive the outputs.
    ///
    /// A successful no-op when no device is attached.
    pub fn resume(&mut self) {
        if let Some(device) = &mut self.device {
            device.resume();
        }
    }

    /// Process one coalesced edge on the attached device.
    ///
    /// Returns immediately when no device is attached; hosts run the edge
    /// loop only after a successful attach.
    pub async fn process_edge(&mut self) {
        if let Some(device) = &mut self.device {
            device.process_edge().await;
        }
    }

    /// Whether a device is currently attached.
    pub fn is_attached(&self) -> bool {
        self.device.is_some()
    }

    /// Mutable access to the attached device, if any.
    pub fn device_mut(&mut self) -> Option<&mut AmpSwitch<H>> {
        self.device.as_mut()
    }
}

impl<H: LineHost> Default for SwitchService<H> {
    fn default() -> Self {
        Self::new()
    }
}
