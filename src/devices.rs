//! Known devices on the local network and their block state.

use crate::traffic::Device;

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        DeviceRegistry { devices }
    }

    /// Flip the block flag for `ip` and return the new state.
    ///
    /// Returns `None` and changes nothing when no device has that address.
    pub fn toggle_block(&mut self, ip: &str) -> Option<bool> {
        let device = self.devices.iter_mut().find(|d| d.ip == ip)?;
        device.is_blocked = !device.is_blocked;
        tracing::info!(ip, blocked = device.is_blocked, "device block toggled");
        Some(device.is_blocked)
    }

    pub fn online_count(&self) -> usize {
        self.devices.len()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::mock_devices;

    #[test]
    fn test_toggle_block_flips() {
        let mut reg = DeviceRegistry::new(mock_devices(0));
        assert_eq!(reg.toggle_block("192.168.1.10"), Some(true));
        assert!(reg.devices()[0].is_blocked);
        assert!(!reg.devices()[1].is_blocked);
        assert_eq!(reg.toggle_block("192.168.1.10"), Some(false));
    }

    #[test]
    fn test_toggle_unknown_ip() {
        let mut reg = DeviceRegistry::new(mock_devices(0));
        assert_eq!(reg.toggle_block("10.9.9.9"), None);
        assert!(reg.devices().iter().all(|d| !d.is_blocked));
        assert_eq!(reg.online_count(), 2);
    }
}
