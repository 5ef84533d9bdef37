use hidapi::{HidApi, HidDevice};

use super::HidPort;
use crate::error::{Error, Result};

/// Raw HID access through `hidapi`.
#[derive(Default)]
pub struct HidapiPort {
    api: Option<HidApi>,
    device: Option<HidDevice>,
}

impl HidapiPort {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Create the hidapi context on first use, refresh its device list after.
fn ensure_api(slot: &mut Option<HidApi>) -> Result<&mut HidApi> {
    if let Some(api) = slot.as_mut() {
        api.refresh_devices().map_err(|e| Error::Hid(e.to_string()))?;
    } else {
        *slot = Some(HidApi::new().map_err(|e| Error::BackendInit(e.to_string()))?);
    }
    slot.as_mut()
        .ok_or_else(|| Error::BackendInit("hidapi unavailable".into()))
}

impl HidPort for HidapiPort {
    fn open(&mut self, vendor_id: u16, product_ids: &[u16]) -> Result<Option<u16>> {
        self.close();
        let api = ensure_api(&mut self.api)?;
        for info in api.device_list() {
            if info.vendor_id() != vendor_id || !product_ids.contains(&info.product_id()) {
                continue;
            }
            match info.open_device(api) {
                Ok(device) => {
                    device
                        .set_blocking_mode(false)
                        .map_err(|e| Error::Hid(e.to_string()))?;
                    let product_id = info.product_id();
                    self.device = Some(device);
                    return Ok(Some(product_id));
                }
                Err(e) => {
                    log::debug!(
                        "cannot open hid device {:04x}:{:04x}: {e}",
                        info.vendor_id(),
                        info.product_id()
                    );
                }
            }
        }
        Ok(None)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(device) = self.device.as_ref() else {
            return Err(Error::Hid("device is not open".into()));
        };
        device.read(buf).map_err(|e| Error::Hid(e.to_string()))
    }

    fn close(&mut self) {
        self.device = None;
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }
}
