use super::{JoystickPort, JoystickPosition};

const JOYSTICK_SLOTS: u32 = 16;

/// Legacy multimedia joystick API (`joyGetPosEx`). Reports no devices
/// outside Windows.
#[derive(Debug, Default)]
pub struct SystemJoystick;

#[cfg(windows)]
mod imp {
    use windows_sys::Win32::Media::Multimedia::{
        joyGetDevCapsW, joyGetPosEx, JOYCAPSW, JOYINFOEX,
    };

    use super::JoystickPosition;
    use crate::platform::JOYSTICK_AXIS_CENTER;

    const JOYERR_NOERROR: u32 = 0;
    const JOY_RETURNALL: u32 = 0xFF;

    fn caps(slot: u32) -> Option<JOYCAPSW> {
        let mut caps: JOYCAPSW = unsafe { std::mem::zeroed() };
        let size = std::mem::size_of::<JOYCAPSW>() as u32;
        // SAFETY: `caps` is writable and `size` matches its layout.
        let ret = unsafe { joyGetDevCapsW(slot as usize, &mut caps, size) };
        (ret == JOYERR_NOERROR).then_some(caps)
    }

    pub(super) fn name(slot: u32) -> Option<String> {
        let caps = caps(slot)?;
        let len = caps
            .szPname
            .iter()
            .position(|c| *c == 0)
            .unwrap_or(caps.szPname.len());
        Some(String::from_utf16_lossy(&caps.szPname[..len]))
    }

    pub(super) fn position(slot: u32) -> Option<JoystickPosition> {
        let mut info: JOYINFOEX = unsafe { std::mem::zeroed() };
        info.dwSize = std::mem::size_of::<JOYINFOEX>() as u32;
        info.dwFlags = JOY_RETURNALL;
        // SAFETY: `info` is writable with `dwSize` set as the API requires.
        let ret = unsafe { joyGetPosEx(slot, &mut info) };
        if ret != JOYERR_NOERROR {
            return None;
        }
        // Axes the device lacks read as zero, which would pin the cursor.
        let axes = caps(slot).map_or(2, |caps| caps.wNumAxes);
        Some(JoystickPosition {
            x: info.dwXpos,
            y: info.dwYpos,
            z: if axes >= 3 { info.dwZpos } else { JOYSTICK_AXIS_CENTER },
            r: if axes >= 4 { info.dwRpos } else { JOYSTICK_AXIS_CENTER },
            buttons: info.dwButtons,
            pov: info.dwPOV,
        })
    }
}

#[cfg(not(windows))]
mod imp {
    use super::JoystickPosition;

    pub(super) fn name(_slot: u32) -> Option<String> {
        None
    }

    pub(super) fn position(_slot: u32) -> Option<JoystickPosition> {
        None
    }
}

impl JoystickPort for SystemJoystick {
    fn slot_count(&self) -> u32 {
        JOYSTICK_SLOTS
    }

    fn name(&mut self, slot: u32) -> Option<String> {
        imp::name(slot)
    }

    fn position(&mut self, slot: u32) -> Option<JoystickPosition> {
        imp::position(slot)
    }
}
