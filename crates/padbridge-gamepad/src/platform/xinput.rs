use super::{XInputPort, XInputState};

/// XInput through `xinput1_4.dll`. Every slot reads as empty elsewhere.
#[derive(Debug, Default)]
pub struct SystemXInput;

#[cfg(windows)]
impl XInputPort for SystemXInput {
    fn get_state(&mut self, slot: u32) -> Option<XInputState> {
        use windows_sys::Win32::UI::Input::XboxController::{XInputGetState, XINPUT_STATE};

        // FFI struct: must be zeroed before the call
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
        // SAFETY: `state` is a valid, writable XINPUT_STATE for the call.
        let ret = unsafe { XInputGetState(slot, &mut state) };
        if ret != 0 {
            return None;
        }
        let pad = state.Gamepad;
        Some(XInputState {
            packet: state.dwPacketNumber,
            buttons: pad.wButtons,
            left_trigger: pad.bLeftTrigger,
            right_trigger: pad.bRightTrigger,
            thumb_lx: pad.sThumbLX,
            thumb_ly: pad.sThumbLY,
            thumb_rx: pad.sThumbRX,
            thumb_ry: pad.sThumbRY,
        })
    }
}

#[cfg(not(windows))]
impl XInputPort for SystemXInput {
    fn get_state(&mut self, _slot: u32) -> Option<XInputState> {
        None
    }
}
