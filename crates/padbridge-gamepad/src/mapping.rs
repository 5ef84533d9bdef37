use crate::mask::RawButtons;
use crate::types::LogicalButton;

/// Logical-to-physical button assignment.
///
/// Every entry is a single-bit [`RawButtons`] mask in the raw space of the
/// backend that consumes it. Backends that cannot honor an entry replace it
/// with their own default through [`ButtonMapping::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonMapping {
    pub a: RawButtons,
    pub b: RawButtons,
    pub x: RawButtons,
    pub y: RawButtons,
    pub left_bumper: RawButtons,
    pub right_bumper: RawButtons,
    pub back: RawButtons,
    pub start: RawButtons,
    pub left_stick: RawButtons,
    pub right_stick: RawButtons,
}

impl Default for ButtonMapping {
    /// Joystick layout: buttons 1 to 10 in declaration order.
    fn default() -> Self {
        Self::from_bits([
            0x0001, 0x0002, 0x0004, 0x0008, 0x0010, 0x0020, 0x0040, 0x0080, 0x0100,
            0x0200,
        ])
    }
}

impl ButtonMapping {
    /// Build a mapping from raw values ordered as
    /// A, B, X, Y, LB, RB, Back, Start, LS, RS.
    pub const fn from_bits(bits: [u32; 10]) -> Self {
        Self {
            a: RawButtons::from_bits(bits[0]),
            b: RawButtons::from_bits(bits[1]),
            x: RawButtons::from_bits(bits[2]),
            y: RawButtons::from_bits(bits[3]),
            left_bumper: RawButtons::from_bits(bits[4]),
            right_bumper: RawButtons::from_bits(bits[5]),
            back: RawButtons::from_bits(bits[6]),
            start: RawButtons::from_bits(bits[7]),
            left_stick: RawButtons::from_bits(bits[8]),
            right_stick: RawButtons::from_bits(bits[9]),
        }
    }

    /// Raw mask assigned to a logical button. D-pad buttons are not mapped.
    pub fn get(&self, button: LogicalButton) -> Option<RawButtons> {
        Some(match button {
            LogicalButton::A => self.a,
            LogicalButton::B => self.b,
            LogicalButton::X => self.x,
            LogicalButton::Y => self.y,
            LogicalButton::LeftBumper => self.left_bumper,
            LogicalButton::RightBumper => self.right_bumper,
            LogicalButton::Back => self.back,
            LogicalButton::Start => self.start,
            LogicalButton::LeftStickClick => self.left_stick,
            LogicalButton::RightStickClick => self.right_stick,
            LogicalButton::DPadUp
            | LogicalButton::DPadDown
            | LogicalButton::DPadLeft
            | LogicalButton::DPadRight => return None,
        })
    }

    /// Assign a raw mask to a logical button. D-pad buttons are ignored.
    pub fn set(&mut self, button: LogicalButton, mask: RawButtons) {
        let slot = match button {
            LogicalButton::A => &mut self.a,
            LogicalButton::B => &mut self.b,
            LogicalButton::X => &mut self.x,
            LogicalButton::Y => &mut self.y,
            LogicalButton::LeftBumper => &mut self.left_bumper,
            LogicalButton::RightBumper => &mut self.right_bumper,
            LogicalButton::Back => &mut self.back,
            LogicalButton::Start => &mut self.start,
            LogicalButton::LeftStickClick => &mut self.left_stick,
            LogicalButton::RightStickClick => &mut self.right_stick,
            LogicalButton::DPadUp
            | LogicalButton::DPadDown
            | LogicalButton::DPadLeft
            | LogicalButton::DPadRight => return,
        };
        *slot = mask;
    }

    /// Iterate `(button, mask)` pairs in report order.
    pub fn entries(&self) -> impl Iterator<Item = (LogicalButton, RawButtons)> + '_ {
        LogicalButton::MAPPED
            .into_iter()
            .filter_map(|button| self.get(button).map(|mask| (button, mask)))
    }

    /// Replace every entry that is not a single bit accepted by `known`
    /// with the matching entry of `fallback`.
    pub fn resolve(
        &self,
        fallback: &ButtonMapping,
        known: impl Fn(RawButtons) -> bool,
    ) -> ButtonMapping {
        let mut resolved = *self;
        for button in LogicalButton::MAPPED {
            let Some(mask) = self.get(button) else {
                continue;
            };
            if !(mask.is_single() && known(mask)) {
                if let Some(default) = fallback.get(button) {
                    resolved.set(button, default);
                }
            }
        }
        resolved
    }

    /// Bumpers plus Start: the close gesture chord.
    pub fn close_chord(&self) -> RawButtons {
        self.left_bumper.union(self.right_bumper).union(self.start)
    }

    /// Both bumpers: the window switch chord.
    pub fn switch_chord(&self) -> RawButtons {
        self.left_bumper.union(self.right_bumper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_ten_joystick_buttons() {
        let mapping = ButtonMapping::default();
        assert_eq!(mapping.a, RawButtons::from_bits(0x0001));
        assert_eq!(mapping.start, RawButtons::from_bits(0x0080));
        assert_eq!(mapping.right_stick, RawButtons::from_bits(0x0200));
    }

    #[test]
    fn set_then_get() {
        let mut mapping = ButtonMapping::default();
        mapping.set(LogicalButton::B, RawButtons::from_bits(0x0800));
        assert_eq!(mapping.get(LogicalButton::B), Some(RawButtons::from_bits(0x0800)));
        assert_eq!(mapping.get(LogicalButton::DPadUp), None);
    }

    #[test]
    fn resolve_replaces_unknown_and_multi_bit_entries() {
        let mut configured = ButtonMapping::default();
        configured.a = RawButtons::from_bits(0x0003);
        configured.b = RawButtons::empty();
        let fallback = ButtonMapping::from_bits([
            0x1000, 0x2000, 0x4000, 0x8000, 0x0100, 0x0200, 0x0020, 0x0010, 0x0040,
            0x0080,
        ]);
        // Only bits at or above 0x0004 are known.
        let resolved = configured.resolve(&fallback, |mask| mask.bits() >= 0x0004);
        assert_eq!(resolved.a, fallback.a);
        assert_eq!(resolved.b, fallback.b);
        assert_eq!(resolved.x, configured.x);
        assert_eq!(resolved.start, configured.start);
    }

    #[test]
    fn chords_combine_bumpers_and_start() {
        let mapping = ButtonMapping::default();
        assert_eq!(mapping.switch_chord().bits(), 0x0030);
        assert_eq!(mapping.close_chord().bits(), 0x00B0);
    }
}
