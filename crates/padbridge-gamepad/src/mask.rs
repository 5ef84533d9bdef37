use std::fmt;

use crate::error::{Error, Result};

/// Raw, hardware-native button state: one bit per physical button.
///
/// The meaning of each bit belongs to the backend that produced it. Masks are
/// only ever tested with bitwise intersection, there is deliberately no
/// "is this button" equality helper.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawButtons(u32);

impl RawButtons {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether any bit of `other` is set in `self`.
    #[inline]
    pub const fn intersects(&self, other: RawButtons) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains_all(&self, other: RawButtons) -> bool {
        !other.is_empty() && self.0 & other.0 == other.0
    }

    /// Whether exactly one bit is set.
    #[inline]
    pub const fn is_single(&self) -> bool {
        self.0.count_ones() == 1
    }

    /// Bits set in `self` that were not set in `previous`.
    #[inline]
    pub const fn pressed_since(&self, previous: RawButtons) -> RawButtons {
        RawButtons(self.0 & !previous.0)
    }

    #[inline]
    pub const fn union(&self, other: RawButtons) -> RawButtons {
        RawButtons(self.0 | other.0)
    }

    /// Iterate the set bits as single-bit masks, lowest first.
    pub fn iter_bits(&self) -> impl Iterator<Item = RawButtons> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let low = rest & rest.wrapping_neg();
            rest &= !low;
            Some(RawButtons(low))
        })
    }
}

impl fmt::Debug for RawButtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawButtons({:#06x})", self.0)
    }
}

impl fmt::Display for RawButtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match button_name(*self) {
            Some(name) => f.write_str(&name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}

/// Human name of a single-bit raw mask: `0x0001` is `B1`, `0x8000` is `B16`.
pub fn button_name(mask: RawButtons) -> Option<String> {
    if !mask.is_single() {
        return None;
    }
    Some(format!("B{}", mask.bits().trailing_zeros() + 1))
}

/// Parse a raw button name back into its mask.
///
/// Accepts the `B<n>` form produced by [`button_name`] and single-bit hex
/// literals such as `0x0010`.
pub fn parse_button_name(input: &str) -> Result<RawButtons> {
    let input = input.trim();
    let invalid = || Error::InvalidButtonName(input.to_string());

    let mask = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else if let Some(index) = input
        .strip_prefix('B')
        .or_else(|| input.strip_prefix('b'))
    {
        let index: u32 = index.parse().map_err(|_| invalid())?;
        if !(1..=32).contains(&index) {
            return Err(invalid());
        }
        1u32 << (index - 1)
    } else {
        return Err(invalid());
    };

    let mask = RawButtons::from_bits(mask);
    if !mask.is_single() {
        return Err(Error::NotSingleBit(mask.bits()));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_sixteen_buttons() {
        for index in 0..16 {
            let mask = RawButtons::from_bits(1 << index);
            let name = button_name(mask).unwrap();
            assert_eq!(name, format!("B{}", index + 1));
            assert_eq!(parse_button_name(&name).unwrap(), mask);
        }
    }

    #[test]
    fn name_of_extreme_bits() {
        assert_eq!(button_name(RawButtons::from_bits(0x0001)).as_deref(), Some("B1"));
        assert_eq!(button_name(RawButtons::from_bits(0x8000)).as_deref(), Some("B16"));
    }

    #[test]
    fn multi_bit_masks_have_no_name() {
        assert_eq!(button_name(RawButtons::from_bits(0x0003)), None);
        assert_eq!(button_name(RawButtons::empty()), None);
    }

    #[test]
    fn parses_hex_literals() {
        assert_eq!(
            parse_button_name("0x1000").unwrap(),
            RawButtons::from_bits(0x1000)
        );
        assert!(matches!(
            parse_button_name("0x0011"),
            Err(Error::NotSingleBit(0x11))
        ));
    }

    #[test]
    fn rejects_garbage_names() {
        assert!(parse_button_name("B0").is_err());
        assert!(parse_button_name("B33").is_err());
        assert!(parse_button_name("X1").is_err());
        assert!(parse_button_name("").is_err());
    }

    #[test]
    fn pressed_since_reports_new_bits_only() {
        let before = RawButtons::from_bits(0b0101);
        let after = RawButtons::from_bits(0b0110);
        assert_eq!(after.pressed_since(before), RawButtons::from_bits(0b0010));
    }

    #[test]
    fn iter_bits_yields_single_masks_in_order() {
        let bits: Vec<u32> = RawButtons::from_bits(0b1010_0001)
            .iter_bits()
            .map(|b| b.bits())
            .collect();
        assert_eq!(bits, vec![0b1, 0b10_0000, 0b1000_0000]);
    }

    #[test]
    fn contains_all_requires_every_bit() {
        let held = RawButtons::from_bits(0b0111);
        assert!(held.contains_all(RawButtons::from_bits(0b0011)));
        assert!(!held.contains_all(RawButtons::from_bits(0b1001)));
        assert!(!held.contains_all(RawButtons::empty()));
    }
}
