use std::fmt;

use enigo::{
    Direction::{Click, Press, Release},
    Enigo, InputResult, Keyboard,
};
use serde::de::{value::Error as DeError, IntoDeserializer, Visitor};
use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

use crate::key::{parse_key, Key};
use crate::{Modifier, Modifiers};

/// A keyboard shortcut: modifiers held while the keys are clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub keys: SmallVec<[Key; 4]>,
}

impl KeyCombo {
    pub fn from_key(key: Key) -> Self {
        let mut keys: SmallVec<[Key; 4]> = SmallVec::new();
        keys.push(key);
        Self {
            modifiers: Modifiers::empty(),
            keys,
        }
    }

    /// The window switcher shortcut, `alt+tab`.
    pub fn alt_tab() -> Self {
        let mut combo = Self::from_key(Key::Tab);
        combo.modifiers.add(Modifier::Alt);
        combo
    }

    /// Press the modifiers, click every key, release the modifiers.
    ///
    /// Modifiers are released even when a key click fails.
    pub fn perform(&self, enigo: &mut Enigo) -> InputResult<()> {
        for modifier in self.modifiers.iter() {
            enigo.key(modifier.key().into(), Press)?;
        }
        let clicked = self
            .keys
            .iter()
            .try_for_each(|key| enigo.key(key.into(), Click));
        for modifier in self.modifiers.iter() {
            enigo.key(modifier.key().into(), Release)?;
        }
        clicked
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.modifiers.iter().map(|modifier| modifier.key());
        for (i, key) in modifiers.chain(self.keys.iter().copied()).enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for KeyCombo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyComboVisitor;

        impl Visitor<'_> for KeyComboVisitor {
            type Value = KeyCombo;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("key combination string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let mut modifiers = Modifiers::empty();
                let mut keys: SmallVec<[Key; 4]> = SmallVec::new();
                for part in v.split('+') {
                    let part = part.trim();
                    let Some(key) = parse_key(part) else {
                        return Err(E::custom(format!("Invalid key: {part}")));
                    };
                    match Modifier::try_from(key) {
                        Ok(modifier) => modifiers.add(modifier),
                        Err(key) => keys.push(key),
                    }
                }
                if keys.is_empty() {
                    return Err(E::custom(format!("No key in combo: {v}")));
                }

                Ok(KeyCombo { modifiers, keys })
            }
        }

        deserializer.deserialize_str(KeyComboVisitor)
    }
}

impl std::str::FromStr for KeyCombo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCombo::deserialize(s.into_deserializer())
            .map_err(|e: DeError| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_tab_parses() {
        let kc: KeyCombo = "alt+tab".parse().unwrap();
        assert_eq!(kc, KeyCombo::alt_tab());
    }

    #[test]
    fn test_multiple_modifiers() {
        let kc: KeyCombo = "ctrl + shift + escape".parse().unwrap();
        assert!(kc.modifiers.contains(Modifier::Ctrl));
        assert!(kc.modifiers.contains(Modifier::Shift));
        assert_eq!(kc.keys.as_slice(), &[Key::Escape]);
    }

    #[test]
    fn test_invalid_key() {
        let err = "alt+foo".parse::<KeyCombo>().unwrap_err();
        assert!(err.contains("Invalid key: foo"));
    }

    #[test]
    fn test_modifiers_only_is_rejected() {
        assert!("ctrl+alt".parse::<KeyCombo>().is_err());
        assert!("".parse::<KeyCombo>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyCombo::alt_tab().to_string(), "alt+tab");
        let kc: KeyCombo = "meta+d".parse().unwrap();
        assert_eq!(kc.to_string(), "meta+d");
    }

    #[test]
    fn test_display_parses_back() {
        let kc: KeyCombo = "shift+ctrl+page_up+up".parse().unwrap();
        assert_eq!(kc.to_string(), "ctrl+shift+page_up+up");
        assert_eq!(kc.to_string().parse::<KeyCombo>().unwrap(), kc);
    }
}
