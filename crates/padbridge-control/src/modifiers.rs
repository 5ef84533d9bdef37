use crate::key::Key;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Modifier {
    Ctrl,
    Meta,
    Shift,
    Alt,
}

impl Modifier {
    pub const CTRL: u8 = 1 << 0;
    pub const META: u8 = 1 << 1;
    pub const SHIFT: u8 = 1 << 2;
    pub const ALT: u8 = 1 << 3;

    /// Press order used when performing a combo.
    pub const ALL: [Modifier; 4] =
        [Modifier::Ctrl, Modifier::Meta, Modifier::Shift, Modifier::Alt];

    pub const fn to_bitmap(&self) -> u8 {
        match self {
            Modifier::Ctrl => Self::CTRL,
            Modifier::Meta => Self::META,
            Modifier::Shift => Self::SHIFT,
            Modifier::Alt => Self::ALT,
        }
    }

    pub const fn key(&self) -> Key {
        match self {
            Modifier::Ctrl => Key::Control,
            Modifier::Meta => Key::Meta,
            Modifier::Shift => Key::Shift,
            Modifier::Alt => Key::Alt,
        }
    }
}

impl TryFrom<Key> for Modifier {
    type Error = Key;

    fn try_from(key: Key) -> Result<Self, Self::Error> {
        match key {
            Key::Control => Ok(Modifier::Ctrl),
            Key::Meta => Ok(Modifier::Meta),
            Key::Shift => Ok(Modifier::Shift),
            Key::Alt => Ok(Modifier::Alt),
            other => Err(other),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn add(&mut self, modifier: Modifier) {
        self.0 |= modifier.to_bitmap();
    }

    pub const fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.to_bitmap() != 0
    }

    /// Iterate the contained modifiers in press order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }
}
