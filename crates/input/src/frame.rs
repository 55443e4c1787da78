use rewind_common::TickId;
use serde::{Deserialize, Serialize};

const HORIZONTAL_SHIFT: u8 = 0;
const VERTICAL_SHIFT: u8 = 2;
const ROTATION_SHIFT: u8 = 4;
const AXIS_MASK: u8 = 0b11;
const ATTACK_BIT: u8 = 1 << 6;

/// One discrete input axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Axis {
    /// Quantize a raw device reading by its sign. NaN reads as neutral.
    pub fn from_raw(value: f32) -> Self {
        if value > 0.0 {
            Axis::Positive
        } else if value < 0.0 {
            Axis::Negative
        } else {
            Axis::Neutral
        }
    }

    pub fn value(self) -> f32 {
        match self {
            Axis::Negative => -1.0,
            Axis::Neutral => 0.0,
            Axis::Positive => 1.0,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Axis::Neutral
    }

    fn bits(self) -> u8 {
        match self {
            Axis::Neutral => 0b00,
            Axis::Positive => 0b01,
            Axis::Negative => 0b10,
        }
    }

    // 0b11 is not produced by `bits`; decode it as neutral rather than guess a direction.
    fn from_bits(bits: u8) -> Self {
        match bits & AXIS_MASK {
            0b01 => Axis::Positive,
            0b10 => Axis::Negative,
            _ => Axis::Neutral,
        }
    }
}

/// Networked intents of one tick packed into a single byte.
///
/// Layout, low bit first: horizontal axis (2 bits), vertical axis (2 bits),
/// camera rotation (2 bits), attack (1 bit), one reserved bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputFlags(u8);

impl InputFlags {
    pub const EMPTY: InputFlags = InputFlags(0);

    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn to_byte(self) -> u8 {
        self.0
    }

    pub fn with_movement(self, horizontal: Axis, vertical: Axis) -> Self {
        let cleared =
            self.0 & !((AXIS_MASK << HORIZONTAL_SHIFT) | (AXIS_MASK << VERTICAL_SHIFT));
        Self(
            cleared | (horizontal.bits() << HORIZONTAL_SHIFT) | (vertical.bits() << VERTICAL_SHIFT),
        )
    }

    pub fn with_rotation(self, rotation: Axis) -> Self {
        let cleared = self.0 & !(AXIS_MASK << ROTATION_SHIFT);
        Self(cleared | (rotation.bits() << ROTATION_SHIFT))
    }

    pub fn with_attack(self, attack: bool) -> Self {
        if attack {
            Self(self.0 | ATTACK_BIT)
        } else {
            Self(self.0 & !ATTACK_BIT)
        }
    }

    /// Strafe axis: positive moves along the camera's right vector.
    pub fn horizontal(self) -> Axis {
        Axis::from_bits(self.0 >> HORIZONTAL_SHIFT)
    }

    /// Forward axis: positive moves along the camera's forward vector.
    pub fn vertical(self) -> Axis {
        Axis::from_bits(self.0 >> VERTICAL_SHIFT)
    }

    pub fn rotation(self) -> Axis {
        Axis::from_bits(self.0 >> ROTATION_SHIFT)
    }

    pub fn attack(self) -> bool {
        self.0 & ATTACK_BIT != 0
    }

    pub fn has_movement(self) -> bool {
        !self.horizontal().is_neutral() || !self.vertical().is_neutral()
    }

    pub fn has_rotation(self) -> bool {
        !self.rotation().is_neutral()
    }

    /// True when the byte carries no networked intent at all.
    pub fn is_empty(self) -> bool {
        !self.has_movement() && !self.has_rotation() && !self.attack()
    }
}

/// An input tagged with the tick id it was issued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub id: TickId,
    pub flags: InputFlags,
}

impl InputFrame {
    pub fn new(id: TickId, flags: InputFlags) -> Self {
        Self { id, flags }
    }
}
