use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Gestures a button is allowed to produce. Any subset is legal; the empty
    /// mask registers a button that never emits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GestureMask: u8 {
        const CLICK = 0x01;
        const DOUBLE_CLICK = 0x02;
        const LONG_PRESS = 0x04;
        const REPEAT = 0x08;
    }
}

impl GestureMask {
    pub(crate) fn has_held_gesture(self) -> bool {
        self.intersects(Self::LONG_PRESS | Self::REPEAT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GestureKind {
    Click = 0x01,
    DoubleClick = 0x02,
    LongPress = 0x04,
    Repeat = 0x08,
    Release = 0x10,
}

impl GestureKind {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Click),
            0x02 => Some(Self::DoubleClick),
            0x04 => Some(Self::LongPress),
            0x08 => Some(Self::Repeat),
            0x10 => Some(Self::Release),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "double_click",
            Self::LongPress => "long_press",
            Self::Repeat => "repeat",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a button is in its press/release protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureState {
    #[default]
    Released,
    ArmedSingleOrDouble,
    ArmedDoubleOnly,
    ArmedSingleOnly,
    ArmedLongOrRepeat,
    ArmedLongOnly,
    ArmedRepeatOnly,
}

/// Identity of an input source, used to reject registering the same source
/// twice. Callers pick the values (pin number, matrix position, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src{}", self.0)
    }
}

/// Generation-checked reference to a registered button.
///
/// A handle goes stale once its button is unregistered, even if the slot is
/// later reused by another registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonHandle {
    pub(crate) index: u16,
    pub(crate) generation: u16,
}

impl ButtonHandle {
    pub const fn index(self) -> u16 {
        self.index
    }

    pub const fn generation(self) -> u16 {
        self.generation
    }
}

impl fmt::Display for ButtonHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    pub handle: ButtonHandle,
    pub kind: GestureKind,
    pub click_count: u8,
}

/// Filler for unused queue slots; never produced by a scan.
impl Default for ButtonEvent {
    fn default() -> Self {
        Self::new(ButtonHandle::default(), GestureKind::Release, 0)
    }
}

impl ButtonEvent {
    pub const fn new(handle: ButtonHandle, kind: GestureKind, click_count: u8) -> Self {
        Self {
            handle,
            kind,
            click_count,
        }
    }
}
