//! ASCII to HID keycode translation for the demo script.
//!
//! Covers exactly what the script needs on a standard US layout:
//! letters, space, and `!` (shifted digit 1). Anything else has no
//! mapping and is typed as a no-op key by the sequencer.

use super::keyboard::{KEY_1, KEY_A, KEY_SPACE, MODIFIER_LEFT_SHIFT};

/// A single key press: usage code plus modifier bitfield.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPress {
    pub keycode: u8,
    pub modifier: u8,
}

impl KeyPress {
    /// The no-op key: keycode 0, no modifier. Pressing it produces no
    /// character on the host.
    pub const NONE: Self = Self {
        keycode: 0,
        modifier: 0,
    };
}

/// Map a printable ASCII byte to the key press that produces it.
///
/// Returns `None` for characters the demo layout does not cover.
pub fn ascii_to_key(c: u8) -> Option<KeyPress> {
    match c {
        b'a'..=b'z' => Some(KeyPress {
            keycode: KEY_A + (c - b'a'),
            modifier: 0,
        }),
        b'A'..=b'Z' => Some(KeyPress {
            keycode: KEY_A + (c - b'A'),
            modifier: MODIFIER_LEFT_SHIFT,
        }),
        b' ' => Some(KeyPress {
            keycode: KEY_SPACE,
            modifier: 0,
        }),
        b'!' => Some(KeyPress {
            keycode: KEY_1,
            modifier: MODIFIER_LEFT_SHIFT,
        }),
        _ => None,
    }
}
