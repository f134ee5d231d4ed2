//! USB HID keyboard report (boot layout, report-id tagged).
//!
//! On-wire layout (9 bytes):
//! ```text
//! Byte 0: Report ID (always 1)
//! Byte 1: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 2: Reserved (0x00)
//! Byte 3-8: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

/// Report ID tagging keyboard reports on the shared HID interface.
pub const KEYBOARD_REPORT_ID: u8 = 1;

/// Keyboard report size in bytes, report ID included.
pub const KEYBOARD_REPORT_SIZE: usize = 9;

/// Left Shift bit in the modifier bitfield.
pub const MODIFIER_LEFT_SHIFT: u8 = 0x02;

/// Keyboard/Keypad usage page key codes used by the demo script.
pub const KEY_A: u8 = 0x04;
pub const KEY_1: u8 = 0x1E;
pub const KEY_SPACE: u8 = 0x2C;

/// Caps Lock bit in the LED output report bitmap.
pub const LED_CAPS_LOCK: u8 = 0x02;

/// Standard USB HID boot-layout keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Report with a single key in slot 0, remaining slots zeroed.
    pub const fn single_key(modifier: u8, keycode: u8) -> Self {
        Self {
            modifier,
            reserved: 0,
            keycodes: [keycode, 0, 0, 0, 0, 0],
        }
    }

    /// Serialise into a byte slice for USB HID transmission, report ID
    /// first. Returns the number of bytes written (always 9).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = KEYBOARD_REPORT_ID;
        buf[1] = self.modifier;
        buf[2] = self.reserved;
        buf[3..9].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}
