//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, USB identity strings, and the demo script
//! live here so they can be tuned in one place.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "autokey";
pub const USB_PRODUCT: &str = "Scripted HID Demo";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID endpoint polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

// Sequencer

/// The text the demo types once the host has enumerated the device.
pub const SCRIPT_TEXT: &str = "Hello World!";

/// Sequencer tick interval (ms). Every guard is re-checked at this cadence.
pub const HID_TICK_MS: u64 = 10;

/// Settle time after enumeration before the script starts (ms).
pub const SEQUENCE_START_DELAY_MS: u64 = 2000;

/// Pause between the pointer sub-sequence (or start-up) and typing (ms).
pub const TYPE_START_DELAY_MS: u64 = 500;

/// Pointer travel of the demo move, in relative counts.
pub const POINTER_DEMO_TRAVEL: i8 = 20;

// Status LED
//
// The blink cadence mirrors the USB link state; a host-asserted caps-lock
// indicator overrides it and holds the LED on.
//
//   Status LED → P0.06 (active low)

/// Blink interval while the host has not enumerated the device (ms).
pub const BLINK_NOT_MOUNTED_MS: u64 = 250;

/// Blink interval while mounted (ms).
pub const BLINK_MOUNTED_MS: u64 = 1000;

/// Blink interval while the bus is suspended (ms).
pub const BLINK_SUSPENDED_MS: u64 = 2500;

/// Indicator tick interval (ms).
pub const INDICATOR_TICK_MS: u64 = 10;
