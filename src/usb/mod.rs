//! USB Device subsystem - presents a composite HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  We expose a **single HID interface** whose report
//! descriptor carries two report IDs:
//!
//! - Report ID 1: Keyboard (boot layout, with LED output report)
//! - Report ID 2: Mouse (relative)
//!
//! Device state callbacks feed the shared link monitor; output reports
//! feed the caps-lock override of the status LED; the sequencer writes
//! input reports through a non-blocking transport adapter.

pub mod hid_device;
