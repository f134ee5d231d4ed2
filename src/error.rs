//! Unified error type for autokey.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! Nothing here is fatal: a failed report submission is logged and
//! surfaced to the sequencer as "not accepted", which retries on the
//! next tick.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Report does not fit the endpoint buffer.
    BufferOverflow,

    /// The endpoint is disabled (device not configured).
    Disabled,

    /// Remote wakeup was refused by the USB stack.
    WakeupRefused,
}

// Convenience conversions

#[cfg(feature = "embedded")]
impl From<embassy_usb::driver::EndpointError> for Error {
    fn from(e: embassy_usb::driver::EndpointError) -> Self {
        match e {
            embassy_usb::driver::EndpointError::BufferOverflow => Error::BufferOverflow,
            embassy_usb::driver::EndpointError::Disabled => Error::Disabled,
        }
    }
}

#[cfg(feature = "embedded")]
impl From<embassy_usb::RemoteWakeupError> for Error {
    fn from(_: embassy_usb::RemoteWakeupError) -> Self {
        Error::WakeupRefused
    }
}
