//! USB HID composite device - keyboard + mouse behind one interface.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral, tracks link state from device callbacks, and adapts the
//! async HID writer into the sequencer's polled transport contract.

use core::cell::RefCell;
use core::task::Poll;

use crate::config;
use crate::error::Error;
use crate::hid::descriptor::HID_REPORT_DESCRIPTOR;
use crate::hid::keyboard::{KeyboardReport, KEYBOARD_REPORT_ID, KEYBOARD_REPORT_SIZE, LED_CAPS_LOCK};
use crate::hid::mouse::MouseReport;
use crate::link::{LinkEvent, LinkMonitor, LinkState};
use crate::sequencer::HidTransport;
use defmt::{debug, info, warn};
use embassy_futures::poll_once;
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// IN endpoint buffer: sized for the largest report (keyboard, 9 bytes).
pub const IN_BUFFER_SIZE: usize = KEYBOARD_REPORT_SIZE;
/// OUT endpoint buffer: report ID + LED bitmap.
pub const OUT_BUFFER_SIZE: usize = 2;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<DeviceStateHandler> = StaticCell::new();

/// Link state shared between the USB callbacks (single writer) and the
/// sequencer/indicator ticks (readers).
static LINK: Mutex<CriticalSectionRawMutex, RefCell<LinkMonitor>> =
    Mutex::new(RefCell::new(LinkMonitor::new()));

/// Host keyboard lock indicator (caps lock), latest value wins.
static LOCK_INDICATOR: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Set by the sequencer while suspended; consumed by the device runner.
static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Snapshot of the current link state.
pub fn link_state() -> LinkState {
    LINK.lock(|monitor| monitor.borrow().state())
}

/// Caps-lock override feed for the indicator task.
pub fn lock_indicator() -> &'static Signal<CriticalSectionRawMutex, bool> {
    &LOCK_INDICATOR
}

fn link_event(event: LinkEvent) {
    LINK.lock(|monitor| monitor.borrow_mut().handle(event));
}

/// Translates embassy-usb device callbacks into [`LinkEvent`]s.
struct DeviceStateHandler;

impl Handler for DeviceStateHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            link_event(LinkEvent::Unmounted);
        }
        info!("USB: {}", if enabled { "enabled" } else { "disabled" });
    }

    fn reset(&mut self) {
        link_event(LinkEvent::Unmounted);
        debug!("USB: bus reset");
    }

    fn configured(&mut self, configured: bool) {
        link_event(if configured {
            LinkEvent::Mounted
        } else {
            LinkEvent::Unmounted
        });
        info!("USB: {}", if configured { "mounted" } else { "unmounted" });
    }

    fn suspended(&mut self, suspended: bool) {
        link_event(if suspended {
            LinkEvent::Suspended
        } else {
            LinkEvent::Resumed
        });
        info!("USB: {}", if suspended { "suspended" } else { "resumed" });
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        link_event(LinkEvent::RemoteWakeupAllowed(enabled));
        debug!("USB: remote wakeup allowed = {}", enabled);
    }
}

/// Handles GET_REPORT / SET_REPORT control requests and OUT reports.
///
/// The only host-to-device traffic we care about is the keyboard LED
/// bitmap: the caps-lock bit drives the status LED override. Payloads
/// shorter than expected are silently ignored.
pub struct LedCommandHandler;

impl RequestHandler for LedCommandHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        debug!("USB: unhandled GET_REPORT");
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        if let ReportId::Out(report_id) = id {
            if report_id == KEYBOARD_REPORT_ID {
                if let Some(&leds) = data.first() {
                    LOCK_INDICATOR.signal(leds & LED_CAPS_LOCK != 0);
                }
            }
        }
        OutResponse::Accepted
    }
}

/// Build result containing the USB device runner and the HID endpoints.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: HidReader<'static, UsbDriver, OUT_BUFFER_SIZE>,
    pub writer: HidWriter<'static, UsbDriver, IN_BUFFER_SIZE>,
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    // Build the USB device.
    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let state_handler = USB_STATE_HANDLER.init(DeviceStateHandler);
    builder.handler(state_handler);

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: HID_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 64,
    };
    let hid = HidReaderWriter::<_, OUT_BUFFER_SIZE, IN_BUFFER_SIZE>::new(
        &mut builder,
        hid_state,
        hid_config,
    );
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + mouse)");

    UsbHidDevice {
        device,
        reader,
        writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
/// While the bus is suspended, a signal from the sequencer triggers a
/// remote wakeup request towards the host.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    loop {
        device.run_until_suspend().await;
        match select(device.wait_resume(), REMOTE_WAKEUP.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                if let Err(e) = device.remote_wakeup().await {
                    warn!("USB: remote wakeup failed: {:?}", Error::from(e));
                }
            }
        }
    }
}

/// Service host-to-device reports (keyboard LED state) forever.
pub async fn run_led_listener(reader: HidReader<'static, UsbDriver, OUT_BUFFER_SIZE>) -> ! {
    info!("HID output report listener started");
    let mut handler = LedCommandHandler;
    reader.run(true, &mut handler).await
}

/// Non-blocking adapter from the sequencer's transport contract onto
/// the async HID writer. A submission that would have to wait simply
/// reports "not accepted"; the sequencer retries on its next tick.
pub struct UsbHidTransport {
    writer: HidWriter<'static, UsbDriver, IN_BUFFER_SIZE>,
    buf: [u8; IN_BUFFER_SIZE],
}

impl UsbHidTransport {
    pub fn new(writer: HidWriter<'static, UsbDriver, IN_BUFFER_SIZE>) -> Self {
        Self {
            writer,
            buf: [0; IN_BUFFER_SIZE],
        }
    }

    fn try_write(&mut self, len: usize) -> bool {
        match poll_once(self.writer.write(&self.buf[..len])) {
            Poll::Ready(Ok(())) => true,
            Poll::Ready(Err(e)) => {
                warn!("HID report dropped: {:?}", Error::from(e));
                false
            }
            Poll::Pending => false,
        }
    }
}

impl HidTransport for UsbHidTransport {
    fn ready(&mut self) -> bool {
        matches!(poll_once(self.writer.ready()), Poll::Ready(()))
    }

    fn send_keyboard(&mut self, modifier: u8, keycodes: [u8; 6]) -> bool {
        let report = KeyboardReport {
            modifier,
            reserved: 0,
            keycodes,
        };
        let len = report.serialize(&mut self.buf);
        len != 0 && self.try_write(len)
    }

    fn send_mouse(&mut self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> bool {
        let report = MouseReport {
            buttons,
            x: dx,
            y: dy,
            wheel,
        };
        let len = report.serialize(&mut self.buf);
        len != 0 && self.try_write(len)
    }

    fn request_remote_wakeup(&mut self) {
        REMOTE_WAKEUP.signal(());
    }
}
