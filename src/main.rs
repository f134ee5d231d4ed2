//! Embedded entry point - nRF52840 scripted HID demo.
//!
//! Spawns four cooperative tasks on the thread-mode executor:
//! the USB device runner, the host-to-device report listener, the
//! status LED indicator, and the report sequencer. All shared state
//! lives behind the primitives in [`autokey::usb::hid_device`].

#![no_std]
#![no_main]

use autokey::config;
use autokey::indicator::Blinker;
use autokey::sequencer::Sequencer;
use autokey::usb::hid_device::{
    self, UsbDriver, UsbHidTransport, IN_BUFFER_SIZE, OUT_BUFFER_SIZE,
};
use defmt::{debug, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::class::hid::{HidReader, HidWriter};
use embassy_usb::UsbDevice;
use panic_probe as _;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("autokey starting");

    let usb = hid_device::init(p.USBD);

    // Status LED, active low; start off.
    let led = Output::new(p.P0_06, Level::High, OutputDrive::Standard);

    spawner.must_spawn(usb_task(usb.device));
    spawner.must_spawn(led_listener_task(usb.reader));
    spawner.must_spawn(indicator_task(led));
    spawner.must_spawn(hid_task(usb.writer));
}

/// USB enumeration, suspend/resume, and remote wakeup handling.
#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

/// Keyboard LED output reports from the host.
#[embassy_executor::task]
async fn led_listener_task(reader: HidReader<'static, UsbDriver, OUT_BUFFER_SIZE>) -> ! {
    hid_device::run_led_listener(reader).await
}

/// Blink the status LED at the link-state cadence; a host-asserted
/// caps lock holds it on instead.
#[embassy_executor::task]
async fn indicator_task(mut led: Output<'static>) -> ! {
    let mut blinker = Blinker::new(Instant::now().as_millis());
    let mut ticker = Ticker::every(Duration::from_millis(config::INDICATOR_TICK_MS));
    loop {
        match select(ticker.next(), hid_device::lock_indicator().wait()).await {
            Either::First(()) => {
                let now = Instant::now().as_millis();
                blinker.set_link_state(hid_device::link_state(), now);
                if let Some(on) = blinker.poll(now) {
                    drive_led(&mut led, on);
                }
            }
            Either::Second(active) => {
                let on = blinker.set_lock_indicator(active, Instant::now().as_millis());
                drive_led(&mut led, on);
            }
        }
    }
}

/// Poll the sequencer against the USB transport every tick.
#[embassy_executor::task]
async fn hid_task(writer: HidWriter<'static, UsbDriver, IN_BUFFER_SIZE>) -> ! {
    let mut transport = UsbHidTransport::new(writer);
    let mut sequencer = Sequencer::new(config::SCRIPT_TEXT);
    let mut ticker = Ticker::every(Duration::from_millis(config::HID_TICK_MS));
    loop {
        ticker.next().await;
        let before = sequencer.state();
        sequencer.poll(
            Instant::now().as_millis(),
            hid_device::link_state(),
            &mut transport,
        );
        let after = sequencer.state();
        if before != after {
            debug!("sequence: {:?} -> {:?}", before, after);
        }
    }
}

fn drive_led(led: &mut Output<'static>, on: bool) {
    if on {
        led.set_low();
    } else {
        led.set_high();
    }
}
