//! End-to-end scenarios for the autokey sequencing logic.
//!
//! A simulated 10 ms clock drives the sequencer against a recording
//! transport, mirroring what the embedded tick task does on target.

use autokey::config;
use autokey::link::LinkState;
use autokey::sequencer::{HidTransport, SequenceState, Sequencer};

const TICK_MS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Report {
    Keyboard { modifier: u8, keycodes: [u8; 6] },
    Mouse { buttons: u8, dx: i8, dy: i8, wheel: i8 },
}

#[derive(Default)]
struct RecordingTransport {
    reject: bool,
    reports: Vec<(u64, Report)>,
    wakeup_requests: usize,
    now_ms: u64,
}

impl HidTransport for RecordingTransport {
    fn ready(&mut self) -> bool {
        true
    }

    fn send_keyboard(&mut self, modifier: u8, keycodes: [u8; 6]) -> bool {
        if self.reject {
            return false;
        }
        self.reports
            .push((self.now_ms, Report::Keyboard { modifier, keycodes }));
        true
    }

    fn send_mouse(&mut self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> bool {
        if self.reject {
            return false;
        }
        self.reports
            .push((self.now_ms, Report::Mouse { buttons, dx, dy, wheel }));
        true
    }

    fn request_remote_wakeup(&mut self) {
        self.wakeup_requests += 1;
    }
}

struct Harness {
    sequencer: Sequencer,
    transport: RecordingTransport,
    now_ms: u64,
}

impl Harness {
    fn new() -> Self {
        Self {
            sequencer: Sequencer::new(config::SCRIPT_TEXT),
            transport: RecordingTransport::default(),
            now_ms: 0,
        }
    }

    fn run_for(&mut self, duration_ms: u64, link: LinkState) {
        let end = self.now_ms + duration_ms;
        while self.now_ms < end {
            self.transport.now_ms = self.now_ms;
            self.sequencer.poll(self.now_ms, link, &mut self.transport);
            self.now_ms += TICK_MS;
        }
    }
}

/// (modifier, keycode) per character of "Hello World!".
const EXPECTED_KEYS: [(u8, u8); 12] = [
    (0x02, 0x0B), // H (shift)
    (0x00, 0x08), // e
    (0x00, 0x0F), // l
    (0x00, 0x0F), // l
    (0x00, 0x12), // o
    (0x00, 0x2C), // space
    (0x02, 0x1A), // W (shift)
    (0x00, 0x12), // o
    (0x00, 0x15), // r
    (0x00, 0x0F), // l
    (0x00, 0x07), // d
    (0x02, 0x1E), // ! (shift+1)
];

#[test]
fn mounted_device_types_greeting_on_schedule() {
    let mut h = Harness::new();

    h.run_for(10_000, LinkState::Mounted);
    assert_eq!(h.sequencer.state(), SequenceState::Done);

    // Nothing leaves the device before the settle and pre-type delays
    // (2000 ms + 500 ms) have both elapsed.
    let first_sent_at = h.transport.reports[0].0;
    assert!(
        (2500..=2600).contains(&first_sent_at),
        "typing started at {first_sent_at} ms"
    );

    // One press + one release per character, in script order.
    assert_eq!(h.transport.reports.len(), EXPECTED_KEYS.len() * 2);
    for (i, &(modifier, keycode)) in EXPECTED_KEYS.iter().enumerate() {
        let (_, ref press) = h.transport.reports[2 * i];
        let (_, ref release) = h.transport.reports[2 * i + 1];

        let mut keycodes = [0u8; 6];
        keycodes[0] = keycode;
        assert_eq!(*press, Report::Keyboard { modifier, keycodes });
        assert_eq!(
            *release,
            Report::Keyboard {
                modifier: 0,
                keycodes: [0; 6]
            }
        );
    }

    // The script runs once; the machine then idles in Done.
    let sent = h.transport.reports.len();
    h.run_for(5_000, LinkState::Mounted);
    assert_eq!(h.transport.reports.len(), sent);
}

#[test]
fn suspend_requests_wakeup_and_silences_reports() {
    let mut h = Harness::new();

    h.run_for(1_000, LinkState::Mounted);
    h.run_for(
        500,
        LinkState::Suspended {
            remote_wakeup_allowed: true,
        },
    );

    // One wakeup request per tick while suspended, and nothing else.
    assert_eq!(h.transport.wakeup_requests, 50);
    assert!(h.transport.reports.is_empty());

    // After resume the sequence restarts from scratch and completes.
    h.run_for(10_000, LinkState::Mounted);
    assert_eq!(h.sequencer.state(), SequenceState::Done);
    assert_eq!(h.transport.reports.len(), EXPECTED_KEYS.len() * 2);
}

#[test]
fn unplug_mid_script_restarts_typing_from_the_top() {
    let mut h = Harness::new();

    // Deep enough into typing that a few characters are out.
    h.run_for(2_600, LinkState::Mounted);
    let sent_before_unplug = h.transport.reports.len();
    assert!(sent_before_unplug > 0);
    assert!(sent_before_unplug < EXPECTED_KEYS.len() * 2);

    h.run_for(100, LinkState::NotMounted);
    assert_eq!(h.sequencer.state(), SequenceState::Idle);

    h.run_for(10_000, LinkState::Mounted);
    assert_eq!(h.sequencer.state(), SequenceState::Done);

    // The re-run emits the complete script again, starting with 'H'.
    let rerun = &h.transport.reports[sent_before_unplug..];
    assert_eq!(rerun.len(), EXPECTED_KEYS.len() * 2);
    let mut keycodes = [0u8; 6];
    keycodes[0] = EXPECTED_KEYS[0].1;
    assert_eq!(
        rerun[0].1,
        Report::Keyboard {
            modifier: EXPECTED_KEYS[0].0,
            keycodes
        }
    );
}

#[test]
fn transport_backpressure_never_skips_or_duplicates() {
    let mut h = Harness::new();

    // Reach the middle of typing, then reject everything for a while.
    h.run_for(2_560, LinkState::Mounted);
    let sent_before = h.transport.reports.len();

    h.transport.reject = true;
    h.run_for(500, LinkState::Mounted);
    assert_eq!(h.transport.reports.len(), sent_before);

    h.transport.reject = false;
    h.run_for(10_000, LinkState::Mounted);
    assert_eq!(h.sequencer.state(), SequenceState::Done);

    // The full exchange still adds up to exactly one press/release
    // pair per character, in order.
    assert_eq!(h.transport.reports.len(), EXPECTED_KEYS.len() * 2);
    for (i, &(modifier, keycode)) in EXPECTED_KEYS.iter().enumerate() {
        let mut keycodes = [0u8; 6];
        keycodes[0] = keycode;
        assert_eq!(
            h.transport.reports[2 * i].1,
            Report::Keyboard { modifier, keycodes }
        );
    }
}
