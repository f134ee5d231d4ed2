//! Scripted HID input sequencing.
//!
//! A polled state machine that, once the host has enumerated the
//! device, waits out a settle delay and then plays the demo script as
//! press/release report pairs. An optional pointer sub-sequence (move
//! up, move back, click) can be started explicitly and rejoins the
//! typing path.
//!
//! Every "wait" is a guard re-checked on a later tick; nothing blocks.
//! A send the transport rejects leaves the state unchanged, so the
//! same logical report is retried on the next tick - never skipped,
//! never duplicated.

use crate::config;
use crate::hid::keymap::{self, KeyPress};
use crate::hid::mouse::BUTTON_LEFT;
use crate::link::LinkState;

/// Report submission seam between the sequencer and the USB stack.
///
/// `send_*` return whether the report was accepted; rejection is not an
/// error and carries no retry logic here - the caller re-attempts on
/// its next tick. Callers must check [`ready`](Self::ready) first.
pub trait HidTransport {
    /// True iff the HID channel can accept a report right now.
    fn ready(&mut self) -> bool;

    /// Attempt one keyboard report. Returns whether it was accepted.
    fn send_keyboard(&mut self, modifier: u8, keycodes: [u8; 6]) -> bool;

    /// Attempt one relative mouse report. Returns whether it was accepted.
    fn send_mouse(&mut self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> bool;

    /// Ask the suspended host to resume the bus.
    fn request_remote_wakeup(&mut self);

    /// Press a single key: slot 0 carries the keycode, the rest are zero.
    fn press_key(&mut self, key: KeyPress) -> bool {
        let mut keycodes = [0u8; 6];
        keycodes[0] = key.keycode;
        self.send_keyboard(key.modifier, keycodes)
    }

    /// Release all keys (zeroed buffer, no modifier).
    fn release_keys(&mut self) -> bool {
        self.send_keyboard(0, [0; 6])
    }

    /// Move the pointer by a relative delta.
    fn move_pointer(&mut self, dx: i8, dy: i8) -> bool {
        self.send_mouse(0, dx, dy, 0)
    }

    /// Press the given buttons without motion.
    fn press_buttons(&mut self, buttons: u8) -> bool {
        self.send_mouse(buttons, 0, 0, 0)
    }

    /// Release all buttons, no motion.
    fn release_buttons(&mut self) -> bool {
        self.send_mouse(0, 0, 0, 0)
    }
}

/// Steps of the demo script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceState {
    /// Waiting for the device to be mounted.
    Idle,
    /// Mounted; letting the host settle before any input.
    WaitInit,
    /// Pointer sub-sequence: move up.
    MouseUp,
    /// Pointer sub-sequence: move back down.
    MouseDown,
    /// Pointer sub-sequence: press the left button.
    ClickPress,
    /// Pointer sub-sequence: release the buttons.
    ClickRelease,
    /// Short pause before typing starts.
    WaitBeforeType,
    /// Press the key for the character under the cursor.
    TypeChar,
    /// Release all keys, then advance the cursor.
    ReleaseChar,
    /// Script finished; idle until the device re-mounts.
    Done,
}

/// Polled state machine that plays the demo script.
pub struct Sequencer {
    state: SequenceState,
    state_entered_ms: u64,
    cursor: usize,
    script: &'static str,
}

impl Sequencer {
    pub const fn new(script: &'static str) -> Self {
        Self {
            state: SequenceState::Idle,
            state_entered_ms: 0,
            cursor: 0,
            script,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Index of the next script character to type.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Jump into the pointer sub-sequence (move, move back, click,
    /// release), which then rejoins the script at the typing pause.
    /// The scripted path does not take it; this is the explicit way in.
    pub fn begin_pointer_sequence(&mut self, now_ms: u64) {
        self.enter(SequenceState::MouseUp, now_ms);
    }

    fn enter(&mut self, state: SequenceState, now_ms: u64) {
        self.state = state;
        self.state_entered_ms = now_ms;
    }

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.state_entered_ms)
    }

    /// One tick: at most one guard check and one send attempt.
    ///
    /// Any link state other than `Mounted` resets the machine to
    /// `Idle`; while suspended with wakeup permission, a remote wakeup
    /// is requested instead of any report. A fresh run starts
    /// automatically whenever the device re-enters `Mounted`.
    pub fn poll<T: HidTransport>(&mut self, now_ms: u64, link: LinkState, transport: &mut T) {
        match link {
            LinkState::NotMounted => {
                self.enter(SequenceState::Idle, now_ms);
                return;
            }
            LinkState::Suspended {
                remote_wakeup_allowed,
            } => {
                self.enter(SequenceState::Idle, now_ms);
                if remote_wakeup_allowed {
                    transport.request_remote_wakeup();
                }
                return;
            }
            LinkState::Mounted => {}
        }

        if !transport.ready() {
            return;
        }

        match self.state {
            SequenceState::Idle => {
                // Start the sequence.
                self.enter(SequenceState::WaitInit, now_ms);
            }

            SequenceState::WaitInit => {
                if self.elapsed_ms(now_ms) >= config::SEQUENCE_START_DELAY_MS {
                    self.enter(SequenceState::WaitBeforeType, now_ms);
                }
            }

            SequenceState::MouseUp => {
                if transport.move_pointer(0, -config::POINTER_DEMO_TRAVEL) {
                    self.enter(SequenceState::MouseDown, now_ms);
                }
            }

            SequenceState::MouseDown => {
                if transport.move_pointer(0, config::POINTER_DEMO_TRAVEL) {
                    self.enter(SequenceState::ClickPress, now_ms);
                }
            }

            SequenceState::ClickPress => {
                if transport.press_buttons(BUTTON_LEFT) {
                    self.enter(SequenceState::ClickRelease, now_ms);
                }
            }

            SequenceState::ClickRelease => {
                if transport.release_buttons() {
                    self.enter(SequenceState::WaitBeforeType, now_ms);
                }
            }

            SequenceState::WaitBeforeType => {
                if self.elapsed_ms(now_ms) >= config::TYPE_START_DELAY_MS {
                    self.cursor = 0;
                    self.enter(SequenceState::TypeChar, now_ms);
                }
            }

            SequenceState::TypeChar => match self.script.as_bytes().get(self.cursor) {
                None => self.enter(SequenceState::Done, now_ms),
                Some(&c) => {
                    let key = keymap::ascii_to_key(c).unwrap_or(KeyPress::NONE);
                    if transport.press_key(key) {
                        self.enter(SequenceState::ReleaseChar, now_ms);
                    }
                }
            },

            SequenceState::ReleaseChar => {
                if transport.release_keys() {
                    self.cursor += 1;
                    self.enter(SequenceState::TypeChar, now_ms);
                }
            }

            SequenceState::Done => {}
        }
    }
}
