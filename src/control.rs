//! Mode/state controller.
//!
//! The whole control plane is one byte, so every reader sees a consistent
//! `(mode, state, peer)` triple and every transition is a single CAS:
//!
//! ```text
//!   bit 4     bit 3   bit 2    bits 1..0
//! ┌────────┬───────┬───────┬────────────┐
//! │ clear  │ peer  │ state │    mode    │
//! └────────┴───────┴───────┴────────────┘
//! ```
//!
//! Writers:
//! - Button interrupts, through [`ControlState::press`]: mode, peer, arming.
//! - The aggregator, through [`ControlState::try_consume_arm`]: disarm only.
//!
//! The `clear` bit asks the aggregator to drop its partial word the next
//! time it accepts a symbol. The interrupt never touches the word itself.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::debounce::Debouncer;

const MODE_MASK: u8 = 0b0_0011;
const STATE_BIT: u8 = 0b0_0100;
const PEER_BIT: u8 = 0b0_1000;
const CLEAR_BIT: u8 = 0b1_0000;

/// What the device is doing with its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramMode {
    /// Tilt gestures produce Morse symbols.
    Sending = 0,
    /// Console lines are encoded to Morse.
    Receiving = 1,
    /// Console lines are decoded from Morse.
    Decoding = 2,
}

impl ProgramMode {
    fn from_bits(bits: u8) -> Self {
        match bits & MODE_MASK {
            1 => ProgramMode::Receiving,
            2 => ProgramMode::Decoding,
            _ => ProgramMode::Sending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProgramMode::Sending => "Sending",
            ProgramMode::Receiving => "Receiving",
            ProgramMode::Decoding => "Decoding",
        }
    }
}

/// Single-shot capture gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramState {
    /// No symbol will be accepted until Button A is pressed.
    Waiting,
    /// The next symbol will be accepted.
    Running,
}

/// Where finished words go while Sending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerLink {
    /// Rendered locally.
    Off,
    /// Transmitted to the peer; peer input is read.
    On,
}

/// The two physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Arm capture, forcing Sending.
    A,
    /// Advance the mode cycle.
    B,
}

impl Button {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Button::A => 0,
            Button::B => 1,
        }
    }
}

/// Consistent view of the control byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: ProgramMode,
    pub state: ProgramState,
    pub peer: PeerLink,
}

impl Snapshot {
    fn from_bits(bits: u8) -> Self {
        Self {
            mode: ProgramMode::from_bits(bits),
            state: if bits & STATE_BIT != 0 {
                ProgramState::Running
            } else {
                ProgramState::Waiting
            },
            peer: if bits & PEER_BIT != 0 {
                PeerLink::On
            } else {
                PeerLink::Off
            },
        }
    }

    #[inline]
    pub fn is_armed_sending(&self) -> bool {
        self.mode == ProgramMode::Sending && self.state == ProgramState::Running
    }
}

/// Result of one accepted button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Button A while already Sending.
    Armed,
    /// Button A from Receiving/Decoding: back to Sending, word cleared.
    ArmedBackToSending,
    /// Button B: Sending(Off) → Receiving.
    ToReceiving,
    /// Button B: Receiving → Decoding.
    ToDecoding,
    /// Button B: Decoding → Sending(On).
    ToSendingPeerOn,
    /// Button B: Sending(On) → Sending(Off).
    PeerOff,
}

impl Transition {
    /// Status line printed for this transition.
    pub fn message(self) -> &'static str {
        match self {
            Transition::Armed => "Capture armed",
            Transition::ArmedBackToSending => "Mode: Sending (word cleared), capture armed",
            Transition::ToReceiving => "Mode: Receiving",
            Transition::ToDecoding => "Mode: Decoding",
            Transition::ToSendingPeerOn => "Mode: Sending, peer link ON",
            Transition::PeerOff => "Peer link OFF",
        }
    }
}

/// Lock-free compound control state.
pub struct ControlState {
    bits: AtomicU8,
}

impl ControlState {
    /// `(Sending, Waiting, Off)`.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(ProgramMode::Sending as u8),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn mode(&self) -> ProgramMode {
        self.snapshot().mode
    }

    #[inline]
    pub fn state(&self) -> ProgramState {
        self.snapshot().state
    }

    #[inline]
    pub fn peer(&self) -> PeerLink {
        self.snapshot().peer
    }

    /// Apply one button press. Never blocks; interrupt-safe.
    pub fn press(&self, button: Button) -> Transition {
        let prev = match self.bits.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
            Some(next_bits(bits, button))
        }) {
            Ok(prev) | Err(prev) => prev,
        };
        transition_from(prev, button)
    }

    /// Debounced press, as called from the edge interrupt.
    ///
    /// Returns `None` when the press falls inside the debounce window.
    pub fn on_button_edge(
        &self,
        debouncer: &Debouncer,
        button: Button,
        now_ms: u32,
    ) -> Option<Transition> {
        if !debouncer.accept(button, now_ms) {
            return None;
        }
        Some(self.press(button))
    }

    /// Close the single-shot gate if it is open in Sending mode.
    ///
    /// Returns `true` when this call consumed the arm, in which case the
    /// caller owns exactly one symbol.
    pub fn try_consume_arm(&self) -> bool {
        self.bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                if Snapshot::from_bits(bits).is_armed_sending() {
                    Some(bits & !STATE_BIT)
                } else {
                    None
                }
            })
            .is_ok()
    }

    /// Take a pending clear request.
    pub fn take_clear_request(&self) -> bool {
        self.bits.fetch_and(!CLEAR_BIT, Ordering::AcqRel) & CLEAR_BIT != 0
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

fn with_mode(bits: u8, mode: ProgramMode) -> u8 {
    (bits & !MODE_MASK) | mode as u8
}

fn next_bits(bits: u8, button: Button) -> u8 {
    let snap = Snapshot::from_bits(bits);
    match button {
        Button::A => {
            let armed = bits | STATE_BIT;
            if snap.mode == ProgramMode::Sending {
                armed
            } else {
                with_mode(armed, ProgramMode::Sending) | CLEAR_BIT
            }
        }
        Button::B => match (snap.mode, snap.peer) {
            (ProgramMode::Sending, PeerLink::Off) => with_mode(bits, ProgramMode::Receiving),
            (ProgramMode::Receiving, _) => with_mode(bits & !PEER_BIT, ProgramMode::Decoding),
            (ProgramMode::Decoding, _) => {
                with_mode(bits, ProgramMode::Sending) | PEER_BIT | CLEAR_BIT
            }
            (ProgramMode::Sending, PeerLink::On) => bits & !PEER_BIT,
        },
    }
}

fn transition_from(prev: u8, button: Button) -> Transition {
    let snap = Snapshot::from_bits(prev);
    match button {
        Button::A if snap.mode == ProgramMode::Sending => Transition::Armed,
        Button::A => Transition::ArmedBackToSending,
        Button::B => match (snap.mode, snap.peer) {
            (ProgramMode::Sending, PeerLink::Off) => Transition::ToReceiving,
            (ProgramMode::Receiving, _) => Transition::ToDecoding,
            (ProgramMode::Decoding, _) => Transition::ToSendingPeerOn,
            (ProgramMode::Sending, PeerLink::On) => Transition::PeerOff,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let control = ControlState::new();
        assert_eq!(
            control.snapshot(),
            Snapshot {
                mode: ProgramMode::Sending,
                state: ProgramState::Waiting,
                peer: PeerLink::Off,
            }
        );
        assert!(!control.take_clear_request());
    }

    #[test]
    fn test_consume_arm_is_single_shot() {
        let control = ControlState::new();
        assert!(!control.try_consume_arm());

        control.press(Button::A);
        assert!(control.try_consume_arm());
        assert!(!control.try_consume_arm());
        assert_eq!(control.state(), ProgramState::Waiting);
    }

    #[test]
    fn test_consume_arm_requires_sending() {
        let control = ControlState::new();
        control.press(Button::A);
        control.press(Button::B); // Receiving, still Running
        assert_eq!(control.state(), ProgramState::Running);
        assert!(!control.try_consume_arm());
    }

    #[test]
    fn test_clear_request_taken_once() {
        let control = ControlState::new();
        control.press(Button::B);
        assert_eq!(control.press(Button::A), Transition::ArmedBackToSending);
        assert!(control.take_clear_request());
        assert!(!control.take_clear_request());
        assert_eq!(control.mode(), ProgramMode::Sending);
    }
}
