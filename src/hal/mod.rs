// Hardware abstraction - capability trait between the core and the board
//
// The decision core depends on this trait, never on concrete hardware, and
// receives it explicitly each cycle; there is no global or singleton access
// path. The STM32 implementation lives in firmware; this crate ships only
// the mock used by tests and the demo binary.

pub mod mock;

pub use mock::{MockHardware, VibrationPattern};

use serde::{Deserialize, Serialize};

/// Alert category carried in a transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Uncertain detection forwarded for remote analysis (wire value 0)
    Uncertain,
    /// Confirmed anomaly (wire value 1)
    Confirmed,
}

impl AlertKind {
    /// Radio wire encoding
    pub const fn wire_value(self) -> u8 {
        match self {
            AlertKind::Uncertain => 0,
            AlertKind::Confirmed => 1,
        }
    }
}

/// Capabilities the surrounding hardware grants the decision core
///
/// Battery voltage and the sleep/transmit side effects are owned exclusively
/// by the implementor; the core only reads and requests.
pub trait Hardware {
    /// Fill `buffer` with signed 16-bit vibration samples; returns the
    /// number of samples actually read. Zero is a defined empty case, not an
    /// error.
    fn read_samples(&mut self, buffer: &mut [i16]) -> usize;

    /// Current battery voltage in millivolts
    fn read_battery_mv(&mut self) -> u16;

    /// Milliseconds since startup
    fn now_ms(&mut self) -> u32;

    /// Enter low-power sleep for `duration_ms`
    fn sleep(&mut self, duration_ms: u32);

    /// Transmit an alert with confidence 0-100; returns whether the radio
    /// accepted it
    fn transmit(&mut self, kind: AlertKind, confidence_pct: u8) -> bool;

    /// Whether an external wake interrupt is pending
    fn wake_pending(&mut self) -> bool;

    /// Clear the pending wake flag
    fn clear_wake(&mut self);
}
