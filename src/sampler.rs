//! Tilt sampler (producer).
//!
//! Turns one accelerometer reading into one [`Symbol`]:
//!
//! ```text
//! pitch = atan2(ax, sqrt(ay² + az²))   [degrees]
//!
//!   pitch >  +threshold  →  Dash
//!   pitch <  -threshold  →  Dot
//!   otherwise            →  Gap
//! ```
//!
//! The sampler is a pure step function; the periodic loop and the queue
//! send live in [`crate::tasks`].

use micromath::F32Ext;

use crate::control::{ProgramMode, Snapshot};
use crate::symbol::Symbol;

/// Acceleration in g, sensor frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Acceleration {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

/// A source of orientation samples.
pub trait OrientationSensor {
    type Error: core::fmt::Debug;

    fn read(&mut self) -> Result<Acceleration, Self::Error>;
}

/// Pitch angle in degrees, in `-90.0..=90.0`.
pub fn pitch_degrees(a: &Acceleration) -> f32 {
    let horizontal = F32Ext::sqrt(a.ay * a.ay + a.az * a.az);
    F32Ext::atan2(a.ax, horizontal) * (180.0 / core::f32::consts::PI)
}

/// Classify a pitch angle.
pub fn symbol_for_pitch(pitch_deg: f32, threshold_deg: f32) -> Symbol {
    if pitch_deg > threshold_deg {
        Symbol::Dash
    } else if pitch_deg < -threshold_deg {
        Symbol::Dot
    } else {
        Symbol::Gap
    }
}

/// Outcome of one sampling period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    /// Not in Sending mode; sensor not read.
    Idle,
    /// A symbol to publish.
    Symbol { pitch_deg: f32, symbol: Symbol },
    /// The sensor read failed; nothing to publish this period.
    SensorFault,
}

/// Stateless classifier with a fixed threshold.
pub struct TiltSampler {
    threshold_deg: f32,
}

impl TiltSampler {
    pub const fn new(threshold_deg: f32) -> Self {
        Self { threshold_deg }
    }

    /// Run one period against the current control snapshot.
    pub fn sample<S: OrientationSensor>(&self, sensor: &mut S, control: Snapshot) -> Sample {
        if control.mode != ProgramMode::Sending {
            return Sample::Idle;
        }

        match sensor.read() {
            Ok(accel) => {
                let pitch_deg = pitch_degrees(&accel);
                Sample::Symbol {
                    pitch_deg,
                    symbol: symbol_for_pitch(pitch_deg, self.threshold_deg),
                }
            }
            Err(e) => {
                log::warn!("orientation read failed: {:?}", e);
                Sample::SensorFault
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.5
    }

    #[test]
    fn test_pitch_flat_and_vertical() {
        let flat = Acceleration { ax: 0.0, ay: 0.0, az: 1.0 };
        assert!(approx(pitch_degrees(&flat), 0.0));

        let nose_up = Acceleration { ax: 1.0, ay: 0.0, az: 0.0 };
        assert!(approx(pitch_degrees(&nose_up), 90.0));

        let nose_down = Acceleration { ax: -1.0, ay: 0.0, az: 0.0 };
        assert!(approx(pitch_degrees(&nose_down), -90.0));
    }

    #[test]
    fn test_pitch_45() {
        // micromath's sqrt is an approximation; a few degrees is fine here
        let a = Acceleration { ax: 0.7071, ay: 0.0, az: 0.7071 };
        assert!((pitch_degrees(&a) - 45.0).abs() < 3.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(symbol_for_pitch(10.0, 10.0), Symbol::Gap);
        assert_eq!(symbol_for_pitch(-10.0, 10.0), Symbol::Gap);
        assert_eq!(symbol_for_pitch(10.5, 10.0), Symbol::Dash);
        assert_eq!(symbol_for_pitch(-10.5, 10.0), Symbol::Dot);
    }
}
