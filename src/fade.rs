//! LED breathing pattern
//!
//! A triangular duty-cycle ramp driven once per timer tick. The controller
//! owns both the ramp state and the PWM output so nothing else can touch
//! the LED channel.

use core::fmt;

use crate::{errno, Error};

/// PWM output failures
#[cfg_attr(feature = "nrf9160", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Period can't be expressed by the hardware counter
    PeriodOutOfRange,
    /// Pulse is wider than the period
    PulseOutOfRange,
    /// Driver reported a negative status
    Device(i32),
}

impl PwmError {
    pub fn status(&self) -> i32 {
        match self {
            PwmError::PeriodOutOfRange | PwmError::PulseOutOfRange => -errno::EINVAL,
            PwmError::Device(status) if *status < 0 => *status,
            PwmError::Device(_) => -errno::EIO,
        }
    }
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::PeriodOutOfRange => f.write_str("period out of range"),
            PwmError::PulseOutOfRange => f.write_str("pulse out of range"),
            PwmError::Device(status) => write!(f, "device status {}", status),
        }
    }
}

/// A single PWM channel, period and pulse given in nanoseconds
pub trait PwmOutput {
    fn is_ready(&self) -> bool;

    fn set_pulse(&mut self, period_ns: u32, pulse_ns: u32) -> Result<(), PwmError>;
}

impl<P: PwmOutput + ?Sized> PwmOutput for &mut P {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn set_pulse(&mut self, period_ns: u32, pulse_ns: u32) -> Result<(), PwmError> {
        (**self).set_pulse(period_ns, pulse_ns)
    }
}

/// Ramp state: `0 <= pulse_width <= period`, `|step|` fixed
#[cfg_attr(feature = "nrf9160", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeState {
    period: i32,
    pulse_width: i32,
    step: i32,
}

impl FadeState {
    /// Start dark and ramping up, `steps` ticks from off to full on.
    ///
    /// `period` is capped at `i32::MAX`; a zero `steps` is treated as one.
    pub fn new(period: u32, steps: u32) -> Self {
        let period = period.min(i32::MAX as u32) as i32;
        let step = (period / steps.max(1).min(i32::MAX as u32) as i32).max(1);
        Self {
            period,
            pulse_width: 0,
            step,
        }
    }

    pub fn period(&self) -> u32 {
        self.period as u32
    }

    pub fn pulse_width(&self) -> u32 {
        self.pulse_width as u32
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Move one step, clamping at either end and reversing on the same tick
    pub fn advance(&mut self) {
        self.pulse_width = self.pulse_width.saturating_add(self.step);
        if self.pulse_width >= self.period {
            self.pulse_width = self.period;
            self.step = -self.step;
        } else if self.pulse_width <= 0 {
            self.pulse_width = 0;
            self.step = -self.step;
        }
    }
}

pub struct FadeController<P> {
    pwm: P,
    state: FadeState,
    tick_ms: u64,
    armed: bool,
}

impl<P: PwmOutput> FadeController<P> {
    /// Check the output once and build the controller, dark and ramping up.
    /// `tick_ms` is the interval the caller runs `on_tick` at.
    pub fn start(pwm: P, period_ns: u32, steps: u32, tick_ms: u64) -> Result<Self, Error> {
        if !pwm.is_ready() {
            log_error!("PWM device not ready");
            return Err(Error::DeviceNotReady);
        }

        let state = FadeState::new(period_ns, steps);
        log_info!(
            "fade started: period {} ns, step {} ns every {} ms",
            state.period(),
            state.step(),
            tick_ms
        );

        Ok(Self {
            pwm,
            state,
            tick_ms,
            armed: true,
        })
    }

    /// Apply the current pulse width, then advance the ramp.
    ///
    /// A failed PWM write disarms the controller for good; every later call
    /// returns `Error::Disarmed` without touching the output.
    pub fn on_tick(&mut self) -> Result<(), Error> {
        if !self.armed {
            return Err(Error::Disarmed);
        }

        if let Err(e) = self
            .pwm
            .set_pulse(self.state.period(), self.state.pulse_width())
        {
            log_error!("pwm set failed with error {}", e.status());
            log_warn!("fade timer disarmed");
            self.armed = false;
            return Err(e.into());
        }

        self.state.advance();
        Ok(())
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn state(&self) -> &FadeState {
        &self.state
    }

    pub fn output(&self) -> &P {
        &self.pwm
    }
}
