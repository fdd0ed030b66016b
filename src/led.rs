use embassy_nrf::pac;
use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::{Prescaler, SimplePwm};

use crate::fade::{PwmError, PwmOutput};

const PWM_CLOCK_HZ: u64 = 16_000_000;
const NS_PER_S: u64 = 1_000_000_000;
/// COUNTERTOP is 15 bits and must be at least 3
const TOP_MIN: u64 = 3;
const TOP_MAX: u64 = 0x7fff;

const PRESCALERS: [Prescaler; 8] = [
    Prescaler::Div1,
    Prescaler::Div2,
    Prescaler::Div4,
    Prescaler::Div8,
    Prescaler::Div16,
    Prescaler::Div32,
    Prescaler::Div64,
    Prescaler::Div128,
];

/// Smallest prescaler whose counter can hold `period_ns`
fn timing(period_ns: u32) -> Option<(Prescaler, u16)> {
    PRESCALERS.iter().enumerate().find_map(|(shift, prescaler)| {
        let top = period_ns as u64 * (PWM_CLOCK_HZ >> shift) / NS_PER_S;
        (TOP_MIN..=TOP_MAX)
            .contains(&top)
            .then_some((*prescaler, top as u16))
    })
}

/// LED on channel 0 of PWM0
pub struct NrfPwmLed<'d> {
    pwm: SimplePwm<'d, PWM0>,
    period_ns: u32,
    top: u16,
}

impl<'d> NrfPwmLed<'d> {
    pub fn new(pwm: SimplePwm<'d, PWM0>) -> Self {
        Self {
            pwm,
            period_ns: 0,
            top: 0,
        }
    }
}

impl PwmOutput for NrfPwmLed<'_> {
    fn is_ready(&self) -> bool {
        let pwm0 = unsafe { &*pac::PWM0::PTR };
        pwm0.enable.read().enable().is_enabled()
    }

    fn set_pulse(&mut self, period_ns: u32, pulse_ns: u32) -> Result<(), PwmError> {
        if pulse_ns > period_ns {
            return Err(PwmError::PulseOutOfRange);
        }

        if period_ns != self.period_ns {
            let (prescaler, top) = timing(period_ns).ok_or(PwmError::PeriodOutOfRange)?;
            self.pwm.set_prescaler(prescaler);
            self.pwm.set_max_duty(top);
            self.period_ns = period_ns;
            self.top = top;
        }

        let duty = (pulse_ns as u64 * self.top as u64 / period_ns as u64) as u16;
        // output is high while the counter is past the compare value
        self.pwm.set_duty(0, self.top - duty);
        Ok(())
    }
}
