//! `embedded-hal` 1.0 adapters
//!
//! Wraps any HAL PWM channel, output pin or blocking I2C bus so it can be
//! handed to a motor driver or the relay commander. Used by board support
//! code; the RP2350 and STM32 HALs both implement these traits.

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use embedded_hal::pwm::SetDutyCycle;

use crate::platform::{
    Result,
    error::{GpioError, I2cError, PlatformError, PwmError},
    traits::{
        GpioInterface, GpioMode, I2cInterface, MAX_PWM_BITS, MIN_PWM_BITS, PwmInterface, max_duty_for_bits,
    },
};

/// PWM channel adapter
///
/// Duty is accepted at the requested resolution and rescaled to the
/// channel's own `max_duty_cycle()`. The carrier frequency belongs to the
/// HAL timer setup and cannot be changed through `embedded-hal`.
pub struct HalPwm<P: SetDutyCycle> {
    pwm: P,
    duty: u16,
    resolution_bits: u8,
    enabled: bool,
}

impl<P: SetDutyCycle> HalPwm<P> {
    /// Wrap a configured HAL PWM channel (starts disabled, 8-bit)
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            duty: 0,
            resolution_bits: 8,
            enabled: false,
        }
    }

    /// Give the HAL channel back
    pub fn free(self) -> P {
        self.pwm
    }

    /// Logical duty scaled to hardware counts
    fn hardware_duty(&self, duty: u16) -> u16 {
        let hw_max = u32::from(self.pwm.max_duty_cycle());
        let max = u32::from(self.max_duty_cycle());
        (u32::from(duty) * hw_max / max) as u16
    }

    fn apply(&mut self) -> Result<()> {
        let hw = if self.enabled { self.hardware_duty(self.duty) } else { 0 };
        self.pwm
            .set_duty_cycle(hw)
            .map_err(|_| PlatformError::Pwm(PwmError::ChannelUnavailable))
    }
}

impl<P: SetDutyCycle> PwmInterface for HalPwm<P> {
    fn set_duty_cycle(&mut self, duty: u16) -> Result<()> {
        if duty > self.max_duty_cycle() {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty = duty;
        self.apply()
    }

    fn duty_cycle(&self) -> u16 {
        self.duty
    }

    fn max_duty_cycle(&self) -> u16 {
        max_duty_for_bits(self.resolution_bits)
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        Err(PlatformError::Pwm(PwmError::InvalidFrequency))
    }

    fn frequency(&self) -> u32 {
        0
    }

    fn set_resolution(&mut self, bits: u8) -> Result<()> {
        if !(MIN_PWM_BITS..=MAX_PWM_BITS).contains(&bits) {
            return Err(PlatformError::Pwm(PwmError::InvalidResolution));
        }
        self.resolution_bits = bits;
        self.duty = self.duty.min(self.max_duty_cycle());
        self.apply()
    }

    fn resolution(&self) -> u8 {
        self.resolution_bits
    }

    fn enable(&mut self) {
        self.enabled = true;
        if self.apply().is_err() {
            crate::log_warn!("PWM channel rejected duty on enable");
        }
    }

    fn disable(&mut self) {
        self.enabled = false;
        if self.apply().is_err() {
            crate::log_warn!("PWM channel rejected duty on disable");
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Push-pull output pin adapter
///
/// `embedded-hal` output pins cannot be switched to input, so only output
/// modes are accepted. The driven level is cached for `read()`.
pub struct HalOutput<P: OutputPin> {
    pin: P,
    high: bool,
    mode: GpioMode,
}

impl<P: OutputPin> HalOutput<P> {
    /// Wrap a HAL output pin, assumed low
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            high: false,
            mode: GpioMode::OutputPushPull,
        }
    }

    /// Give the HAL pin back
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> GpioInterface for HalOutput<P> {
    fn set_high(&mut self) -> Result<()> {
        self.pin
            .set_high()
            .map_err(|_| PlatformError::Gpio(GpioError::InvalidPin))?;
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin
            .set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::InvalidPin))?;
        self.high = false;
        Ok(())
    }

    fn read(&self) -> bool {
        self.high
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if !mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

/// Blocking I2C bus adapter
///
/// Bus speed and timeout are fixed when the HAL peripheral is constructed,
/// so `set_frequency` and `set_timeout` report `InvalidConfig`. A write
/// either completes or fails as a whole.
pub struct HalI2c<I: I2c> {
    i2c: I,
}

impl<I: I2c> HalI2c<I> {
    /// Wrap a configured HAL I2C bus
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give the HAL bus back
    pub fn free(self) -> I {
        self.i2c
    }
}

fn i2c_error(kind: ErrorKind) -> PlatformError {
    let error = match kind {
        ErrorKind::NoAcknowledge(_) => I2cError::Nack,
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
        _ => I2cError::BusError,
    };
    PlatformError::I2c(error)
}

impl<I: I2c> I2cInterface for HalI2c<I> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<usize> {
        if addr > 0x7F {
            return Err(PlatformError::I2c(I2cError::InvalidAddress));
        }
        self.i2c.write(addr, data).map_err(|e| i2c_error(e.kind()))?;
        Ok(data.len())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        if addr > 0x7F {
            return Err(PlatformError::I2c(I2cError::InvalidAddress));
        }
        self.i2c
            .write_read(addr, write_data, read_buffer)
            .map_err(|e| i2c_error(e.kind()))
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        Err(PlatformError::InvalidConfig)
    }

    fn set_timeout(&mut self, _timeout_us: u32) -> Result<()> {
        Err(PlatformError::InvalidConfig)
    }
}
