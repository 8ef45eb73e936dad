//! I2C register bus adapter.
//!
//! Bridges the [`RegisterBus`] port onto any [`embedded_hal::i2c::I2c`]
//! implementation — the ESP-IDF `I2cDriver` in production, a fake bus in
//! host tests. The PMIC uses the usual register-pointer convention: a
//! write is `[reg, value]`, a read is a write of `[reg]` followed by a
//! one-byte read.

use embedded_hal::i2c::I2c;

use crate::app::ports::RegisterBus;
use crate::error::BusError;

/// 7-bit I2C address of the LED PMIC.
pub const PMIC_I2C_ADDR: u8 = 0x66;

/// Register transport over an I2C bus.
pub struct I2cRegisterBus<I> {
    i2c: I,
    dev_addr: u8,
}

impl<I: I2c> I2cRegisterBus<I> {
    pub fn new(i2c: I, dev_addr: u8) -> Self {
        Self { i2c, dev_addr }
    }

    /// Release the underlying bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cRegisterBus<I> {
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.dev_addr, &[addr, value])
            .map_err(|_| BusError::Write(addr))
    }

    fn read_register(&mut self, addr: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.dev_addr, &[addr], &mut buf)
            .map_err(|_| BusError::Read(addr))?;
        Ok(buf[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Fake I2C device backed by a register array.
    struct FakeI2c {
        regs: [u8; 0x40],
        pointer: u8,
    }

    impl FakeI2c {
        fn new() -> Self {
            Self {
                regs: [0; 0x40],
                pointer: 0,
            }
        }
    }

    impl ErrorType for FakeI2c {
        type Error = embedded_hal::i2c::ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0];
                        if let Some(&value) = bytes.get(1) {
                            self.regs[self.pointer as usize] = value;
                        }
                    }
                    Operation::Read(buf) => {
                        buf[0] = self.regs[self.pointer as usize];
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut bus = I2cRegisterBus::new(FakeI2c::new(), PMIC_I2C_ADDR);
        bus.write_register(0x31, 0x14).unwrap();
        assert_eq!(bus.read_register(0x31).unwrap(), 0x14);
    }

    #[test]
    fn update_touches_only_masked_bits() {
        let mut bus = I2cRegisterBus::new(FakeI2c::new(), PMIC_I2C_ADDR);
        bus.write_register(0x30, 0b0101_0101).unwrap();
        bus.update_register(0x30, 0b1000_0000, 0b1100_0000).unwrap();
        assert_eq!(bus.read_register(0x30).unwrap(), 0b1001_0101);
    }
}
