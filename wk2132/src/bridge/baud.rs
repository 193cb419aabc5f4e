//! Baud-rate generator values.
//!
//! Each sub-UART divides [`FOSC`] by `16 * (divisor + 1)`. The chip also has a
//! fractional prescaler (PRES), filled with the first decimal digit of the
//! division remainder. In integer arithmetic that digit is always 0.

use crate::constants::FOSC;

/// Register values for BAUD1 / BAUD0 / PRES.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisor {
    pub baud1: u8,
    pub baud0: u8,
    pub pres: u8,
}

impl BaudDivisor {
    /// Compute the generator values for `baud`.
    ///
    /// Returns `None` for 0 and for rates above `FOSC / 16`, where the
    /// divisor would underflow. Rates in between are not checked against the
    /// conventional set.
    pub const fn from_baud(baud: u32) -> Option<Self> {
        let Some(div) = baud.checked_mul(16) else {
            return None;
        };
        if div == 0 || div > FOSC {
            return None;
        }

        let integer = FOSC / div - 1;
        let mut decimal = (FOSC % div) / div;
        while decimal > 10 {
            decimal /= 10;
        }

        Some(Self {
            baud1: (integer >> 8) as u8,
            baud0: integer as u8,
            pres: decimal as u8,
        })
    }

    /// Full 16-bit integer divisor.
    pub const fn divisor(&self) -> u16 {
        ((self.baud1 as u16) << 8) | self.baud0 as u16
    }

    /// Baud rate the chip will actually generate.
    pub const fn actual_baud(&self) -> u32 {
        FOSC / (16 * (self.divisor() as u32 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn divisor_115200() {
        let d = BaudDivisor::from_baud(115_200).unwrap();
        assert_eq!(d, BaudDivisor { baud1: 0, baud0: 7, pres: 0 });
        assert_eq!(d.actual_baud(), 115_200);
    }

    #[test]
    fn divisor_9600() {
        // 14745600 / 153600 = 96 → 95
        let d = BaudDivisor::from_baud(9600).unwrap();
        assert_eq!(d.divisor(), 95);
        assert_eq!(d.baud1, 0);
        assert_eq!(d.baud0, 95);
    }

    #[test]
    fn divisor_2400_uses_high_byte() {
        // 14745600 / 38400 = 384 → 383 = 0x17F
        let d = BaudDivisor::from_baud(2400).unwrap();
        assert_eq!(d.baud1, 0x01);
        assert_eq!(d.baud0, 0x7F);
    }

    #[test]
    fn fastest_rate() {
        let d = BaudDivisor::from_baud(921_600).unwrap();
        assert_eq!(d.divisor(), 0);
    }

    #[test]
    fn rejects_arithmetic_faults() {
        assert_eq!(BaudDivisor::from_baud(0), None);
        assert_eq!(BaudDivisor::from_baud(921_601), None);
        assert_eq!(BaudDivisor::from_baud(u32::MAX), None);
    }

    #[test]
    fn conventional_rates_are_exact() {
        for baud in [
            2400, 4800, 7200, 9600, 14_400, 19_200, 28_800, 38_400, 57_600, 76_800, 115_200,
            153_600, 230_400, 307_200, 460_800, 921_600,
        ] {
            let d = BaudDivisor::from_baud(baud).unwrap();
            assert_eq!(d.actual_baud(), baud);
        }
    }

    proptest! {
        #[test]
        fn prescaler_stays_below_ten(baud in 1u32..=921_600) {
            let d = BaudDivisor::from_baud(baud).unwrap();
            prop_assert!(d.pres < 10);
            prop_assert_eq!(d.divisor() as u32, FOSC / (baud * 16) - 1);
        }
    }
}
