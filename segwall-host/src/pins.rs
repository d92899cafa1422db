//! Output line setup
//!
//! Resolves pin strings from the config to BCM line numbers and builds the
//! pin bank the registers drive: real GPIO through rppal, or logged lines
//! for a dry run.

use log::debug;
use segwall_drivers::PinBank;
use segwall_hal::{Level, OutputPin, PinId};

use crate::error::PinSetupError;

/// Highest BCM line on the 40-pin header
pub const MAX_BCM_LINE: u8 = 27;

/// BCM line for each physical header pin; `None` for power and ground
const HEADER_TO_BCM: [Option<u8>; 41] = [
    None,     // (no pin 0)
    None,     // 1: 3V3
    None,     // 2: 5V
    Some(2),  // 3
    None,     // 4: 5V
    Some(3),  // 5
    None,     // 6: GND
    Some(4),  // 7
    Some(14), // 8
    None,     // 9: GND
    Some(15), // 10
    Some(17), // 11
    Some(18), // 12
    Some(27), // 13
    None,     // 14: GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17: 3V3
    Some(24), // 18
    Some(10), // 19
    None,     // 20: GND
    Some(9),  // 21
    Some(25), // 22
    Some(11), // 23
    Some(8),  // 24
    None,     // 25: GND
    Some(7),  // 26
    Some(0),  // 27
    Some(1),  // 28
    Some(5),  // 29
    None,     // 30: GND
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34: GND
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39: GND
    Some(21), // 40
];

/// BCM line wired to a physical header pin
pub fn header_to_bcm(pin: u8) -> Option<u8> {
    HEADER_TO_BCM.get(pin as usize).copied().flatten()
}

/// A resolved output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    /// BCM line number
    pub line: PinId,
    /// If true, logical HIGH = pin LOW
    pub inverted: bool,
}

impl PinSpec {
    /// Physical level of the line while its bit is off
    pub fn idle_level(&self) -> Level {
        if self.inverted {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio4" -> BCM 4
/// - "pin7" -> header pin 7 (BCM 4)
/// - "!gpio4" -> active-low
pub fn parse_pin_string(s: &str) -> Option<PinSpec> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let line = if let Some(num) = s.strip_prefix("gpio") {
        let line: u8 = num.parse().ok()?;
        if line > MAX_BCM_LINE {
            return None;
        }
        line
    } else if let Some(num) = s.strip_prefix("pin") {
        header_to_bcm(num.parse().ok()?)?
    } else {
        return None;
    };

    Some(PinSpec { line, inverted })
}

/// Output pin that only logs, for running without hardware
#[derive(Debug)]
pub struct LoggedPin {
    line: PinId,
    high: bool,
}

impl LoggedPin {
    pub fn new(line: PinId) -> Self {
        Self { line, high: false }
    }
}

impl OutputPin for LoggedPin {
    fn set_high(&mut self) {
        debug!("gpio{} high", self.line);
        self.high = true;
    }

    fn set_low(&mut self) {
        debug!("gpio{} low", self.line);
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub type DryRunPins = PinBank<LoggedPin>;

/// Build a bank of logged lines
pub fn dry_run_pins(specs: &[PinSpec]) -> Result<DryRunPins, PinSetupError> {
    let mut bank = PinBank::new();
    for spec in specs {
        bank.attach(spec.line, LoggedPin::new(spec.line), spec.inverted)
            .map_err(PinSetupError::Bank)?;
    }
    Ok(bank)
}

#[cfg(feature = "rpi")]
pub use gpio::{gpio_pins, GpioPins};

#[cfg(feature = "rpi")]
mod gpio {
    use rppal::gpio::{Gpio, OutputPin as RppalPin};
    use segwall_drivers::{EmbeddedHalPin, PinBank};
    use segwall_hal::Level;

    use super::PinSpec;
    use crate::error::PinSetupError;

    pub type GpioPins = PinBank<EmbeddedHalPin<RppalPin>>;

    /// Claim every line as an output, inactive
    pub fn gpio_pins(specs: &[PinSpec]) -> Result<GpioPins, PinSetupError> {
        let gpio = Gpio::new()?;
        let mut bank = PinBank::new();
        for spec in specs {
            // Claim the line already at its idle level so it never pulses
            let idle = spec.idle_level();
            let pin = match idle {
                Level::High => gpio.get(spec.line)?.into_output_high(),
                Level::Low => gpio.get(spec.line)?.into_output_low(),
            };
            bank.attach(spec.line, EmbeddedHalPin::new(pin, idle), spec.inverted)
                .map_err(PinSetupError::Bank)?;
        }
        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segwall_hal::PinDriver;

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(
            parse_pin_string("gpio17"),
            Some(PinSpec {
                line: 17,
                inverted: false
            })
        );
        assert_eq!(
            parse_pin_string("!gpio4"),
            Some(PinSpec {
                line: 4,
                inverted: true
            })
        );
        assert_eq!(parse_pin_string("pin7").map(|p| p.line), Some(4));
        assert_eq!(parse_pin_string(" !pin11 ").map(|p| p.line), Some(17));

        // Invalid
        assert_eq!(parse_pin_string("gpio28"), None);
        assert_eq!(parse_pin_string("pin6"), None);
        assert_eq!(parse_pin_string("pin41"), None);
        assert_eq!(parse_pin_string("^gpio4"), None);
        assert_eq!(parse_pin_string("7"), None);
        assert_eq!(parse_pin_string(""), None);
    }

    #[test]
    fn test_idle_level_follows_polarity() {
        assert_eq!(parse_pin_string("gpio4").unwrap().idle_level(), Level::Low);
        assert_eq!(parse_pin_string("!pin11").unwrap().idle_level(), Level::High);
    }

    #[test]
    fn test_header_map() {
        // Adder wiring
        let a: Vec<_> = [7, 11, 13].iter().map(|&p| header_to_bcm(p)).collect();
        let b: Vec<_> = [12, 16, 18].iter().map(|&p| header_to_bcm(p)).collect();
        assert_eq!(a, [Some(4), Some(17), Some(27)]);
        assert_eq!(b, [Some(18), Some(23), Some(24)]);

        for power in [1, 2, 4, 6, 9, 14, 17, 20, 25, 30, 34, 39] {
            assert_eq!(header_to_bcm(power), None, "pin {}", power);
        }
        assert_eq!(header_to_bcm(0), None);

        // Every BCM line 0-27 appears exactly once
        let mut seen = [0u8; 28];
        for pin in 1..=40 {
            if let Some(line) = header_to_bcm(pin) {
                seen[line as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_dry_run_pins() {
        let specs = [
            parse_pin_string("pin7").unwrap(),
            parse_pin_string("!pin11").unwrap(),
        ];
        let mut pins = dry_run_pins(&specs).unwrap();
        pins.configure_output(4).unwrap();
        pins.configure_output(17).unwrap();
        pins.set_level(4, Level::High).unwrap();

        assert!(pins.pin(4).unwrap().is_set_high());
        // Active-low line at rest
        assert!(pins.pin(17).unwrap().is_set_high());
    }
}
