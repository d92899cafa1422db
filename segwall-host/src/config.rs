//! Host configuration
//!
//! Loads the TOML scene description. The bundled `calc.toml` (the adder
//! scene) is used when no path is given.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use segwall_core::{BlockType, Coord, Cuboid, MarkerStyle, RegisterConfig, Router, WallConfig};
use segwall_protocol::DEFAULT_PORT;

use crate::error::ConfigError;
use crate::pins::{parse_pin_string, PinSpec};

/// Bundled adder scene
pub const DEFAULT_CONFIG: &str = include_str!("../calc.toml");

/// Complete host configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub timing: TimingSection,
    #[serde(default)]
    pub scene: SceneSection,
    #[serde(default, rename = "register")]
    pub registers: Vec<RegisterSection>,
}

/// World service connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSection {
    pub host: String,
    pub port: u16,
    /// Socket read/write timeout
    pub timeout_ms: u64,
    /// Reconnect attempts per failed request
    pub retries: u32,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout_ms: 2000,
            retries: 3,
        }
    }
}

impl WorldSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Loop timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    pub poll_interval_ms: u64,
    /// Wait before the first world request
    pub startup_delay_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            startup_delay_ms: 1000,
        }
    }
}

impl TimingSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

/// World preparation before the loop starts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSection {
    /// Chat message posted first
    pub greeting: Option<String>,
    /// Where the player is moved once the scene is built
    pub player: Option<Coord>,
    pub floor: Option<FloorSection>,
}

/// Floor slab and the air pad cleared above it
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorSection {
    pub origin: Coord,
    /// Cells along x, y and z
    pub size: [u16; 3],
    #[serde(default = "default_floor_block")]
    pub block: BlockType,
    /// Margin around the floor cleared to air, and the pad height
    pub air_margin: Option<[u16; 3]>,
}

fn default_floor_block() -> BlockType {
    BlockType::BEDROCK
}

impl FloorSection {
    /// Volume of the floor slab
    pub fn slab(&self) -> Cuboid {
        let [sx, sy, sz] = self.size.map(|n| n.max(1) as i32);
        Cuboid::new(self.origin, self.origin.offset(sx - 1, sy - 1, sz - 1))
    }

    /// Air volume above and around the slab
    ///
    /// Starts one block above the floor origin and reaches `margin` cells
    /// past the slab on x and z, up to `margin.y` above the origin.
    pub fn air_pad(&self) -> Option<Cuboid> {
        let [mx, my, mz] = self.air_margin?.map(i32::from);
        let [sx, _, sz] = self.size.map(i32::from);
        let o = self.origin;
        Some(Cuboid::new(
            o.offset(-mx, 1, -mz),
            o.offset(sx + mx, my.max(1), sz + mz),
        ))
    }
}

/// One register and its pins
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterSection {
    pub name: String,
    /// Bits, least significant first
    pub markers: Vec<MarkerSection>,
    /// Block placed at each marker during scene setup
    #[serde(default = "default_marker_block")]
    pub marker_block: BlockType,
    pub style: Option<MarkerStyle>,
    pub wall: Option<WallConfig>,
}

fn default_marker_block() -> BlockType {
    BlockType::GOLD_BLOCK
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerSection {
    pub pos: Coord,
    /// `gpioN`, `pinN`, optionally prefixed with `!`
    pub pin: String,
}

/// Registers and lines ready to drive
#[derive(Debug)]
pub struct Resolved {
    pub router: Router,
    /// Every output line, in register and bit order
    pub lines: Vec<PinSpec>,
}

impl HostConfig {
    /// Parse a TOML document
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load from `path`, or the bundled scene
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::parse(&text)
            }
            None => Self::parse(DEFAULT_CONFIG),
        }
    }

    /// Resolve pins and build the registers
    pub fn resolve(&self) -> Result<Resolved, ConfigError> {
        if self.registers.is_empty() {
            return Err(ConfigError::NoRegisters);
        }

        let mut configs = Vec::with_capacity(self.registers.len());
        let mut lines = Vec::new();
        for section in &self.registers {
            let register_err = |reason| ConfigError::Register {
                register: section.name.clone(),
                reason,
            };

            let mut config = RegisterConfig::new(&section.name).map_err(register_err)?;
            for marker in &section.markers {
                let spec =
                    parse_pin_string(&marker.pin).ok_or_else(|| ConfigError::InvalidPin {
                        register: section.name.clone(),
                        pin: marker.pin.clone(),
                    })?;
                config
                    .push_marker(marker.pos, spec.line)
                    .map_err(register_err)?;
                lines.push(spec);
            }
            config.style = section.style;
            config.wall = section.wall;
            configs.push(config);
        }

        let router = Router::from_configs(&configs).map_err(ConfigError::Layout)?;
        Ok(Resolved { router, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segwall_core::config::ConfigError as CoreConfigError;
    use segwall_core::{Layout, RegisterError, RouterError};

    #[test]
    fn test_bundled_config() {
        let config = HostConfig::load(None).unwrap();
        assert_eq!(config.world.port, 4711);
        assert_eq!(config.timing.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.timing.startup_delay(), Duration::from_secs(1));
        assert_eq!(config.scene.greeting.as_deref(), Some("Minecraft-pi calc."));
        assert_eq!(config.scene.player, Some(Coord::new(12, 2, 0)));

        let resolved = config.resolve().unwrap();
        let names: Vec<_> = resolved.router.registers().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["a", "b"]);

        let lines: Vec<_> = resolved.lines.iter().map(|p| p.line).collect();
        assert_eq!(lines, [4, 17, 27, 18, 23, 24]);

        let a = resolved.router.register_by_name("a").unwrap();
        assert_eq!(a.markers()[2].pos, Coord::new(10, 0, 3));
        assert_eq!(a.style().on, BlockType::TORCH);
        assert_eq!(a.style().cell(a.markers()[0].pos), Coord::new(6, 1, 3));

        let wall = a.wall().unwrap();
        assert_eq!(wall.layout(), Layout::Fixed);
        assert_eq!(wall.bounds().start(), Coord::new(5, 1, 9));
        assert_eq!(wall.background(), BlockType::GOLD_BLOCK);
        assert_eq!(wall.lit(), BlockType::DIAMOND_BLOCK);

        let b = resolved.router.register_by_name("b").unwrap();
        assert_eq!(b.wall().unwrap().layout(), Layout::Proportional);
    }

    #[test]
    fn test_bundled_floor() {
        let config = HostConfig::parse(DEFAULT_CONFIG).unwrap();
        let floor = config.scene.floor.unwrap();
        assert_eq!(floor.block, BlockType::BEDROCK);

        let slab = floor.slab();
        assert_eq!(slab.start(), Coord::new(0, 0, 0));
        assert_eq!(slab.end(), Coord::new(24, 0, 15));

        let pad = floor.air_pad().unwrap();
        assert_eq!(pad.start(), Coord::new(-10, 1, -10));
        assert_eq!(pad.end(), Coord::new(35, 100, 26));
    }

    #[test]
    fn test_led_demo() {
        let config = HostConfig::parse(include_str!("../demos/led.toml")).unwrap();
        assert_eq!(config.timing.startup_delay_ms, 2000);
        assert_eq!(config.timing.poll_interval_ms, 100);
        assert!(config.scene.floor.is_none());

        let resolved = config.resolve().unwrap();
        let led = resolved.router.register(0).unwrap();
        assert!(led.wall().is_none());
        assert_eq!(led.markers()[0].line, 4);
        assert_eq!(config.registers[0].marker_block, BlockType::GRASS);
    }

    #[test]
    fn test_defaults_applied() {
        let config = HostConfig::parse(
            r#"
            [[register]]
            name = "x"
            markers = [{ pos = { x = 1, y = 2, z = 3 }, pin = "!gpio5" }]
            wall = { origin = [0, 1, 0] }
            "#,
        )
        .unwrap();
        assert_eq!(config.world.host, "127.0.0.1");
        assert_eq!(config.world.retries, 3);
        assert_eq!(config.registers[0].marker_block, BlockType::GOLD_BLOCK);

        let wall = config.registers[0].wall.unwrap();
        assert_eq!((wall.width, wall.height, wall.thickness), (8, 9, 1));
        assert_eq!(wall.layout, Layout::Fixed);

        let resolved = config.resolve().unwrap();
        assert!(resolved.lines[0].inverted);
        assert_eq!(resolved.lines[0].line, 5);
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            HostConfig::parse("").unwrap().resolve(),
            Err(ConfigError::NoRegisters)
        ));
        assert!(matches!(
            HostConfig::parse("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));

        let bad_pin = HostConfig::parse(
            r#"
            [[register]]
            name = "a"
            markers = [{ pos = [0, 0, 0], pin = "pin6" }]
            "#,
        )
        .unwrap();
        assert!(matches!(
            bad_pin.resolve(),
            Err(ConfigError::InvalidPin { pin, .. }) if pin == "pin6"
        ));

        let shared = HostConfig::parse(
            r#"
            [[register]]
            name = "a"
            markers = [{ pos = [0, 0, 0], pin = "pin7" }]

            [[register]]
            name = "b"
            markers = [{ pos = [2, 0, 0], pin = "gpio4" }]
            "#,
        )
        .unwrap();
        assert!(matches!(
            shared.resolve(),
            Err(ConfigError::Layout(RouterError::SharedLine(4)))
        ));

        let wide = HostConfig::parse(
            r#"
            [[register]]
            name = "a"
            markers = [
                { pos = [0, 0, 0], pin = "gpio2" },
                { pos = [1, 0, 0], pin = "gpio3" },
                { pos = [2, 0, 0], pin = "gpio4" },
                { pos = [3, 0, 0], pin = "gpio5" },
            ]
            wall = { origin = [0, 1, 0] }
            "#,
        )
        .unwrap();
        assert!(matches!(
            wide.resolve(),
            Err(ConfigError::Layout(RouterError::Register(
                RegisterError::ValueExceedsDigit { bits: 4 }
            )))
        ));

        let hidden = HostConfig::parse(
            r#"
            [[register]]
            name = "a"
            markers = [{ pos = [0, 0, 0], pin = "gpio2" }]
            style = { on = 50, off = 0 }
            "#,
        )
        .unwrap();
        assert!(matches!(
            hidden.resolve(),
            Err(ConfigError::Layout(RouterError::Register(
                RegisterError::HiddenMarker
            )))
        ));

        let long = HostConfig::parse(
            r#"
            [[register]]
            name = "a-register-name-that-is-too-long"
            markers = [{ pos = [0, 0, 0], pin = "gpio2" }]
            "#,
        )
        .unwrap();
        assert!(matches!(
            long.resolve(),
            Err(ConfigError::Register {
                reason: CoreConfigError::NameTooLong,
                ..
            })
        ));
    }
}
