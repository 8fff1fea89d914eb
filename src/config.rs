//! Game configuration.
//!
//! Settings start from safe defaults, are optionally overlaid by an INI
//! file, and finally by command-line flags.
//!
//! # Configuration File Format
//!
//! ```ini
//! [field]
//! width = 800
//! height = 600
//!
//! [game]
//! enemies = 8
//! score_per_kill = 10
//! target_fps = 60
//!
//! [audio]
//! sound = true
//!
//! [assets]
//! dir = assets
//! ```

use std::path::PathBuf;

use clap::Parser;
use configparser::ini::Ini;
use log::info;

use crate::entities::Rules;

const DEFAULT_FIELD_WIDTH: u32 = 800;
const DEFAULT_FIELD_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_SOUND: bool = true;
const DEFAULT_ASSET_DIR: &str = "assets";
const DEFAULT_LOG_FILE: &str = "space_invaders.log";
pub const DEFAULT_CONFIG_PATH: &str = "./space_invaders.ini";

/// Largest accepted field width or height, in logical pixels.
pub const MAX_FIELD_SIZE: u32 = 100_000;

/// Space Invaders for the terminal
#[derive(Parser, Debug, Default)]
#[command(version, about = "A small Space Invaders clone for the terminal")]
pub struct Cli {
    /// INI configuration file (default: ./space_invaders.ini when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logical field width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Logical field height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Enemies kept on the field.
    #[arg(long)]
    pub enemies: Option<usize>,

    /// Frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Directory holding the character-art assets.
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Disable the hit sound.
    #[arg(long)]
    pub mute: bool,

    /// Where log output goes (the terminal itself is owned by the game).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Seed the RNG for a reproducible game.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub field_width: u32,
    pub field_height: u32,
    pub enemy_count: usize,
    pub score_per_kill: u32,
    pub target_fps: u32,
    pub sound: bool,
    pub asset_dir: PathBuf,
    pub log_file: PathBuf,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        let rules = Rules::default();
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            enemy_count: rules.enemy_count,
            score_per_kill: rules.score_per_kill,
            target_fps: DEFAULT_TARGET_FPS,
            sound: DEFAULT_SOUND,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            seed: None,
        }
    }

    /// Build the effective configuration: defaults, then the INI file, then
    /// flags.  A config file named on the command line must load; the
    /// default one is skipped when it does not exist.
    pub fn resolve(cli: &Cli) -> Result<Self, String> {
        let mut config = Self::new();
        match &cli.config {
            Some(path) => config.load_from_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    config.load_from_file(&path)?;
                }
            }
        }
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the game cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("width", self.field_width), ("height", self.field_height)] {
            if value == 0 || value > MAX_FIELD_SIZE {
                return Err(format!(
                    "Field {name} {value} out of range (1..={MAX_FIELD_SIZE})"
                ));
            }
        }
        Ok(())
    }

    /// Load values from an INI file.  Missing values keep their current
    /// setting; a key with an unparsable value is an error.
    pub fn load_from_file(&mut self, path: &std::path::Path) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| format!("Failed to load config file {}: {}", path.display(), e))?;
        self.apply_ini(&ini)?;
        info!("Loaded config from {}", path.display());
        Ok(())
    }

    /// Same as `load_from_file`, from an in-memory INI document.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&ini)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), String> {
        // [field] section
        if let Some(width) = get_u32(ini, "field", "width")? {
            self.field_width = width;
        }
        if let Some(height) = get_u32(ini, "field", "height")? {
            self.field_height = height;
        }

        // [game] section
        if let Some(enemies) = ini.getuint("game", "enemies")? {
            self.enemy_count = usize::try_from(enemies)
                .map_err(|_| format!("[game] enemies = {enemies} is too large"))?;
        }
        if let Some(score) = get_u32(ini, "game", "score_per_kill")? {
            self.score_per_kill = score;
        }
        if let Some(fps) = get_u32(ini, "game", "target_fps")? {
            self.target_fps = fps;
        }

        // [audio] section
        if let Some(sound) = ini.getbool("audio", "sound")? {
            self.sound = sound;
        }

        // [assets] section
        if let Some(dir) = ini.get("assets", "dir") {
            self.asset_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.field_width = width;
        }
        if let Some(height) = cli.height {
            self.field_height = height;
        }
        if let Some(enemies) = cli.enemies {
            self.enemy_count = enemies;
        }
        if let Some(fps) = cli.fps {
            self.target_fps = fps;
        }
        if let Some(dir) = &cli.assets {
            self.asset_dir = dir.clone();
        }
        if cli.mute {
            self.sound = false;
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
    }

    pub fn rules(&self) -> Rules {
        Rules {
            enemy_count: self.enemy_count,
            score_per_kill: self.score_per_kill,
        }
    }

    /// Duration of one frame at `target_fps` (at least 1 FPS).
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.target_fps.max(1)
    }
}

fn get_u32(ini: &Ini, section: &str, key: &str) -> Result<Option<u32>, String> {
    match ini.getuint(section, key)? {
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| format!("[{section}] {key} = {value} does not fit in 32 bits")),
        None => Ok(None),
    }
}
