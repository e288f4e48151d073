use anyhow::{Context, Result};
use common::RetargetConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where landmark frames come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum SourceKind {
    /// JSON frames received as UDP datagrams.
    #[default]
    #[serde(alias = "UDP", alias = "udp", alias = "Network")]
    Udp,
    /// A JSON Lines recording played back frame by frame.
    #[serde(alias = "replay", alias = "File", alias = "Recording")]
    Replay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub listen_port: u16,
    pub replay_path: PathBuf,
    pub replay_loop: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            listen_port: 9100,
            replay_path: PathBuf::from("recording.jsonl"),
            replay_loop: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub enabled: bool,
    #[serde(alias = "address")]
    pub send_address: String,
    #[serde(alias = "port")]
    pub send_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            send_address: "127.0.0.1".to_string(),
            send_port: 9101,
        }
    }
}

impl OutputConfig {
    pub fn target_address(&self) -> String {
        format!("{}:{}", self.send_address, self.send_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    pub retarget: RetargetConfig,
    pub rig_path: PathBuf,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub max_fps: Option<f32>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            retarget: RetargetConfig::default(),
            rig_path: PathBuf::from("rig.json"),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            max_fps: Some(60.0),
        }
    }
}

impl DaemonConfig {
    /// Target interval of the frame loop. `None` means uncapped; a `max_fps`
    /// that is not a positive finite number is treated the same way.
    pub fn frame_duration(&self) -> Option<Duration> {
        let fps = self.max_fps?;
        if !fps.is_finite() || fps <= 0.0 {
            warn!("Ignoring max_fps {}: must be a positive number. Running uncapped.", fps);
            return None;
        }
        Duration::try_from_secs_f32(1.0 / fps).ok()
    }
}

/// Reads `path`, or writes a default config there when it does not exist.
pub fn load_config(path: &Path) -> Result<DaemonConfig> {
    if path.exists() {
        info!("Loading config from {:?}", path);
        let file = fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    } else {
        info!("Config not found. Creating default at {:?}", path);
        let config = DaemonConfig::default();
        let file =
            fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &config)?;
        Ok(config)
    }
}
