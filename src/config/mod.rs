use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub overlay: OverlayConfig,
    pub fuse: FuseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Backing roots in search order; the first is the primary root.
    pub roots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuseConfig {
    pub mount_point: String,
    pub allow_other: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("signpostfs").required(false))
            .add_source(config::Environment::with_prefix("SIGNPOSTFS"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig { roots: Vec::new() },
            fuse: FuseConfig { mount_point: "/mnt/signpostfs".to_string(), allow_other: false },
        }
    }
}
