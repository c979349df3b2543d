use anyhow::{bail, Context};
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:42069";
const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Server configuration.
///
/// Resolved from an optional YAML file named by `RAWHTTP_CONFIG`, then
/// overridden by the `LISTEN` and `READ_BUFFER_SIZE` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Size of the scratch buffer each connection reads into
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration against `lookup` instead of the process
    /// environment.
    pub fn from_source<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("RAWHTTP_CONFIG") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml(&raw).with_context(|| format!("invalid config file {}", path))?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Some(size) = lookup("READ_BUFFER_SIZE") {
            cfg.read_buffer_size = size
                .parse()
                .with_context(|| format!("READ_BUFFER_SIZE is not a number: {}", size))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.read_buffer_size == 0 {
            bail!("read_buffer_size must be greater than zero");
        }
        Ok(())
    }
}
