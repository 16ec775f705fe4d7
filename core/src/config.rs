use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

const DEFAULT_DIR_NAME: &str = ".todolite";

/// Which application variant owns the persisted blob. The two coexist under
/// different keys and never read each other's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Records carry `id`, `text` and `completed`.
    Minimal,
    /// Records also carry `createdAt`.
    #[default]
    Rich,
}

impl Variant {
    pub fn storage_key(&self) -> &'static str {
        match self {
            Variant::Minimal => "todos",
            Variant::Rich => "todos.v1",
        }
    }

    pub fn records_timestamps(&self) -> bool {
        matches!(self, Variant::Rich)
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Variant::Minimal),
            "rich" => Ok(Variant::Rich),
            _ => Err(anyhow!("Unknown variant: '{}' (expected minimal or rich)", s)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Minimal => f.write_str("minimal"),
            Variant::Rich => f.write_str("rich"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub variant: Variant,
}

impl StoreConfig {
    /// Uses `data_dir` when given, otherwise `~/.todolite`.
    pub fn resolve(data_dir: Option<PathBuf>, variant: Variant) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        };
        Ok(Self { data_dir, variant })
    }

    pub fn storage_key(&self) -> &'static str {
        self.variant.storage_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_keys_differ() {
        assert_eq!(Variant::Rich.storage_key(), "todos.v1");
        assert_eq!(Variant::Minimal.storage_key(), "todos");
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!("Minimal".parse::<Variant>().unwrap(), Variant::Minimal);
        assert_eq!("rich".parse::<Variant>().unwrap(), Variant::Rich);
        assert!("fancy".parse::<Variant>().is_err());
    }

    #[test]
    fn test_explicit_dir_wins() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/tl")), Variant::Minimal).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tl"));
        assert_eq!(config.storage_key(), "todos");
    }
}
