use std::str::FromStr;

use mx_core::accel::device::DeviceDescriptor;

use crate::error::{BenchError, Result};

pub const ENV_M: &str = "MX_M";
pub const ENV_N: &str = "MX_N";
pub const ENV_W: &str = "MX_W";
pub const ENV_FILL: &str = "MX_FILL";
pub const ENV_SEED: &str = "MX_SEED";
pub const ENV_VERIFY: &str = "MX_VERIFY";
pub const ENV_DEVICE: &str = "MX_DEVICE";

/// How input matrices are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPattern {
    /// A counts up from 0; B counts down from where A stopped.
    Sequential,
    /// Uniform `i32` values from a seeded generator.
    Random,
}

impl FromStr for FillPattern {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(FillPattern::Sequential),
            "random" => Ok(FillPattern::Random),
            other => Err(format!("expected 'sequential' or 'random', got '{other}'")),
        }
    }
}

/// Which device the accelerator engine runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePolicy {
    /// First device that supports host-shared memory, else the system default.
    PreferHostShared,
    /// The runtime's system default.
    SystemDefault,
    /// The device with this path, else the system default.
    Path(String),
}

impl DevicePolicy {
    /// The predicate this policy selects with, if it selects at all.
    pub fn matches(&self, device: &DeviceDescriptor) -> bool {
        match self {
            DevicePolicy::PreferHostShared => device.supports_host_shared_memory(),
            DevicePolicy::SystemDefault => false,
            DevicePolicy::Path(path) => device.path() == path,
        }
    }
}

impl FromStr for DevicePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Err("device policy must not be empty".to_string()),
            "shared" => Ok(DevicePolicy::PreferHostShared),
            "default" => Ok(DevicePolicy::SystemDefault),
            path => Ok(DevicePolicy::Path(path.to_string())),
        }
    }
}

/// Parameters of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Rows of A and C.
    pub m: usize,
    /// Columns of B and C.
    pub n: usize,
    /// Columns of A, rows of B.
    pub w: usize,
    pub fill: FillPattern,
    pub seed: u64,
    /// Compare engine outputs after the runs.
    pub verify: bool,
    pub device: DevicePolicy,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            m: 1024,
            n: 1024,
            w: 1024,
            fill: FillPattern::Sequential,
            seed: 0,
            verify: true,
            device: DevicePolicy::PreferHostShared,
        }
    }
}

impl BenchConfig {
    /// Defaults overridden by `MX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `MX_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse(&lookup, ENV_M)? {
            config.m = v;
        }
        if let Some(v) = parse(&lookup, ENV_N)? {
            config.n = v;
        }
        if let Some(v) = parse(&lookup, ENV_W)? {
            config.w = v;
        }
        if let Some(v) = parse(&lookup, ENV_FILL)? {
            config.fill = v;
        }
        if let Some(v) = parse(&lookup, ENV_SEED)? {
            config.seed = v;
        }
        if let Some(v) = parse(&lookup, ENV_VERIFY)? {
            config.verify = v;
        }
        if let Some(v) = parse(&lookup, ENV_DEVICE)? {
            config.device = v;
        }
        Ok(config)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| BenchError::Config {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = BenchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c, BenchConfig::default());
        assert_eq!((c.m, c.n, c.w), (1024, 1024, 1024));
        assert_eq!(c.device, DevicePolicy::PreferHostShared);
    }

    #[test]
    fn test_overrides() {
        let c = BenchConfig::from_lookup(lookup(&[
            (ENV_M, "8"),
            (ENV_N, " 4 "),
            (ENV_W, "2"),
            (ENV_FILL, "Random"),
            (ENV_SEED, "42"),
            (ENV_VERIFY, "false"),
            (ENV_DEVICE, "rayon\\ref"),
        ]))
        .unwrap();
        assert_eq!((c.m, c.n, c.w), (8, 4, 2));
        assert_eq!(c.fill, FillPattern::Random);
        assert_eq!(c.seed, 42);
        assert!(!c.verify);
        assert_eq!(c.device, DevicePolicy::Path("rayon\\ref".to_string()));
    }

    #[test]
    fn test_bad_number() {
        let err = BenchConfig::from_lookup(lookup(&[(ENV_M, "-3")])).unwrap_err();
        assert!(matches!(err, BenchError::Config { ref key, .. } if key == ENV_M));
    }

    #[test]
    fn test_bad_fill() {
        assert!(BenchConfig::from_lookup(lookup(&[(ENV_FILL, "zigzag")])).is_err());
    }

    #[test]
    fn test_device_policy_parse() {
        assert_eq!("shared".parse::<DevicePolicy>(), Ok(DevicePolicy::PreferHostShared));
        assert_eq!("default".parse::<DevicePolicy>(), Ok(DevicePolicy::SystemDefault));
        assert!("".parse::<DevicePolicy>().is_err());
    }

    #[test]
    fn test_policy_matches() {
        let d = DeviceDescriptor::new("x", "p\\x", 1);
        assert!(!DevicePolicy::PreferHostShared.matches(&d));
        assert!(!DevicePolicy::SystemDefault.matches(&d));
        assert!(DevicePolicy::Path("p\\x".to_string()).matches(&d));
    }
}
