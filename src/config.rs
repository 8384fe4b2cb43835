use std::{error::Error, fmt::Display, str::FromStr};

/// Side length of a square median window.
///
/// Always a positive odd number so the window has a center pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSize(u32);

impl KernelSize {
    pub fn new(size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return ConfigError::get("kernel size must be positive");
        }
        if size % 2 == 0 {
            return ConfigError::get(&format!("kernel size must be odd, got {}", size));
        }
        Ok(KernelSize(size))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Distance from the window center to its edge.
    #[inline]
    pub fn radius(self) -> usize {
        (self.0 / 2) as usize
    }
}

impl FromStr for KernelSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size = match s.trim().parse::<i64>() {
            Ok(val) => val,
            Err(_) => return ConfigError::get(&format!("'{}' is not an integer", s)),
        };
        if size <= 0 {
            return ConfigError::get("kernel size must be positive");
        }
        match u32::try_from(size) {
            Ok(val) => KernelSize::new(val),
            Err(_) => ConfigError::get(&format!("kernel size {} is too large", size)),
        }
    }
}

impl Display for KernelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Peak sample value used to normalise RMSE and to anchor PSNR.
pub const DEFAULT_MAX_VALUE: f64 = 4095.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricConfig {
    pub max_value: f64,
}

impl MetricConfig {
    pub fn new(max_value: f64) -> Result<Self, ConfigError> {
        if !max_value.is_finite() || max_value <= 0.0 {
            return ConfigError::get(&format!(
                "max value must be a positive finite number, got {}",
                max_value
            ));
        }
        Ok(MetricConfig { max_value })
    }
}

impl Default for MetricConfig {
    fn default() -> Self {
        MetricConfig {
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

/// clap value parser for `--max-value`
pub fn parse_max_value(s: &str) -> Result<f64, ConfigError> {
    let value = match s.trim().parse::<f64>() {
        Ok(val) => val,
        Err(_) => return ConfigError::get(&format!("'{}' is not a number", s)),
    };
    MetricConfig::new(value).map(|config| config.max_value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    msg: String,
}

impl ConfigError {
    fn get<T>(msg: &str) -> Result<T, ConfigError> {
        Err(ConfigError {
            msg: msg.to_string(),
        })
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("ConfigError {}", self.msg))
    }
}
impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_size_accepts_odd() {
        assert_eq!("1".parse::<KernelSize>().unwrap().get(), 1);
        assert_eq!("3".parse::<KernelSize>().unwrap().get(), 3);
        assert_eq!(" 15 ".parse::<KernelSize>().unwrap().radius(), 7);
    }

    #[test]
    fn test_kernel_size_rejects_invalid() {
        assert!("0".parse::<KernelSize>().is_err());
        assert!("4".parse::<KernelSize>().is_err());
        assert!("-3".parse::<KernelSize>().is_err());
        assert!("3.0".parse::<KernelSize>().is_err());
        assert!("three".parse::<KernelSize>().is_err());
        assert!("99999999999".parse::<KernelSize>().is_err());
    }

    #[test]
    fn test_max_value() {
        assert_eq!(MetricConfig::default().max_value, 4095.0);
        assert_eq!(parse_max_value("255").unwrap(), 255.0);
        assert!(parse_max_value("0").is_err());
        assert!(parse_max_value("-1").is_err());
        assert!(parse_max_value("inf").is_err());
        assert!(parse_max_value("NaN").is_err());
    }
}
