//! Compute device selection for the evaluation model.

use std::fmt;
use std::path::Path;

/// Device hint forwarded to the model provider, e.g. `cuda`, `cuda:1`, `cpu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device(String);

impl Device {
    pub fn cpu() -> Self {
        Self("cpu".to_string())
    }

    pub fn cuda() -> Self {
        Self("cuda".to_string())
    }

    /// Resolve from an optional explicit choice. An explicit non-empty string
    /// wins; otherwise CUDA when an accelerator is visible, else CPU.
    pub fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self::fallback(cuda_available()),
        }
    }

    fn fallback(cuda_available: bool) -> Self {
        if cuda_available { Self::cuda() } else { Self::cpu() }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Best-effort accelerator probe. Actual placement is owned by the serving
/// side; this only picks the default hint.
fn cuda_available() -> bool {
    if let Ok(visible) = std::env::var("CUDA_VISIBLE_DEVICES") {
        return !visible.is_empty() && visible != "-1";
    }
    Path::new("/dev/nvidia0").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_device_wins() {
        assert_eq!(Device::resolve(Some("cuda:1")).as_str(), "cuda:1");
        assert_eq!(Device::resolve(Some("mps")).as_str(), "mps");
    }

    #[test]
    fn test_empty_explicit_falls_back() {
        let resolved = Device::resolve(Some(""));
        assert!(resolved == Device::cpu() || resolved == Device::cuda());
    }

    #[test]
    fn test_fallback_without_accelerator_is_cpu() {
        assert_eq!(Device::fallback(false), Device::cpu());
        assert_eq!(Device::fallback(true), Device::cuda());
    }
}
