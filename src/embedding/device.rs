use std::str::FromStr;

use candle_core::Device;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Requested compute device for the dense encoder.
pub enum DevicePreference {
    /// Always run on the CPU.
    #[default]
    Cpu,
    /// Use Metal or CUDA when compiled in and available, otherwise fall back to CPU.
    Accelerator,
}

impl DevicePreference {
    /// Lowercase name used in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePreference::Cpu => "cpu",
            DevicePreference::Accelerator => "accelerator",
        }
    }
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(DevicePreference::Cpu),
            "accelerator" | "gpu" | "cuda" | "metal" => Ok(DevicePreference::Accelerator),
            other => Err(format!(
                "unknown device '{other}' (expected 'cpu' or 'accelerator')"
            )),
        }
    }
}

/// Resolves a preference to a device (accelerators fall back to CPU).
pub fn select_device(preference: DevicePreference) -> Device {
    if preference == DevicePreference::Cpu {
        debug!("CPU device requested");
        return Device::Cpu;
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    let failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU acceleration");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(error = %msg, "Metal device unavailable");
                failures.push(format!("metal failed: {msg}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA GPU acceleration");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(error = %msg, "CUDA device unavailable");
                failures.push(format!("cuda failed: {msg}"));
            }
        }
    }

    let reason = if !cfg!(any(feature = "metal", feature = "cuda")) {
        "no GPU backend compiled".to_string()
    } else if failures.is_empty() {
        "no GPU device available".to_string()
    } else {
        failures.join("; ")
    };

    warn!(reason = %reason, "Falling back to CPU device");
    Device::Cpu
}
