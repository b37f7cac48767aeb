//! Sensor-domain synthesis configuration

use serde::{Deserialize, Serialize};

use crate::burst_pipeline::burst::BurstConfig;
use crate::burst_pipeline::common::error::Result;

fn enabled() -> bool {
    true
}

/// Which inverse-ISP stages and noise are applied.
///
/// Keys missing from a configuration dictionary default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFlags {
    #[serde(default = "enabled")]
    pub random_ccm: bool,
    #[serde(default = "enabled")]
    pub random_gains: bool,
    #[serde(default = "enabled")]
    pub smoothstep: bool,
    #[serde(default = "enabled")]
    pub gamma: bool,
    #[serde(default = "enabled")]
    pub add_noise: bool,
}

impl Default for ProcessingFlags {
    fn default() -> Self {
        Self {
            random_ccm: true,
            random_gains: true,
            smoothstep: true,
            gamma: true,
            add_noise: true,
        }
    }
}

impl ProcessingFlags {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every stage disabled: the burst stays in linear RGB up to mosaicking.
    pub fn disabled() -> Self {
        Self {
            random_ccm: false,
            random_gains: false,
            smoothstep: false,
            gamma: false,
            add_noise: false,
        }
    }
}

/// Configuration for sRGB -> RAW burst synthesis
#[derive(Debug, Clone, Default)]
pub struct SynthesisConfig {
    pub burst: BurstConfig,
    pub processing: ProcessingFlags,
}

impl SynthesisConfig {
    pub fn builder() -> SynthesisConfigBuilder {
        SynthesisConfigBuilder::default()
    }
}

/// Builder for SynthesisConfig
#[derive(Default)]
pub struct SynthesisConfigBuilder {
    burst: Option<BurstConfig>,
    processing: Option<ProcessingFlags>,
}

impl SynthesisConfigBuilder {
    pub fn burst(mut self, burst: BurstConfig) -> Self {
        self.burst = Some(burst);
        self
    }

    pub fn processing(mut self, flags: ProcessingFlags) -> Self {
        self.processing = Some(flags);
        self
    }

    pub fn build(self) -> SynthesisConfig {
        let default = SynthesisConfig::default();
        SynthesisConfig {
            burst: self.burst.unwrap_or(default.burst),
            processing: self.processing.unwrap_or(default.processing),
        }
    }
}
