// SPDX-License-Identifier: MIT OR Apache-2.0
#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::num::NonZero;

/// Backend that executes guest instructions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AccelKind {
    /// Hardware virtualization (e.g. KVM).
    Hardware,
    /// Binary translation of a whole system.
    #[default]
    Translator,
    /// Binary translation of a single user-mode process.
    UserTranslator,
    /// No backend has been selected yet.
    None,
}

/// Value of a CPU property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropValue {
    Bool(bool),
    U32(u32),
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

/// Configurations to create a vCPU.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CpuConfig {
    /// Name of the CPU model (e.g. `cortex-a57`).
    pub model: String,
    pub accel: AccelKind,
    /// Number of cores in the cluster. Reported by `L2CTLR`.
    pub cores: NonZero<usize>,
    /// Properties to set before the CPU is realized.
    pub props: BTreeMap<String, PropValue>,
}

impl CpuConfig {
    pub fn new(model: impl Into<String>, accel: AccelKind) -> Self {
        Self {
            model: model.into(),
            accel,
            ..Self::default()
        }
    }

    pub fn with_prop(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            model: "max".to_string(),
            accel: AccelKind::default(),
            cores: NonZero::<usize>::MIN,
            props: BTreeMap::new(),
        }
    }
}
