// SPDX-License-Identifier: MIT OR Apache-2.0
use super::models::{cortex_a53_init, cortex_a57_init, cortex_a72_init, max_init};
use super::{ArmCpu, CpuClass, ModelError, aarch64_class_init};
use crate::Accel;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Returns the catalog of built-in models.
pub fn registry() -> &'static ModelRegistry {
    static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

    REGISTRY.get_or_init(ModelRegistry::with_builtin)
}

/// Initializer of a CPU model.
pub type InitFn = fn(&mut ArmCpu, &Accel) -> Result<(), ModelError>;

/// Entry in [`ModelRegistry`].
#[derive(Clone, Copy)]
pub struct ModelInfo {
    pub name: &'static str,
    pub init: InitFn,
    /// Runs after the class setup shared by all AArch64 models.
    pub class_init: Option<fn(&mut CpuClass)>,
}

impl ModelInfo {
    pub const fn new(name: &'static str, init: InitFn) -> Self {
        Self {
            name,
            init,
            class_init: None,
        }
    }
}

static BUILTIN: [ModelInfo; 4] = [
    ModelInfo::new("cortex-a57", cortex_a57_init),
    ModelInfo::new("cortex-a53", cortex_a53_init),
    ModelInfo::new("cortex-a72", cortex_a72_init),
    ModelInfo::new("max", max_init),
];

/// Catalog of CPU models keyed by name.
#[derive(Default)]
pub struct ModelRegistry(FxHashMap<&'static str, ModelInfo>);

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut r = Self::new();

        for info in BUILTIN {
            r.insert(info);
        }

        r
    }

    pub fn register(&mut self, info: ModelInfo) -> Result<(), ModelError> {
        if self.0.contains_key(info.name) {
            return Err(ModelError::DuplicateModel(info.name));
        }

        self.insert(info);

        Ok(())
    }

    fn insert(&mut self, info: ModelInfo) {
        info!(name = info.name, "CPU model registered");

        self.0.insert(info.name, info);
    }

    pub fn get(&self, name: &str) -> Option<&ModelInfo> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Creates a CPU from the model `name` without realizing it.
    pub fn instantiate(&self, name: &str, accel: &Accel) -> Result<ArmCpu, ModelError> {
        let info = self
            .0
            .get(name)
            .ok_or_else(|| ModelError::UnknownModel(name.into()))?;
        let mut cpu = ArmCpu::new(info.name, accel.kind());

        if let Accel::Hardware(hv) = accel {
            cpu.host_aarch32_el1 = hv.aarch32_el1_supported();
        }

        aarch64_class_init(&mut cpu.class);

        if let Some(f) = info.class_init {
            f(&mut cpu.class);
        }

        (info.init)(&mut cpu, accel)?;
        cpu.post_init();

        debug!(
            name = info.name,
            accel = ?accel.kind(),
            features = ?cpu.features,
            "CPU model instantiated"
        );

        Ok(cpu)
    }
}
