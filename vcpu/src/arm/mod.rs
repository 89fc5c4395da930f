// SPDX-License-Identifier: MIT OR Apache-2.0
//! Catalog of AArch64 CPU models.
//!
//! A model is a named initializer that fills the identification registers and the feature set of
//! a fresh [`ArmCpu`]. Use [`registry()`] to instantiate a model by name or [`create_cpu()`] to
//! build a realized CPU from a [`CpuConfig`].
pub use self::cpregs::*;
pub use self::dump::*;
pub use self::feature::*;
pub use self::gdb::*;
pub use self::props::*;
pub use self::registry::*;

use crate::Accel;
use aarch64::{Cpacr, IdRegisters, Midr, Pstate, Scr};
use config::{AccelKind, CpuConfig};
use hv::{HostError, Hypervisor};
use thiserror::Error;
use tracing::info;

mod cpregs;
mod dump;
mod feature;
mod gdb;
mod models;
mod props;
mod registry;

/// Creates a realized CPU from `config`.
///
/// `hv` is required when `config` selects the hardware backend.
pub fn create_cpu(config: &CpuConfig, hv: Option<&dyn Hypervisor>) -> Result<ArmCpu, ModelError> {
    let accel = match config.accel {
        AccelKind::Hardware => Accel::Hardware(hv.ok_or(ModelError::NoHypervisor)?),
        AccelKind::Translator => Accel::Translator { user_only: false },
        AccelKind::UserTranslator => Accel::Translator { user_only: true },
        AccelKind::None => Accel::None,
    };

    let mut cpu = registry().instantiate(&config.model, &accel)?;

    cpu.core_count = config.cores.get();

    for (name, &value) in &config.props {
        cpu.set_property(name, value)
            .map_err(|e| ModelError::SetPropertyFailed(name.clone(), e))?;
    }

    cpu.realize().map_err(ModelError::RealizeFailed)?;

    info!(
        model = cpu.model,
        accel = ?cpu.accel,
        cores = cpu.core_count,
        "CPU realized"
    );

    Ok(cpu)
}

/// Architectural state of an AArch64 PE.
pub struct ArmCpu {
    /// Name of the model this CPU was created from.
    pub model: &'static str,
    pub class: CpuClass,
    accel: AccelKind,
    /// Host can run EL1 in AArch32 state. Only meaningful with the hardware backend.
    pub host_aarch32_el1: bool,
    pub features: ArmFeatures,
    pub dtb_compatible: &'static str,
    /// Target type for the hardware backend.
    pub hw_target: Option<u32>,
    pub midr: Midr,
    pub revidr: u64,
    pub reset_fpsid: u32,
    pub ctr: u64,
    pub reset_sctlr: u32,
    pub id_afr0: u32,
    pub clidr: u64,
    pub ccsidr: [u64; 16],
    /// Log2 of the `DC ZVA` block size in words.
    pub dcz_blocksize: u8,
    pub gic_num_lrs: u8,
    pub gic_vpribits: u8,
    pub gic_vprebits: u8,
    pub isar: IdRegisters,
    /// Number of cores in the cluster this PE belongs to.
    pub core_count: usize,
    pub cp_regs: CpRegs,
    pub props: Properties,
    pub sve: SveState,
    /// X0-X30 followed by the current SP.
    pub xregs: [u64; 32],
    pub pc: u64,
    pub pstate: Pstate,
    pub scr_el3: Scr,
    pub cpacr_el1: Cpacr,
    pub zcr_el1: u64,
    pub fpcr: u32,
    pub fpsr: u32,
    /// Z0-Z31 as 64-bit lanes, least significant first. Q registers alias the low 128 bits.
    pub zregs: [[u64; 32]; 32],
    /// P0-P15 followed by FFR.
    pub pregs: [[u64; 4]; 17],
}

impl ArmCpu {
    /// Index of FFR in [`ArmCpu::pregs`].
    pub const FFR: usize = 16;

    /// Creates a blank CPU. No model has been applied yet.
    pub fn new(model: &'static str, accel: AccelKind) -> Self {
        // A user-mode process starts in EL0 and a system starts in EL1h with all exceptions masked.
        let pstate = match accel {
            AccelKind::UserTranslator => Pstate::new(),
            _ => Pstate::new()
                .with_m(0b0101)
                .with_f(true)
                .with_i(true)
                .with_a(true)
                .with_d(true),
        };

        Self {
            model,
            class: CpuClass::default(),
            accel,
            host_aarch32_el1: false,
            features: ArmFeatures::empty(),
            dtb_compatible: "",
            hw_target: None,
            midr: Midr::new(),
            revidr: 0,
            reset_fpsid: 0,
            ctr: 0,
            reset_sctlr: 0,
            id_afr0: 0,
            clidr: 0,
            ccsidr: [0; 16],
            dcz_blocksize: 0,
            gic_num_lrs: 0,
            gic_vpribits: 0,
            gic_vprebits: 0,
            isar: IdRegisters::default(),
            core_count: 1,
            cp_regs: CpRegs::default(),
            props: Properties::default(),
            sve: SveState::default(),
            xregs: [0; 32],
            pc: 0,
            pstate,
            scr_el3: Scr::new(),
            cpacr_el1: Cpacr::new(),
            zcr_el1: 0,
            fpcr: 0,
            fpsr: 0,
            zregs: [[0; 32]; 32],
            pregs: [[0; 4]; 17],
        }
    }

    pub fn accel(&self) -> AccelKind {
        self.accel
    }

    pub fn current_el(&self) -> u8 {
        self.pstate.el()
    }

    /// Returns `true` if FP/SIMD instructions at `el` trap because of `CPACR_EL1.FPEN`.
    pub fn fp_trapped(&self, el: u8) -> bool {
        Self::cpacr_traps(self.cpacr_el1.fpen(), el)
    }

    /// Returns `true` if SVE instructions at `el` trap because of `CPACR_EL1.{ZEN,FPEN}`.
    pub fn sve_trapped(&self, el: u8) -> bool {
        Self::cpacr_traps(self.cpacr_el1.zen(), el) || self.fp_trapped(el)
    }

    fn cpacr_traps(field: u8, el: u8) -> bool {
        match field {
            1 => el == 0,
            3 => false,
            _ => el <= 1,
        }
    }

    /// Runs the steps shared by every model after its initializer.
    fn post_init(&mut self) {
        add_feature_props(self);
    }
}

/// Settings shared by all CPUs of the same model.
#[derive(Debug, Default, Clone)]
pub struct CpuClass {
    pub gdb_num_core_regs: usize,
    pub gdb_core_xml_file: &'static str,
    pub gdb_arch_name: &'static str,
    /// Name and description of class-level properties.
    pub props: Vec<(&'static str, &'static str)>,
}

/// Setup of the class every AArch64 model belongs to.
pub fn aarch64_class_init(class: &mut CpuClass) {
    class.gdb_num_core_regs = 34;
    class.gdb_core_xml_file = "aarch64-core.xml";
    class.gdb_arch_name = "aarch64";
    class.props.push((
        "aarch64",
        "Set on/off to enable/disable aarch64 execution state ",
    ));
}

/// Represents an error when a CPU model cannot be registered or created.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("CPU model '{0}' already registered")]
    DuplicateModel(&'static str),

    #[error("unknown CPU model '{0}'")]
    UnknownModel(String),

    #[error("couldn't query host CPU features")]
    HostQueryFailed(#[source] HostError),

    #[error("hardware backend was selected without a hypervisor")]
    NoHypervisor,

    #[error("couldn't set property '{0}'")]
    SetPropertyFailed(String, #[source] PropError),

    #[error("couldn't realize CPU")]
    RealizeFailed(#[source] PropError),
}
