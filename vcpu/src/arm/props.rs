// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{ArmCpu, ArmFeatures};
use config::{AccelKind, PropValue};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Maximum number of 128-bit quadwords in an SVE vector.
pub const SVE_MAX_VQ: u32 = 16;

static SVE_VQ_PROPS: [&str; SVE_MAX_VQ as usize] = [
    "sve128", "sve256", "sve384", "sve512", "sve640", "sve768", "sve896", "sve1024", "sve1152",
    "sve1280", "sve1408", "sve1536", "sve1664", "sve1792", "sve1920", "sve2048",
];

/// Registers `pauth` and `pauth-impdef`.
pub fn add_pauth_props(cpu: &mut ArmCpu) {
    cpu.props.add(
        "pauth",
        PropValue::Bool(true),
        "Enable pointer authentication",
    );
    cpu.props.add(
        "pauth-impdef",
        PropValue::Bool(false),
        "Use the IMPLEMENTATION DEFINED algorithm instead of QARMA",
    );
}

/// Registers `sve` and one `sve<N>` property for each vector length.
pub fn add_sve_props(cpu: &mut ArmCpu) {
    cpu.props.add("sve", PropValue::Bool(true), "Enable SVE");

    for name in SVE_VQ_PROPS {
        cpu.props.add(
            name,
            PropValue::Bool(false),
            "Enable or disable a single SVE vector length",
        );
    }

    if cpu.accel() == AccelKind::UserTranslator {
        cpu.sve.default_vq = 4;
        cpu.props.add(
            "sve-default-vector-length",
            PropValue::U32(64),
            "Default SVE vector length in bytes for a new process",
        );
    }
}

/// Registers `sve-max-vq`.
pub fn add_sve_max_props(cpu: &mut ArmCpu) {
    cpu.props.add(
        "sve-max-vq",
        PropValue::U32(0),
        "Maximum SVE vector length in quadwords",
    );
}

/// Registers properties for optional features that are already present.
pub fn add_feature_props(cpu: &mut ArmCpu) {
    if cpu.features.contains(ArmFeatures::EL3) {
        cpu.props.add(
            "has_el3",
            PropValue::Bool(true),
            "Set on/off to enable/disable ARM Security Extensions (TrustZone)",
        );
    }

    if cpu.features.contains(ArmFeatures::EL2) {
        cpu.props.add(
            "has_el2",
            PropValue::Bool(true),
            "Set on/off to enable/disable ARM Virtualization Extensions",
        );
    }

    if cpu.features.contains(ArmFeatures::PMU) {
        cpu.props.add(
            "pmu",
            PropValue::Bool(true),
            "Set on/off to enable/disable the PMU",
        );
    }
}

fn sve_vq(name: &str) -> Option<u32> {
    SVE_VQ_PROPS
        .iter()
        .position(|&n| n == name)
        .map(|i| i as u32 + 1)
}

fn vq_bit(vq: u32) -> u16 {
    1 << (vq - 1)
}

/// Bits for vector lengths `1..=vq`.
fn vq_mask(vq: u32) -> u16 {
    if vq >= SVE_MAX_VQ {
        u16::MAX
    } else {
        (1 << vq) - 1
    }
}

/// Returns the largest vector length in `map` or zero if empty.
fn last_vq(map: u16) -> u32 {
    u16::BITS - map.leading_zeros()
}

fn pow2floor(v: u32) -> u32 {
    1 << (u32::BITS - 1 - v.leading_zeros())
}

/// Properties of a CPU instance.
#[derive(Default)]
pub struct Properties(FxHashMap<&'static str, Property>);

impl Properties {
    pub fn add(&mut self, name: &'static str, value: PropValue, description: &'static str) {
        self.0.insert(name, Property { value, description });
    }

    pub fn get(&self, name: &str) -> Option<PropValue> {
        self.0.get(name).map(|p| p.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn description(&self, name: &str) -> Option<&'static str> {
        self.0.get(name).map(|p| p.description)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropValue::Bool(v) => Some(v),
            PropValue::U32(_) => None,
        }
    }

    fn store(&mut self, name: &str, value: PropValue) -> Result<(), PropError> {
        let prop = self
            .0
            .get_mut(name)
            .ok_or_else(|| PropError::UnknownProperty(name.into()))?;

        if std::mem::discriminant(&prop.value) != std::mem::discriminant(&value) {
            return Err(PropError::TypeMismatch(name.into()));
        }

        prop.value = value;

        Ok(())
    }
}

struct Property {
    value: PropValue,
    description: &'static str,
}

/// SVE vector lengths of a CPU.
#[derive(Debug, Default, Clone, Copy)]
pub struct SveState {
    /// Bit `n` means a vector length of `n + 1` quadwords is enabled.
    pub vq_map: u16,
    /// Bit `n` means `sve<(n + 1) * 128>` was set explicitly.
    pub vq_init: u16,
    /// Value of `sve-max-vq` before the CPU is realized and the largest supported length after.
    pub max_vq: u32,
    /// Initial `ZCR_EL1.LEN + 1` of a user-mode process.
    pub default_vq: u32,
}

impl ArmCpu {
    pub fn property(&self, name: &str) -> Option<PropValue> {
        let sve = self.isar.id_aa64pfr0.sve() != 0;

        if name == "aarch64" && self.class.props.iter().any(|(n, _)| *n == name) {
            return Some(PropValue::Bool(self.features.contains(ArmFeatures::AARCH64)));
        }

        if !self.props.contains(name) {
            return None;
        }

        let v = if name == "sve" {
            PropValue::Bool(sve)
        } else if let Some(vq) = sve_vq(name) {
            PropValue::Bool(sve && self.sve.vq_map & vq_bit(vq) != 0)
        } else if name == "sve-max-vq" {
            PropValue::U32(if sve { self.sve.max_vq } else { 0 })
        } else {
            return self.props.get(name);
        };

        Some(v)
    }

    pub fn set_property(&mut self, name: &str, value: PropValue) -> Result<(), PropError> {
        if name == "aarch64" && self.class.props.iter().any(|(n, _)| *n == name) {
            return match value {
                PropValue::Bool(v) => self.set_aarch64(v),
                PropValue::U32(_) => Err(PropError::TypeMismatch(name.into())),
            };
        }

        match (name, value) {
            ("sve-max-vq", PropValue::U32(v)) if v == 0 || v > SVE_MAX_VQ => {
                return Err(PropError::InvalidSveMaxVq(v));
            }
            ("sve-default-vector-length", PropValue::U32(v))
                if v % 16 != 0 || !(16..=512 * 16).contains(&v) =>
            {
                return Err(PropError::InvalidDefaultVectorLength(v));
            }
            _ => {}
        }

        self.props.store(name, value)?;

        match (name, value) {
            ("sve", PropValue::Bool(v)) => {
                self.isar.id_aa64pfr0 = self.isar.id_aa64pfr0.with_sve(v.into());
            }
            ("sve-max-vq", PropValue::U32(v)) => self.sve.max_vq = v,
            ("sve-default-vector-length", PropValue::U32(v)) => self.sve.default_vq = v / 16,
            (n, PropValue::Bool(v)) => {
                if let Some(vq) = sve_vq(n) {
                    if v {
                        self.sve.vq_map |= vq_bit(vq);
                    } else {
                        self.sve.vq_map &= !vq_bit(vq);
                    }

                    self.sve.vq_init |= vq_bit(vq);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn set_aarch64(&mut self, value: bool) -> Result<(), PropError> {
        // AArch32 at EL1 is only available when the host runs it natively.
        if value {
            self.features.insert(ArmFeatures::AARCH64);
        } else if self.accel() == AccelKind::Hardware && self.host_aarch32_el1 {
            self.features.remove(ArmFeatures::AARCH64);
        } else {
            return Err(PropError::Aarch64Required);
        }

        Ok(())
    }

    /// Applies property values to the ID registers and features.
    pub fn realize(&mut self) -> Result<(), PropError> {
        if self.props.contains("sve") {
            self.finalize_sve()?;
        }

        if self.props.contains("pauth") {
            self.finalize_pauth()?;
        }

        if self.props.bool("has_el3") == Some(false) {
            self.features.remove(ArmFeatures::EL3);
            self.isar.id_pfr1 &= !0xf0;
            self.isar.id_aa64pfr0 = self.isar.id_aa64pfr0.with_el3(0);
        }

        if self.props.bool("has_el2") == Some(false) {
            self.features.remove(ArmFeatures::EL2);
            self.isar.id_pfr1 &= !0xf000;
            self.isar.id_aa64pfr0 = self.isar.id_aa64pfr0.with_el2(0);
        }

        if self.props.bool("pmu") == Some(false) {
            self.features.remove(ArmFeatures::PMU);
        }

        if !self.features.contains(ArmFeatures::PMU) {
            self.isar.id_aa64dfr0 = self.isar.id_aa64dfr0.with_pmu_ver(0);
            self.isar.id_dfr0 = self.isar.id_dfr0.with_perf_mon(0);
        }

        if self.accel() == AccelKind::UserTranslator {
            let sve = self.isar.id_aa64pfr0.sve() != 0;

            self.cpacr_el1 = self.cpacr_el1.with_fpen(3);

            if sve {
                self.cpacr_el1 = self.cpacr_el1.with_zen(3);
                self.zcr_el1 = u64::from(self.sve.default_vq.clamp(1, SVE_MAX_VQ)) - 1;
            }
        }

        Ok(())
    }

    fn finalize_pauth(&mut self) -> Result<(), PropError> {
        let pauth = self.props.bool("pauth").unwrap_or(false);
        let impdef = self.props.bool("pauth-impdef").unwrap_or(false);
        let (arch, imp) = match (pauth, impdef) {
            (true, false) => (1, 0),
            (true, true) => (0, 1),
            (false, false) => (0, 0),
            (false, true) => return Err(PropError::ImpdefWithoutPauth),
        };

        self.isar.id_aa64isar1 = self
            .isar
            .id_aa64isar1
            .with_apa(arch)
            .with_gpa(arch)
            .with_api(imp)
            .with_gpi(imp);

        Ok(())
    }

    fn finalize_sve(&mut self) -> Result<(), PropError> {
        let sve = self.isar.id_aa64pfr0.sve() != 0;
        let s = &mut self.sve;
        let mut max_vq = 0;

        if s.vq_map != 0 {
            // Explicitly enabled lengths implicitly disable everything else.
            max_vq = last_vq(s.vq_map);

            if s.max_vq != 0 && max_vq > s.max_vq {
                return Err(PropError::SveAboveMax(max_vq, s.max_vq));
            }

            let mut vq = pow2floor(max_vq);

            while vq >= 1 {
                if s.vq_init & vq_bit(vq) == 0 {
                    s.vq_map |= vq_bit(vq);
                }

                vq >>= 1;
            }
        } else if s.max_vq == 0 {
            if !sve {
                return Ok(());
            }

            // Disabling a power of two disables all larger lengths.
            if s.vq_init & 1 != 0 {
                return Err(PropError::Sve128Disabled);
            }

            let mut vq = 2;

            while vq <= SVE_MAX_VQ && s.vq_init & vq_bit(vq) == 0 {
                vq <<= 1;
            }

            max_vq = if vq <= SVE_MAX_VQ { vq - 1 } else { SVE_MAX_VQ };
            s.vq_map = !s.vq_init & vq_mask(max_vq);
            max_vq = last_vq(s.vq_map);
        }

        if s.max_vq != 0 {
            max_vq = s.max_vq;

            if s.vq_map & vq_bit(max_vq) == 0 && s.vq_init & vq_bit(max_vq) != 0 {
                return Err(PropError::MaxLengthDisabled(max_vq));
            }

            s.vq_map |= !s.vq_init & vq_mask(max_vq);
        }

        assert_ne!(max_vq, 0);

        s.vq_map &= vq_mask(max_vq);

        let mut vq = pow2floor(max_vq);

        while vq >= 1 {
            if s.vq_map & vq_bit(vq) == 0 {
                return Err(PropError::Pow2Required(vq, max_vq));
            }

            vq >>= 1;
        }

        if !sve {
            return Err(PropError::SveDisabled(max_vq));
        }

        s.max_vq = max_vq;

        debug!(max_vq, vq_map = s.vq_map, "SVE vector lengths finalized");

        Ok(())
    }

    /// Returns the effective `ZCR_ELx.LEN` for `el`.
    pub fn sve_zcr_len(&self, el: u8) -> u32 {
        let mut len = self.sve.max_vq.saturating_sub(1);

        if el <= 1 {
            len = len.min((self.zcr_el1 & 0xf) as u32);
        }

        // Round down to a supported length.
        let map = self.sve.vq_map & vq_mask(len + 1);

        last_vq(map).saturating_sub(1)
    }
}

/// Represents an error when a property cannot be set or applied.
#[derive(Debug, Error)]
pub enum PropError {
    #[error("property '{0}' not found")]
    UnknownProperty(String),

    #[error("property '{0}' has a different type")]
    TypeMismatch(String),

    #[error(
        "'aarch64' feature cannot be disabled unless hardware virtualization is enabled and 32-bit EL1 is supported"
    )]
    Aarch64Required,

    #[error("unsupported SVE vector length {0}, valid sve-max-vq in range [1-16]")]
    InvalidSveMaxVq(u32),

    #[error("cannot set sve-default-vector-length to {0}")]
    InvalidDefaultVectorLength(u32),

    #[error(
        "cannot enable sve{}, it is larger than the maximum vector length sve-max-vq={}",
        .0 * 128,
        .1
    )]
    SveAboveMax(u32, u32),

    #[error("cannot disable sve128, at least one vector length must be enabled")]
    Sve128Disabled,

    #[error("cannot disable sve{}, the maximum vector length must be enabled", .0 * 128)]
    MaxLengthDisabled(u32),

    #[error(
        "cannot disable sve{}, it is a power-of-two length smaller than the maximum sve{}",
        .0 * 128,
        .1 * 128
    )]
    Pow2Required(u32, u32),

    #[error("cannot enable sve{}, SVE must be enabled to enable vector lengths", .0 * 128)]
    SveDisabled(u32),

    #[error("cannot enable pauth-impdef without pauth")]
    ImpdefWithoutPauth,
}
