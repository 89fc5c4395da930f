// SPDX-License-Identifier: MIT OR Apache-2.0
use super::ArmCpu;
use bitflags::bitflags;
use config::AccelKind;
use rustc_hash::FxHashMap;

/// Defines the IMPLEMENTATION DEFINED registers shared by Cortex-A72, Cortex-A57 and Cortex-A53.
pub fn define_cortex_a_regs(cpu: &mut ArmCpu) {
    // L2CTLR reports the cluster size, which a user-mode process has no use for.
    if cpu.accel() != AccelKind::UserTranslator {
        cpu.cp_regs.define(&CORTEX_A_SYSTEM_REGS);
    }

    cpu.cp_regs.define(&CORTEX_A_REGS);
}

/// Number of cores is in [25:24]. The rest reads as zero.
fn l2ctlr_read(cpu: &ArmCpu) -> u64 {
    let cores: u64 = cpu.core_count.try_into().unwrap_or(u64::MAX);

    cores.saturating_sub(1) << 24
}

static CORTEX_A_SYSTEM_REGS: [CpRegInfo; 2] = [
    CpRegInfo::aa64("L2CTLR_EL1", [3, 1, 11, 0, 2], CpValue::Read(l2ctlr_read)),
    CpRegInfo::cp15("L2CTLR", [1, 9, 0, 2], CpValue::Read(l2ctlr_read)),
];

static CORTEX_A_REGS: [CpRegInfo; 11] = [
    CpRegInfo::aa64("L2ECTLR_EL1", [3, 1, 11, 0, 3], CpValue::Const(0)),
    CpRegInfo::cp15("L2ECTLR", [1, 9, 0, 3], CpValue::Const(0)),
    CpRegInfo::both("L2ACTLR", [3, 1, 15, 0, 0], CpValue::Const(0)),
    CpRegInfo::aa64("CPUACTLR_EL1", [3, 1, 15, 2, 0], CpValue::Const(0)),
    CpRegInfo::cp15_64("CPUACTLR", 0, 15),
    CpRegInfo::aa64("CPUECTLR_EL1", [3, 1, 15, 2, 1], CpValue::Const(0)),
    CpRegInfo::cp15_64("CPUECTLR", 1, 15),
    CpRegInfo::aa64("CPUMERRSR_EL1", [3, 1, 15, 2, 2], CpValue::Const(0)),
    CpRegInfo::cp15_64("CPUMERRSR", 2, 15),
    CpRegInfo::aa64("L2MERRSR_EL1", [3, 1, 15, 2, 3], CpValue::Const(0)),
    CpRegInfo::cp15_64("L2MERRSR", 3, 15),
];

/// Definition of a system register or an AArch32 coprocessor register.
pub struct CpRegInfo {
    pub name: &'static str,
    pub state: CpState,
    pub cp: u8,
    pub opc0: u8,
    pub opc1: u8,
    pub crn: u8,
    pub crm: u8,
    pub opc2: u8,
    pub access: CpAccess,
    /// Accessed with `MCRR`/`MRRC` in AArch32 state.
    pub wide: bool,
    pub value: CpValue,
}

impl CpRegInfo {
    const fn aa64(name: &'static str, enc: [u8; 5], value: CpValue) -> Self {
        Self {
            name,
            state: CpState::Aa64,
            cp: 0,
            opc0: enc[0],
            opc1: enc[1],
            crn: enc[2],
            crm: enc[3],
            opc2: enc[4],
            access: CpAccess::PL1_RW,
            wide: false,
            value,
        }
    }

    const fn both(name: &'static str, enc: [u8; 5], value: CpValue) -> Self {
        Self {
            state: CpState::Both,
            cp: 15,
            ..Self::aa64(name, enc, value)
        }
    }

    const fn cp15(name: &'static str, enc: [u8; 4], value: CpValue) -> Self {
        Self {
            name,
            state: CpState::Aa32,
            cp: 15,
            opc0: 0,
            opc1: enc[0],
            crn: enc[1],
            crm: enc[2],
            opc2: enc[3],
            access: CpAccess::PL1_RW,
            wide: false,
            value,
        }
    }

    const fn cp15_64(name: &'static str, opc1: u8, crm: u8) -> Self {
        Self {
            wide: true,
            ..Self::cp15(name, [opc1, 0, crm, 0], CpValue::Const(0))
        }
    }

    fn keys(&self) -> impl Iterator<Item = CpKey> {
        let aa64 = CpKey::Aa64 {
            op0: self.opc0,
            op1: self.opc1,
            crn: self.crn,
            crm: self.crm,
            op2: self.opc2,
        };
        let aa32 = CpKey::Aa32 {
            cp: self.cp,
            opc1: self.opc1,
            crn: self.crn,
            crm: self.crm,
            opc2: self.opc2,
            wide: self.wide,
        };

        let (aa64, aa32) = match self.state {
            CpState::Aa64 => (Some(aa64), None),
            CpState::Aa32 => (None, Some(aa32)),
            CpState::Both => (Some(aa64), Some(aa32)),
        };

        aa64.into_iter().chain(aa32)
    }
}

/// Execution state a register is accessible from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpState {
    Aa32,
    Aa64,
    Both,
}

/// How a register produces its value.
#[derive(Clone, Copy)]
pub enum CpValue {
    Const(u64),
    Read(fn(&ArmCpu) -> u64),
}

bitflags! {
    /// Access permissions of a register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpAccess: u8 {
        const PL0_R = 1 << 0;
        const PL0_W = 1 << 1;
        const PL1_R = 1 << 2;
        const PL1_W = 1 << 3;
        const PL2_R = 1 << 4;
        const PL2_W = 1 << 5;
        const PL3_R = 1 << 6;
        const PL3_W = 1 << 7;
        const PL1_RW = Self::PL1_R.bits()
            | Self::PL1_W.bits()
            | Self::PL2_R.bits()
            | Self::PL2_W.bits()
            | Self::PL3_R.bits()
            | Self::PL3_W.bits();
    }
}

/// Encoding used to look up a register.
///
/// `crn` and `opc2` are zero for wide AArch32 registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpKey {
    Aa64 {
        op0: u8,
        op1: u8,
        crn: u8,
        crm: u8,
        op2: u8,
    },
    Aa32 {
        cp: u8,
        opc1: u8,
        crn: u8,
        crm: u8,
        opc2: u8,
        wide: bool,
    },
}

/// Registers defined on a CPU.
#[derive(Default)]
pub struct CpRegs(FxHashMap<CpKey, &'static CpRegInfo>);

impl CpRegs {
    /// A later definition with the same encoding replaces the earlier one.
    pub fn define(&mut self, regs: &'static [CpRegInfo]) {
        for reg in regs {
            for key in reg.keys() {
                self.0.insert(key, reg);
            }
        }
    }

    pub fn get(&self, key: &CpKey) -> Option<&'static CpRegInfo> {
        self.0.get(key).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&'static CpRegInfo> {
        self.0.values().copied().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ArmCpu {
    /// Returns [`None`] if no register has this encoding.
    pub fn read_cpreg(&self, key: &CpKey) -> Option<u64> {
        let reg = self.cp_regs.get(key)?;

        Some(match reg.value {
            CpValue::Const(v) => v,
            CpValue::Read(f) => f(self),
        })
    }

    /// Writes to the registers defined here are ignored. Returns `false` if no register has this
    /// encoding.
    pub fn write_cpreg(&mut self, key: &CpKey, _: u64) -> bool {
        self.cp_regs.get(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Accel;

    fn a57(accel: Accel, cores: usize) -> ArmCpu {
        let mut cpu = ArmCpu::new("cortex-a57", accel.kind());

        cpu.core_count = cores;
        define_cortex_a_regs(&mut cpu);
        cpu
    }

    #[test]
    fn l2ctlr_reports_cluster_size() {
        let cpu = a57(Accel::Translator { user_only: false }, 4);
        let el1 = CpKey::Aa64 {
            op0: 3,
            op1: 1,
            crn: 11,
            crm: 0,
            op2: 2,
        };
        let aa32 = CpKey::Aa32 {
            cp: 15,
            opc1: 1,
            crn: 9,
            crm: 0,
            opc2: 2,
            wide: false,
        };

        assert_eq!(cpu.read_cpreg(&el1), Some(3 << 24));
        assert_eq!(cpu.read_cpreg(&aa32), Some(3 << 24));
    }

    #[test]
    fn l2ctlr_absent_in_user_mode() {
        let cpu = a57(Accel::Translator { user_only: true }, 1);

        assert!(cpu.cp_regs.by_name("L2CTLR_EL1").is_none());
        assert!(cpu.cp_regs.by_name("L2ECTLR_EL1").is_some());
    }

    #[test]
    fn both_state_defines_two_views() {
        let mut cpu = a57(Accel::None, 1);
        let aa32 = CpKey::Aa32 {
            cp: 15,
            opc1: 1,
            crn: 15,
            crm: 0,
            opc2: 0,
            wide: false,
        };

        assert_eq!(cpu.cp_regs.get(&aa32).map(|r| r.name), Some("L2ACTLR"));
        assert!(cpu.write_cpreg(&aa32, 0xdead));
        assert_eq!(cpu.read_cpreg(&aa32), Some(0));

        // 2 system-only, 11 entries with L2ACTLR in both states.
        assert_eq!(cpu.cp_regs.len(), 14);
    }

    #[test]
    fn wide_registers() {
        let cpu = a57(Accel::None, 1);
        let key = CpKey::Aa32 {
            cp: 15,
            opc1: 2,
            crn: 0,
            crm: 15,
            opc2: 0,
            wide: true,
        };

        assert_eq!(cpu.cp_regs.get(&key).map(|r| r.name), Some("CPUMERRSR"));
        assert_eq!(cpu.read_cpreg(&key), Some(0));
    }
}
