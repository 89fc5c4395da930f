// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{
    ArmCpu, ArmFeatures, ModelError, add_pauth_props, add_sve_max_props, add_sve_props,
    define_cortex_a_regs,
};
use crate::Accel;
use aarch64::{
    Aa64Dfr0, Aa64Isar0, Aa64Mmfr0, Aa64Pfr0, IdDfr0, IdIsar5, IdMmfr3, IdPfr0, Midr, Mvfr1,
};
use tracing::{debug, warn};

/// Target type of Cortex-A57 for the hardware backend.
pub const HW_TARGET_CORTEX_A57: u32 = 2;

/// Target type of Cortex-A53 for the hardware backend.
pub const HW_TARGET_CORTEX_A53: u32 = 4;

/// `'Q'`, identifies the synthesized model among software implementations.
const MAX_PART_NUM: u16 = 0x51;

pub fn cortex_a57_init(cpu: &mut ArmCpu, _: &Accel) -> Result<(), ModelError> {
    cpu.dtb_compatible = "arm,cortex-a57";
    cpu.hw_target = Some(HW_TARGET_CORTEX_A57);
    cpu.midr = Midr::from_bits(0x411fd070);
    cpu.reset_fpsid = 0x41034070;
    cpu.ctr = 0x8444c004;
    cpu.isar.id_mmfr0 = 0x10101105;
    cpu.isar.id_aa64mmfr0 = Aa64Mmfr0::from_bits(0x00001124);
    cpu.ccsidr[0] = 0x701fe00a; // 32KB L1 dcache
    cpu.ccsidr[1] = 0x201fe012; // 48KB L1 icache
    cpu.ccsidr[2] = 0x70ffe07a; // 2048KB L2 cache

    init_cortex_a(cpu);

    Ok(())
}

pub fn cortex_a53_init(cpu: &mut ArmCpu, _: &Accel) -> Result<(), ModelError> {
    cpu.dtb_compatible = "arm,cortex-a53";
    cpu.hw_target = Some(HW_TARGET_CORTEX_A53);
    cpu.midr = Midr::from_bits(0x410fd034);
    cpu.reset_fpsid = 0x41034070;
    cpu.ctr = 0x84448004; // L1Ip = VIPT
    cpu.isar.id_mmfr0 = 0x10101105;
    cpu.isar.id_aa64mmfr0 = Aa64Mmfr0::from_bits(0x00001122); // 40 bit physical addr
    cpu.ccsidr[0] = 0x700fe01a; // 32KB L1 dcache
    cpu.ccsidr[1] = 0x201fe00a; // 32KB L1 icache
    cpu.ccsidr[2] = 0x707fe07a; // 1024KB L2 cache

    init_cortex_a(cpu);

    Ok(())
}

pub fn cortex_a72_init(cpu: &mut ArmCpu, _: &Accel) -> Result<(), ModelError> {
    cpu.dtb_compatible = "arm,cortex-a72";
    cpu.midr = Midr::from_bits(0x410fd083);
    cpu.reset_fpsid = 0x41034080;
    cpu.ctr = 0x8444c004;
    cpu.isar.id_mmfr0 = 0x10201105;
    cpu.isar.id_aa64mmfr0 = Aa64Mmfr0::from_bits(0x00001124);
    cpu.ccsidr[0] = 0x701fe00a; // 32KB L1 dcache
    cpu.ccsidr[1] = 0x201fe012; // 48KB L1 icache
    cpu.ccsidr[2] = 0x707fe07a; // 1MB L2 cache

    init_cortex_a(cpu);

    Ok(())
}

/// Sets the values that Cortex-A72, Cortex-A57 and Cortex-A53 have in common.
fn init_cortex_a(cpu: &mut ArmCpu) {
    cpu.features |= ArmFeatures::V8_BASE
        | ArmFeatures::CBAR_RO
        | ArmFeatures::EL2
        | ArmFeatures::EL3
        | ArmFeatures::PMU;
    cpu.revidr = 0;
    cpu.reset_sctlr = 0x00c50838;
    cpu.id_afr0 = 0;
    cpu.clidr = 0x0a200023;
    cpu.dcz_blocksize = 4; // 64 bytes
    cpu.gic_num_lrs = 4;
    cpu.gic_vpribits = 5;
    cpu.gic_vprebits = 5;

    let isar = &mut cpu.isar;

    isar.mvfr0 = 0x10110222;
    isar.mvfr1 = Mvfr1::from_bits(0x12111111);
    isar.mvfr2 = 0x00000043;
    isar.id_pfr0 = IdPfr0::from_bits(0x00000131);
    isar.id_pfr1 = 0x00011011;
    isar.id_dfr0 = IdDfr0::from_bits(0x03010066);
    isar.id_mmfr1 = 0x40000000;
    isar.id_mmfr2 = 0x01260000;
    isar.id_mmfr3 = IdMmfr3::from_bits(0x02102211);
    isar.id_isar0 = 0x02101110;
    isar.id_isar1 = 0x13112111;
    isar.id_isar2 = 0x21232042;
    isar.id_isar3 = 0x01112131;
    isar.id_isar4 = 0x00011142;
    isar.id_isar5 = IdIsar5::from_bits(0x00011121);
    isar.id_aa64pfr0 = Aa64Pfr0::from_bits(0x00002222);
    isar.id_aa64dfr0 = Aa64Dfr0::from_bits(0x10305106);
    isar.id_aa64isar0 = Aa64Isar0::from_bits(0x00011120);
    isar.dbgdidr = 0x3516d000;

    define_cortex_a_regs(cpu);
}

/// Initializer of `max`.
///
/// With the hardware backend this is the same as the host PE. With the translator this is
/// Cortex-A57 plus every feature the translator can execute.
pub fn max_init(cpu: &mut ArmCpu, accel: &Accel) -> Result<(), ModelError> {
    match accel {
        Accel::Hardware(hv) => {
            let host = hv.cpu_features().map_err(ModelError::HostQueryFailed)?;

            debug!(midr = host.midr.into_bits(), "using host CPU features");

            cpu.features |= ArmFeatures::V8_BASE;
            cpu.features.set(ArmFeatures::EL2, host.el2);
            cpu.features.set(ArmFeatures::EL3, host.el3);
            cpu.features.set(ArmFeatures::PMU, host.pmu);
            cpu.hw_target = host.target;
            cpu.dtb_compatible = host.dtb_compatible;
            cpu.midr = host.midr;
            cpu.revidr = host.revidr;
            cpu.isar = host.isar;
        }
        Accel::Translator { user_only } => {
            cortex_a57_init(cpu, accel)?;
            upgrade_to_max(cpu);

            // No real cache to follow so use a bigger DC ZVA block.
            if *user_only {
                cpu.ctr = 0x80038003; // 32 byte I and D cacheline size, VIPT icache
                cpu.dcz_blocksize = 7; // 512 bytes
            }

            add_pauth_props(cpu);
        }
        Accel::None => warn!("no backend selected, max only gets SVE properties"),
    }

    add_sve_props(cpu);
    add_sve_max_props(cpu);

    Ok(())
}

/// Raises ID register fields to the highest value the translator can execute.
fn upgrade_to_max(cpu: &mut ArmCpu) {
    assert!(cpu.features.contains(ArmFeatures::AARCH64));

    // Implementer zero is reserved for software use. Architecture 0xf tells the guest to check the
    // ID registers.
    cpu.midr = Midr::new()
        .with_implementer(0)
        .with_architecture(0xf)
        .with_part_num(MAX_PART_NUM)
        .with_variant(0)
        .with_revision(0);

    let isar = &mut cpu.isar;

    isar.id_aa64isar0 = isar
        .id_aa64isar0
        .with_aes(2) // AES + PMULL
        .with_sha1(1)
        .with_sha2(2) // SHA512
        .with_crc32(1)
        .with_atomic(2)
        .with_rdm(1)
        .with_sha3(1)
        .with_sm3(1)
        .with_sm4(1)
        .with_dp(1)
        .with_fhm(1)
        .with_ts(2) // v8.5-CondM
        .with_rndr(1);

    isar.id_aa64isar1 = isar
        .id_aa64isar1
        .with_dpb(2)
        .with_jscvt(1)
        .with_fcma(1)
        .with_sb(1)
        .with_specres(1)
        .with_frintts(1)
        .with_lrcpc(2); // ARMv8.4-RCPC

    isar.id_aa64pfr0 = isar
        .id_aa64pfr0
        .with_sve(1)
        .with_fp(1)
        .with_adv_simd(1)
        .with_sel2(1)
        .with_dit(1);

    // MTE starts at full support. A board without tag memory lowers it.
    isar.id_aa64pfr1 = isar.id_aa64pfr1.with_bt(1).with_ssbs(2).with_mte(2);
    isar.id_aa64mmfr0 = isar.id_aa64mmfr0.with_pa_range(5); // 48 bits

    isar.id_aa64mmfr1 = isar
        .id_aa64mmfr1
        .with_hpds(1)
        .with_lo(1)
        .with_vh(1)
        .with_pan(2) // ATS1E1
        .with_vmid_bits(2) // VMID16
        .with_xnx(1); // TTS2UXN

    isar.id_aa64mmfr2 = isar.id_aa64mmfr2.with_uao(1).with_cnp(1).with_st(1);

    // Same features for AArch32.
    isar.id_isar5 = isar
        .id_isar5
        .with_aes(2)
        .with_sha1(1)
        .with_sha2(1)
        .with_crc32(1)
        .with_rdm(1)
        .with_vcma(1);

    isar.id_isar6 = isar
        .id_isar6
        .with_jscvt(1)
        .with_dp(1)
        .with_fhm(1)
        .with_sb(1)
        .with_specres(1);

    isar.id_pfr0 = isar.id_pfr0.with_dit(1);
    isar.id_pfr2 = isar.id_pfr2.with_ssbs(1);
    isar.id_mmfr3 = isar.id_mmfr3.with_pan(2);

    isar.id_mmfr4 = isar
        .id_mmfr4
        .with_hpds(1) // AA32HPD
        .with_ac2(1) // ACTLR2, HACTLR2
        .with_cnp(1)
        .with_xnx(1);

    isar.id_aa64dfr0 = isar.id_aa64dfr0.with_pmu_ver(5); // v8.4-PMU
    isar.id_dfr0 = isar.id_dfr0.with_perf_mon(5);
    isar.mvfr1 = isar.mvfr1.with_fphp(3).with_simdhp(2); // v8.2-FP16

    debug!(
        id_aa64isar0 = isar.id_aa64isar0.into_bits(),
        id_aa64pfr0 = isar.id_aa64pfr0.into_bits(),
        "ID registers raised to translator limits"
    );
}
