// SPDX-License-Identifier: MIT OR Apache-2.0
use aarch64::{Aa64Dfr0, Aa64Pfr0, IdRegisters, Midr};
use config::{AccelKind, CpuConfig, PropValue};
use hv::{CpuFeats, HostError, Hypervisor};
use std::num::NonZero;
use vcpu::arm::{ArmCpu, ArmFeatures, CpKey, ModelError, PropError, create_cpu, registry};

struct Host {
    feats: Option<CpuFeats>,
    aarch32_el1: bool,
}

impl Hypervisor for Host {
    fn cpu_features(&self) -> Result<CpuFeats, HostError> {
        self.feats.clone().ok_or(HostError::NoAarch64)
    }

    fn aarch32_el1_supported(&self) -> bool {
        self.aarch32_el1
    }
}

fn host_feats() -> CpuFeats {
    let mut isar = IdRegisters {
        id_isar0: 0x02101110,
        mvfr0: 0x10110222,
        id_aa64pfr0: Aa64Pfr0::from_bits(0x01001111),
        id_aa64dfr0: Aa64Dfr0::from_bits(0x10305408),
        ..Default::default()
    };

    isar.id_aa64mmfr0 = isar.id_aa64mmfr0.with_pa_range(2);

    CpuFeats {
        target: Some(5),
        dtb_compatible: "arm,arm-v8",
        midr: Midr::from_bits(0x413fd0c1),
        revidr: 0x100,
        isar,
        el2: true,
        el3: false,
        pmu: true,
    }
}

fn translator(model: &str) -> ArmCpu {
    match create_cpu(&CpuConfig::new(model, AccelKind::Translator), None) {
        Ok(v) => v,
        Err(e) => panic!("couldn't create {model}: {e}"),
    }
}

fn config_error(config: &CpuConfig, hv: Option<&dyn Hypervisor>) -> ModelError {
    match create_cpu(config, hv) {
        Ok(_) => panic!("{} should fail", config.model),
        Err(e) => e,
    }
}

/// ID registers of the Cortex-A cores, which differ only in `ID_MMFR0` and `ID_AA64MMFR0_EL1`.
fn cortex_a_isar(id_mmfr0: u64, id_aa64mmfr0: u64) -> [(&'static str, u64); 28] {
    [
        ("ID_ISAR0", 0x02101110),
        ("ID_ISAR1", 0x13112111),
        ("ID_ISAR2", 0x21232042),
        ("ID_ISAR3", 0x01112131),
        ("ID_ISAR4", 0x00011142),
        ("ID_ISAR5", 0x00011121),
        ("ID_ISAR6", 0),
        ("ID_MMFR0", id_mmfr0),
        ("ID_MMFR1", 0x40000000),
        ("ID_MMFR2", 0x01260000),
        ("ID_MMFR3", 0x02102211),
        ("ID_MMFR4", 0),
        ("ID_PFR0", 0x00000131),
        ("ID_PFR1", 0x00011011),
        ("ID_PFR2", 0),
        ("ID_DFR0", 0x03010066),
        ("MVFR0", 0x10110222),
        ("MVFR1", 0x12111111),
        ("MVFR2", 0x00000043),
        ("ID_AA64ISAR0_EL1", 0x00011120),
        ("ID_AA64ISAR1_EL1", 0),
        ("ID_AA64PFR0_EL1", 0x00002222),
        ("ID_AA64PFR1_EL1", 0),
        ("ID_AA64MMFR0_EL1", id_aa64mmfr0),
        ("ID_AA64MMFR1_EL1", 0),
        ("ID_AA64MMFR2_EL1", 0),
        ("ID_AA64DFR0_EL1", 0x10305106),
        ("DBGDIDR", 0x3516d000),
    ]
}

fn assert_cortex_a_common(cpu: &ArmCpu) {
    assert_eq!(cpu.revidr, 0);
    assert_eq!(cpu.reset_sctlr, 0x00c50838);
    assert_eq!(cpu.id_afr0, 0);
    assert_eq!(cpu.clidr, 0x0a200023);
    assert_eq!(cpu.ccsidr[3..], [0; 13]);
    assert_eq!(cpu.dcz_blocksize, 4);
    assert_eq!(
        (cpu.gic_num_lrs, cpu.gic_vpribits, cpu.gic_vprebits),
        (4, 5, 5)
    );
}

#[test]
fn cortex_a53_snapshot() {
    let cpu = translator("cortex-a53");

    assert_eq!(cpu.isar.entries(), cortex_a_isar(0x10101105, 0x00001122));
    assert_eq!(cpu.midr.into_bits(), 0x410fd034);
    assert_eq!(cpu.reset_fpsid, 0x41034070);
    assert_eq!(cpu.ctr, 0x84448004);
    assert_eq!(cpu.ccsidr[..3], [0x700fe01a, 0x201fe00a, 0x707fe07a]);
    assert_eq!(cpu.dtb_compatible, "arm,cortex-a53");
    assert_eq!(cpu.hw_target, Some(4));
    assert_cortex_a_common(&cpu);
}

#[test]
fn cortex_a57_snapshot() {
    let cpu = translator("cortex-a57");

    assert_eq!(cpu.isar.entries(), cortex_a_isar(0x10101105, 0x00001124));
    assert_eq!(cpu.midr.into_bits(), 0x411fd070);
    assert_eq!(cpu.reset_fpsid, 0x41034070);
    assert_eq!(cpu.ctr, 0x8444c004);
    assert_eq!(cpu.ccsidr[..3], [0x701fe00a, 0x201fe012, 0x70ffe07a]);
    assert_eq!(cpu.dtb_compatible, "arm,cortex-a57");
    assert_eq!(cpu.hw_target, Some(2));
    assert_cortex_a_common(&cpu);
}

#[test]
fn cortex_a72_snapshot() {
    let cpu = translator("cortex-a72");

    assert_eq!(cpu.isar.entries(), cortex_a_isar(0x10201105, 0x00001124));
    assert_eq!(cpu.midr.into_bits(), 0x410fd083);
    assert_eq!(cpu.reset_fpsid, 0x41034080);
    assert_eq!(cpu.ctr, 0x8444c004);
    assert_eq!(cpu.ccsidr[..3], [0x701fe00a, 0x201fe012, 0x707fe07a]);
    assert_eq!(cpu.dtb_compatible, "arm,cortex-a72");
    assert_eq!(cpu.hw_target, None);
    assert_cortex_a_common(&cpu);
}

#[test]
fn cortex_a_shared() {
    let a53 = translator("cortex-a53");
    let a57 = translator("cortex-a57");
    let a72 = translator("cortex-a72");

    for cpu in [&a53, &a57, &a72] {
        assert_eq!(
            cpu.features,
            ArmFeatures::V8_BASE
                | ArmFeatures::CBAR_RO
                | ArmFeatures::EL2
                | ArmFeatures::EL3
                | ArmFeatures::PMU
        );
        assert!(!cpu.props.contains("sve"));
        assert!(!cpu.props.contains("pauth"));
        assert_eq!(cpu.class.gdb_num_core_regs, 34);
        assert_eq!(cpu.class.gdb_core_xml_file, "aarch64-core.xml");
    }
}

#[test]
fn max_is_a_superset_of_a57() {
    let a57 = translator("cortex-a57");
    let max = translator("max");

    for ((name, base), (_, v)) in a57.isar.entries().into_iter().zip(max.isar.entries()) {
        for shift in (0..64).step_by(4) {
            assert!(
                (v >> shift) & 0xf >= (base >> shift) & 0xf,
                "{name}[{}:{shift}] went down from {base:#x} to {v:#x}",
                shift + 3
            );
        }
    }

    assert_eq!(max.features, a57.features);
    assert_eq!(max.isar.id_aa64isar1.apa(), 1);
    assert_eq!(max.isar.id_aa64isar1.api(), 0);
}

#[test]
fn max_sve_defaults() {
    let cpu = translator("max");

    assert_eq!(cpu.sve.max_vq, 16);
    assert_eq!(cpu.sve.vq_map, u16::MAX);
    assert_eq!(cpu.property("sve"), Some(PropValue::Bool(true)));
    assert_eq!(cpu.property("sve2048"), Some(PropValue::Bool(true)));
    assert_eq!(cpu.sve_zcr_len(2), 15);
}

#[test]
fn max_user_mode() {
    let config = CpuConfig::new("max", AccelKind::UserTranslator)
        .with_prop("sve-default-vector-length", 32u32);
    let cpu = create_cpu(&config, None).unwrap();

    assert_eq!(cpu.current_el(), 0);
    assert_eq!(cpu.zcr_el1, 1);
    assert_eq!(cpu.sve_zcr_len(0), 1);
    assert!(!cpu.fp_trapped(0));
    assert!(!cpu.sve_trapped(0));

    // No cluster in a user-mode process.
    let l2ctlr = CpKey::Aa64 {
        op0: 3,
        op1: 1,
        crn: 11,
        crm: 0,
        op2: 2,
    };

    assert_eq!(cpu.read_cpreg(&l2ctlr), None);
}

#[test]
fn sve_lengths_from_config() {
    let config = CpuConfig::new("max", AccelKind::Translator).with_prop("sve-max-vq", 4u32);
    let cpu = create_cpu(&config, None).unwrap();

    assert_eq!(cpu.sve.max_vq, 4);
    assert_eq!(cpu.sve.vq_map, 0xf);
    assert_eq!(cpu.property("sve512"), Some(PropValue::Bool(true)));
    assert_eq!(cpu.property("sve640"), Some(PropValue::Bool(false)));
    assert_eq!(cpu.property("sve-max-vq"), Some(PropValue::U32(4)));

    let config = CpuConfig::new("max", AccelKind::Translator)
        .with_prop("sve256", false)
        .with_prop("sve-max-vq", 4u32);

    assert!(matches!(
        config_error(&config, None),
        ModelError::RealizeFailed(PropError::Pow2Required(2, 4))
    ));

    let config = CpuConfig::new("max", AccelKind::Translator)
        .with_prop("sve", false)
        .with_prop("sve512", true);

    assert!(matches!(
        config_error(&config, None),
        ModelError::RealizeFailed(PropError::SveDisabled(4))
    ));
}

#[test]
fn invalid_properties() {
    let config = CpuConfig::new("max", AccelKind::Translator).with_prop("sve-max-vq", 17u32);

    assert!(matches!(
        config_error(&config, None),
        ModelError::SetPropertyFailed(n, PropError::InvalidSveMaxVq(17)) if n == "sve-max-vq"
    ));

    let config = CpuConfig::new("cortex-a57", AccelKind::Translator).with_prop("sve", true);

    assert!(matches!(
        config_error(&config, None),
        ModelError::SetPropertyFailed(_, PropError::UnknownProperty(_))
    ));

    let config = CpuConfig::new("cortex-a57", AccelKind::Translator).with_prop("pmu", 1u32);

    assert!(matches!(
        config_error(&config, None),
        ModelError::SetPropertyFailed(_, PropError::TypeMismatch(_))
    ));

    let config = CpuConfig::new("max", AccelKind::Translator).with_prop("aarch64", false);

    assert!(matches!(
        config_error(&config, None),
        ModelError::SetPropertyFailed(_, PropError::Aarch64Required)
    ));

    let config = CpuConfig::new("max", AccelKind::Translator)
        .with_prop("pauth", false)
        .with_prop("pauth-impdef", true);

    assert!(matches!(
        config_error(&config, None),
        ModelError::RealizeFailed(PropError::ImpdefWithoutPauth)
    ));

    let config = CpuConfig::new("cortex-a99", AccelKind::Translator);

    assert!(matches!(
        config_error(&config, None),
        ModelError::UnknownModel(n) if n == "cortex-a99"
    ));
}

#[test]
fn optional_features_from_config() {
    let config = CpuConfig::new("cortex-a72", AccelKind::Translator)
        .with_prop("has_el3", false)
        .with_prop("pmu", false);
    let cpu = create_cpu(&config, None).unwrap();

    assert!(!cpu.features.contains(ArmFeatures::EL3));
    assert!(!cpu.features.contains(ArmFeatures::PMU));
    assert!(cpu.features.contains(ArmFeatures::EL2));
    assert_eq!(cpu.isar.id_aa64pfr0.el3(), 0);
    assert_eq!(cpu.isar.id_pfr1, 0x00011001);
    assert_eq!(cpu.isar.id_aa64dfr0.pmu_ver(), 0);
    assert_eq!(cpu.isar.id_dfr0.perf_mon(), 0);
}

#[test]
fn cluster_size() {
    let mut config = CpuConfig::new("cortex-a57", AccelKind::Translator);

    config.cores = NonZero::new(4).unwrap();

    let cpu = create_cpu(&config, None).unwrap();
    let l2ctlr = CpKey::Aa32 {
        cp: 15,
        opc1: 1,
        crn: 9,
        crm: 0,
        opc2: 2,
        wide: false,
    };

    assert_eq!(cpu.core_count, 4);
    assert_eq!(cpu.read_cpreg(&l2ctlr), Some(3 << 24));
}

#[test]
fn max_follows_host() {
    let host = Host {
        feats: Some(host_feats()),
        aarch32_el1: true,
    };
    let config = CpuConfig::new("max", AccelKind::Hardware).with_prop("aarch64", false);
    let cpu = create_cpu(&config, Some(&host)).unwrap();
    let feats = host_feats();

    assert_eq!(cpu.accel(), AccelKind::Hardware);
    assert!(cpu.host_aarch32_el1);
    assert_eq!(cpu.isar, feats.isar);
    assert_eq!(cpu.midr, feats.midr);
    assert_eq!(cpu.revidr, 0x100);
    assert_eq!(cpu.hw_target, Some(5));
    assert_eq!(cpu.dtb_compatible, "arm,arm-v8");
    assert!(!cpu.features.contains(ArmFeatures::AARCH64));
    assert!(!cpu.features.contains(ArmFeatures::EL3));
    assert!(cpu.features.contains(ArmFeatures::EL2 | ArmFeatures::PMU));
    assert!(!cpu.props.contains("pauth"));
    assert!(!cpu.props.contains("has_el3"));
    assert_eq!(cpu.property("sve"), Some(PropValue::Bool(false)));
}

#[test]
fn hardware_errors() {
    let config = CpuConfig::new("max", AccelKind::Hardware);

    assert!(matches!(
        config_error(&config, None),
        ModelError::NoHypervisor
    ));

    let host = Host {
        feats: None,
        aarch32_el1: false,
    };

    assert!(matches!(
        config_error(&config, Some(&host)),
        ModelError::HostQueryFailed(HostError::NoAarch64)
    ));

    // AArch32 EL1 is not available on this host.
    let host = Host {
        feats: Some(host_feats()),
        aarch32_el1: false,
    };
    let config = config.with_prop("aarch64", false);

    assert!(matches!(
        config_error(&config, Some(&host)),
        ModelError::SetPropertyFailed(_, PropError::Aarch64Required)
    ));
}

#[test]
fn instantiate_without_realize() {
    let cpu = registry()
        .instantiate("cortex-a57", &vcpu::Accel::Translator { user_only: false })
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(cpu.model, "cortex-a57");
    assert_eq!(cpu.core_count, 1);
    assert_eq!(cpu.property("aarch64"), Some(PropValue::Bool(true)));
    assert_eq!(cpu.property("has_el3"), Some(PropValue::Bool(true)));
    assert_eq!(cpu.pstate.into_bits(), 0x3c5);
}
