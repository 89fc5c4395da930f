// SPDX-License-Identifier: MIT OR Apache-2.0
use config::AccelKind;
use hv::Hypervisor;

/// Active backend that executes guest instructions.
///
/// Both backends are always compiled in so a CPU model can be created against either one.
#[derive(Clone, Copy)]
pub enum Accel<'a> {
    Hardware(&'a dyn Hypervisor),
    Translator { user_only: bool },
    None,
}

impl Accel<'_> {
    pub fn kind(&self) -> AccelKind {
        match self {
            Self::Hardware(_) => AccelKind::Hardware,
            Self::Translator { user_only: false } => AccelKind::Translator,
            Self::Translator { user_only: true } => AccelKind::UserTranslator,
            Self::None => AccelKind::None,
        }
    }
}
