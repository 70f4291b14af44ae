//! The action identifier.
//!
//! An [`ActionId`] is the only way anything in the engine refers to an
//! action: the state machine stores one for the running action, automation
//! stores them as targets, and the catalog is keyed by them. It is a plain
//! `Copy` value, so holding one never aliases a mutable catalog entry.

use serde::{Deserialize, Serialize};

use crate::enums::{ActionKind, BlackOpName, ContractName, GeneralActionName, OperationName};

/// Identifies one catalog action as a `(kind, name)` pair.
///
/// The name enum is scoped to its kind, so an identifier can never name an
/// action that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionId {
    /// A contract.
    Contract(ContractName),
    /// An operation.
    Operation(OperationName),
    /// A black operation.
    BlackOp(BlackOpName),
    /// A general action.
    General(GeneralActionName),
}

impl ActionId {
    /// Return the kind half of the identifier.
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::Contract(_) => ActionKind::Contract,
            Self::Operation(_) => ActionKind::Operation,
            Self::BlackOp(_) => ActionKind::BlackOp,
            Self::General(_) => ActionKind::General,
        }
    }

    /// Return the display name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Contract(name) => name.as_str(),
            Self::Operation(name) => name.as_str(),
            Self::BlackOp(name) => name.as_str(),
            Self::General(name) => name.as_str(),
        }
    }

    /// Look up an identifier from a kind and a loosely matched name.
    pub fn from_kind_and_name(kind: ActionKind, name: &str) -> Option<Self> {
        match kind {
            ActionKind::Contract => ContractName::from_name(name).map(Self::Contract),
            ActionKind::Operation => OperationName::from_name(name).map(Self::Operation),
            ActionKind::BlackOp => BlackOpName::from_name(name).map(Self::BlackOp),
            ActionKind::General => GeneralActionName::from_name(name).map(Self::General),
        }
    }

    /// Iterate over every action identifier in the game.
    pub fn all() -> impl Iterator<Item = Self> {
        ContractName::ALL
            .iter()
            .copied()
            .map(Self::Contract)
            .chain(OperationName::ALL.iter().copied().map(Self::Operation))
            .chain(BlackOpName::ALL.iter().copied().map(Self::BlackOp))
            .chain(GeneralActionName::ALL.iter().copied().map(Self::General))
    }
}

impl core::fmt::Display for ActionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ContractName> for ActionId {
    fn from(name: ContractName) -> Self {
        Self::Contract(name)
    }
}

impl From<OperationName> for ActionId {
    fn from(name: OperationName) -> Self {
        Self::Operation(name)
    }
}

impl From<BlackOpName> for ActionId {
    fn from(name: BlackOpName) -> Self {
        Self::BlackOp(name)
    }
}

impl From<GeneralActionName> for ActionId {
    fn from(name: GeneralActionName) -> Self {
        Self::General(name)
    }
}
