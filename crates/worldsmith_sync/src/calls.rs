//! Contract calls derived from tracked changes.

use std::fmt;

use worldsmith_calldata::{ToCalldata, encode, flatten};
use worldsmith_foundation::Felt;
use worldsmith_storage::Component;

use crate::changes::{Change, ChangeKind};

/// A single external call: entrypoint name plus flat calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    /// Entrypoint, e.g. `create_entity`.
    pub entrypoint: String,
    /// Wire-level arguments.
    pub calldata: Vec<Felt>,
}

impl ContractCall {
    /// The `create_*` call writing one component.
    #[must_use]
    pub fn create(component: &Component) -> Self {
        Self {
            entrypoint: format!("create_{}", component.kind().call_suffix()),
            calldata: flatten(&encode(&component.to_calldata())),
        }
    }

    /// The `delete_*` call removing one component.
    #[must_use]
    pub fn delete(component: &Component) -> Self {
        Self {
            entrypoint: format!("delete_{}", component.kind().call_suffix()),
            calldata: vec![component.inst().felt()],
        }
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.entrypoint)?;
        for (i, felt) in self.calldata.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{felt:#x}")?;
        }
        f.write_str(")")
    }
}

/// The calls that publish one change, in canonical component order.
#[must_use]
pub fn calls_for(change: &Change) -> Vec<ContractCall> {
    let components = change.target.components();
    match change.kind {
        ChangeKind::Update => components.iter().map(ContractCall::create).collect(),
        ChangeKind::Delete => components.iter().map(ContractCall::delete).collect(),
    }
}
