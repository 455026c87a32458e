use serde::Serialize;

use crate::contract::AnimalContract;

/// Whether a transaction is committed to the ledger or only evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Writes to the world state; its result is committed.
    Submit,
    /// Read-only query; nothing is committed.
    Evaluate,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Evaluate => write!(f, "evaluate"),
        }
    }
}

/// Description of one invocable transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    pub name: &'static str,
    pub kind: TransactionKind,
    pub params: &'static [&'static str],
    /// Shape of the returned payload, if any.
    pub returns: Option<&'static str>,
}

const FIELD_PARAMS: &[&str] = &[
    "id",
    "name",
    "type",
    "breed",
    "birthDate",
    "description",
    "imgUrl",
    "pedigree",
];

/// Every transaction the animal contract exposes.
pub const TRANSACTIONS: &[TransactionInfo] = &[
    TransactionInfo {
        name: "InitLedger",
        kind: TransactionKind::Submit,
        params: &[],
        returns: None,
    },
    TransactionInfo {
        name: "CreateAnimal",
        kind: TransactionKind::Submit,
        params: FIELD_PARAMS,
        returns: None,
    },
    TransactionInfo {
        name: "UpdateAnimalName",
        kind: TransactionKind::Submit,
        params: &["id", "newName"],
        returns: None,
    },
    TransactionInfo {
        name: "ReadAnimal",
        kind: TransactionKind::Evaluate,
        params: &["id"],
        returns: Some("string"),
    },
    TransactionInfo {
        name: "AnimalExists",
        kind: TransactionKind::Evaluate,
        params: &["id"],
        returns: Some("boolean"),
    },
    TransactionInfo {
        name: "UpdateAnimal",
        kind: TransactionKind::Submit,
        params: FIELD_PARAMS,
        returns: None,
    },
    TransactionInfo {
        name: "DeleteAnimal",
        kind: TransactionKind::Submit,
        params: &["id"],
        returns: None,
    },
    TransactionInfo {
        name: "GetAllAnimals",
        kind: TransactionKind::Evaluate,
        params: &[],
        returns: Some("string"),
    },
];

impl AnimalContract {
    pub fn transactions() -> &'static [TransactionInfo] {
        TRANSACTIONS
    }

    pub fn transaction(name: &str) -> Option<&'static TransactionInfo> {
        TRANSACTIONS.iter().find(|t| t.name == name)
    }
}
