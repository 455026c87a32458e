//! String-argument dispatch for the animal contract.
//!
//! Execution environments hand transactions over as a function name plus a
//! list of string arguments. [`invoke`] checks arity against
//! [`TRANSACTIONS`](crate::metadata::TRANSACTIONS), parses typed arguments,
//! and calls the matching [`AnimalContract`] operation.

use herd_types::AnimalFields;

use crate::context::Context;
use crate::contract::AnimalContract;
use crate::error::ContractError;

/// Result payload of an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvokeResponse {
    Empty,
    Bool(bool),
    Payload(String),
}

impl InvokeResponse {
    /// Wire form of the payload: empty, `true`/`false`, or the string itself.
    pub fn into_payload(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Payload(s) => s,
        }
    }
}

/// Errors from dispatching an invocation.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("unknown transaction: {0}")]
    UnknownFunction(String),

    #[error("{function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Dispatch `function` with string `args` against `contract`.
pub fn invoke(
    contract: &AnimalContract,
    ctx: &Context<'_>,
    function: &str,
    args: &[String],
) -> Result<InvokeResponse, InvokeError> {
    let info = AnimalContract::transaction(function)
        .ok_or_else(|| InvokeError::UnknownFunction(function.to_string()))?;
    if args.len() != info.params.len() {
        return Err(InvokeError::ArgumentCount {
            function: function.to_string(),
            expected: info.params.len(),
            actual: args.len(),
        });
    }
    tracing::debug!(function, kind = %info.kind, "invoking transaction");

    let response = match function {
        "InitLedger" => {
            contract.init_ledger(ctx)?;
            InvokeResponse::Empty
        }
        "CreateAnimal" => {
            contract.create_animal(ctx, &args[0], parse_fields(&args[1..])?)?;
            InvokeResponse::Empty
        }
        "UpdateAnimalName" => {
            contract.update_animal_name(ctx, &args[0], &args[1])?;
            InvokeResponse::Empty
        }
        "ReadAnimal" => InvokeResponse::Payload(contract.read_animal(ctx, &args[0])?),
        "AnimalExists" => InvokeResponse::Bool(contract.animal_exists(ctx, &args[0])?),
        "UpdateAnimal" => {
            contract.update_animal(ctx, &args[0], parse_fields(&args[1..])?)?;
            InvokeResponse::Empty
        }
        "DeleteAnimal" => {
            contract.delete_animal(ctx, &args[0])?;
            InvokeResponse::Empty
        }
        "GetAllAnimals" => InvokeResponse::Payload(contract.get_all_animals_json(ctx)?),
        other => return Err(InvokeError::UnknownFunction(other.to_string())),
    };
    Ok(response)
}

/// Parse `name, type, breed, birthDate, description, imgUrl, pedigree`.
fn parse_fields(args: &[String]) -> Result<AnimalFields, InvokeError> {
    let [name, kind, breed, birth_date, description, img_url, pedigree] = args else {
        return Err(InvokeError::ArgumentCount {
            function: "fields".into(),
            expected: 7,
            actual: args.len(),
        });
    };
    Ok(AnimalFields {
        name: name.clone(),
        kind: kind.clone(),
        breed: breed.clone(),
        birth_date: birth_date.clone(),
        description: description.clone(),
        img_url: img_url.clone(),
        pedigree: parse_bool("pedigree", pedigree)?,
    })
}

/// `true`/`false`, case-insensitive.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, InvokeError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(InvokeError::InvalidArgument {
            name: name.to_string(),
            reason: format!("expected true or false, got {value:?}"),
        })
    }
}
