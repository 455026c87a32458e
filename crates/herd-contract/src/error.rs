use herd_state::StateError;

/// Errors produced by contract operations.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("the animal {id} already exists")]
    AlreadyExists { id: String },

    #[error("the animal with id:{id} does not exist")]
    NotFound { id: String },

    #[error("the animal with id:{id} could not be decoded: {reason}")]
    Decode { id: String, reason: String },

    /// Passed through unchanged from the world state.
    #[error(transparent)]
    State(#[from] StateError),
}

pub type ContractResult<T> = Result<T, ContractError>;
