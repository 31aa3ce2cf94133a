use thiserror::Error;

use crate::store::StateId;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("State handle is stale or was never issued: {0:?}")]
    StaleHandle(StateId),
}

pub type Result<T> = std::result::Result<T, Error>;
