// SPDX-License-Identifier: MIT OR Apache-2.0

use samiti_auth::AuthorizationDenied;
use samiti_core::cbor::EncodeError;
use samiti_core::{AmountError, IdentityId, RoleError};
use thiserror::Error;

/// Malformed input to a write. Surfaced to the caller, never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("mobile number must consist of at least {min} digits")]
    MalformedMobile { min: usize },

    #[error("passphrase must be at least {min} characters long")]
    PassphraseTooShort { min: usize },

    #[error("mobile number is already registered")]
    DuplicateMobile,

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Role(#[from] RoleError),
}

/// Failed to persist or erase the session snapshot.
#[derive(Debug, Error)]
pub enum SessionError<P> {
    #[error("could not encode session snapshot: {0}")]
    Encode(#[from] EncodeError),

    #[error("session storage failed: {0}")]
    Storage(P),
}

#[derive(Debug, Error)]
pub enum MessagingError<E> {
    #[error(transparent)]
    Denied(#[from] AuthorizationDenied),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no channel is open")]
    NoChannel,

    #[error("store rejected message: {0}")]
    Store(E),
}

#[derive(Debug, Error)]
pub enum AccountError<E> {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("mobile number, passphrase and role do not match any member")]
    InvalidCredentials,

    #[error("member {0} does not exist")]
    UnknownMember(IdentityId),

    #[error("store failed: {0}")]
    Store(E),
}

#[derive(Debug, Error)]
pub enum AdminError<E> {
    #[error(transparent)]
    Denied(#[from] AuthorizationDenied),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store failed: {0}")]
    Store(E),
}
