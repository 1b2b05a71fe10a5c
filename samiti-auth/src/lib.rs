// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role policy of the samiti membership directory.
//!
//! Every access decision in the directory is a single lookup: the [`Role`] of the acting identity
//! is mapped to a set of [`Capabilities`] and the required [`Capability`] is checked against it.
//! Call sites never compare role names themselves.
//!
//! Roles are also totally ordered by [`Rank`], lower numbers meaning higher authority, which is
//! used to order member listings.
//!
//! ```
//! use samiti_auth::{Capability, capabilities, rank, require};
//! use samiti_core::Role;
//!
//! assert!(rank(Role::President) < rank(Role::Member));
//! assert!(capabilities(Role::FinanceSecretary).contains(Capability::UseAdmin));
//! assert!(require(Role::GeneralMember, Capability::UseMessaging).is_err());
//! ```
//!
//! [`Role`]: samiti_core::Role
mod capability;
mod policy;

pub use capability::{Capabilities, Capability};
pub use policy::{
    AuthorizationDenied, Rank, capabilities, is_committee, rank, require, sort_by_rank,
};
