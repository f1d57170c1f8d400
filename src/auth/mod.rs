//! Authentication module
//!
//! Supplies credentials and turns them into request auth material.
//!
//! - `CredentialProvider` yields `(url, identity, secret)` triples per call
//! - `Backend` builds request URLs and auth headers for one API family

mod backend;
mod types;

pub use backend::{Backend, BearerBackend, ZendeskBackend};
pub use types::{CredentialProvider, Credentials, EnvCredentials, StaticCredentials};

#[cfg(test)]
mod tests;
