//! Wire and domain types shared by the request feed client and its host apps.

pub mod domain;
pub mod error;
pub mod protocol;
