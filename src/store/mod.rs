//! Storage access, one module per entity family.
//!
//! Functions here speak in rows and booleans; mapping misses and
//! ownership failures onto the error taxonomy is the service layer's job,
//! except where a constraint violation has a fixed meaning (duplicate
//! email/username).
pub mod articles;
pub mod comments;
pub mod social;
pub mod tags;
pub mod users;
