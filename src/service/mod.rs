//! View composition and the mutations that must stay consistent with it.
//!
//! Composition (`compose*`) is a pure read-side join: it re-reads the
//! normalized rows at request time and never writes. Mutations return a
//! freshly composed view so callers never read back separately.
//!
//! A composition issues several independent reads without a shared
//! snapshot. Under concurrent writes a caller can observe, say, a
//! favorites count taken before a viewer's own favorite landed. That
//! relaxation is accepted for this system; the storage layer's unique
//! constraints carry the correctness burden for races.
//!
//! Viewer scoping: an absent viewer is anonymous, and `favorited` /
//! `following` are forced to `false` rather than computed.
pub mod articles;
pub mod comments;
pub mod profiles;
pub mod users;
