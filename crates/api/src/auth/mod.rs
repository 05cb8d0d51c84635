//! Caller identity.
//!
//! Sessions are issued elsewhere; this service only verifies HS256 access
//! tokens whose `sub` claim is the caller's user id. See [`jwt`].

pub mod jwt;
