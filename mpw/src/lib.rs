#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::inline_always
)]

//! Deterministic Master Password generator (the Billemont / Lyndir
//! algorithm): an identity and a master secret are stretched into a
//! 64-byte master key with scrypt, each site request is keyed down to a
//! 32-byte site key with HMAC-SHA-256, and the site key drives a template
//! grammar that emits typable passwords, usernames, recovery phrases, or
//! raw key bytes. Nothing is stored; the same inputs always produce the
//! same output.

mod error;
mod session;
mod templates;

pub use error::Error;
pub use scrypt::Memory;
pub use session::{Mpw, Output, Scope, NAMESPACE};
pub use templates::PasswordType;
