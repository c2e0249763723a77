//! Threshold secret sharing over a prime field.
//!
//! A dealer splits a secret `K` into `n` shares, any `k` of which recover `K`
//! by Lagrange interpolation at zero, while `k - 1` reveal nothing about it.
//! All arithmetic is exact, over arbitrary precision integers modulo a prime
//! (2^127 - 1 unless told otherwise).

#![deny(unused_import_braces, trivial_casts, bare_trait_objects, missing_docs)]
#![deny(unused_qualifications, variant_size_differences, stable_features)]
#![deny(non_shorthand_field_patterns, unused_attributes, unused_imports)]
#![deny(renamed_and_removed_lints, unused_allocation, unused_comparisons)]
#![deny(unused_must_use, unused_mut)]
#![deny(unreachable_pub, unused_extern_crates, trivial_numeric_casts)]
#![forbid(unsafe_code)]

pub mod error;
pub mod modular_arithmetic;
pub mod secret_sharing_scheme;

pub use error::{Result, SecretSharingError};
pub use modular_arithmetic::default_prime;
pub use secret_sharing_scheme::{generate_shares, recover_secret, SecretSharingScheme, Share, Shares};
