//! The modular arithmetic of the prime field Z/pZ in which the scheme computes
//!
//! Every function takes the modulus `p` explicitly and returns a canonical
//! representative in `[0, p - 1]`. Inputs may be any integer, negative ones
//! included. `p` is assumed to be prime and at least 2; primality is never
//! checked here.

use crate::error::{Result, SecretSharingError};
use num::{bigint::BigInt, traits::{One, Zero}, Integer};
use std::mem;

/// The Mersenne prime 2^127 - 1, the default modulus of the scheme
pub fn default_prime() -> BigInt {
    (BigInt::one() << 127usize) - BigInt::one()
}

/// Canonical representative of `a` modulo `p`
pub fn reduce(a: &BigInt, p: &BigInt) -> BigInt {
    a.mod_floor(p)
}

/// Modular addition
pub fn add(a: &BigInt, b: &BigInt, p: &BigInt) -> BigInt {
    reduce(&(a + b), p)
}

/// Modular subtraction
pub fn sub(a: &BigInt, b: &BigInt, p: &BigInt) -> BigInt {
    reduce(&(a - b), p)
}

/// Modular multiplication
pub fn mul(a: &BigInt, b: &BigInt, p: &BigInt) -> BigInt {
    reduce(&(a * b), p)
}

/// Modular exponentiation by square-and-multiply. `pow(a, 0, p)` is 1.
pub fn pow(a: &BigInt, e: u64, p: &BigInt) -> BigInt {
    let mut result = reduce(&BigInt::one(), p);
    let mut base = reduce(a, p);
    let mut exp = e;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul(&result, &base, p);
        }
        exp >>= 1;
        if exp > 0 {
            base = mul(&base, &base, p);
        }
    }
    result
}

/// Extended Euclidean algorithm on nonnegative integers.
///
/// Returns `(g, s, t)` with `s * a + t * b = g` and `g = gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        let next_s = &old_s - &q * &s;
        let next_t = &old_t - &q * &t;
        old_r = mem::replace(&mut r, next_r);
        old_s = mem::replace(&mut s, next_s);
        old_t = mem::replace(&mut t, next_t);
    }
    (old_r, old_s, old_t)
}

/// Modular multiplicative inverse of `a` modulo `p`.
///
/// Fails with [`SecretSharingError::DivisionByZero`] when `a ≡ 0 (mod p)`,
/// or when `a` shares a factor with a non-prime `p`.
pub fn modular_inverse(a: &BigInt, p: &BigInt) -> Result<BigInt> {
    let a = reduce(a, p);
    if a.is_zero() {
        return Err(SecretSharingError::DivisionByZero);
    }
    let (g, s, _) = extended_gcd(&a, p);
    if !g.is_one() {
        return Err(SecretSharingError::DivisionByZero);
    }
    Ok(reduce(&s, p))
}

/// Modular division `a / b`, i.e. `a * b^-1 mod p`
pub fn div(a: &BigInt, b: &BigInt, p: &BigInt) -> Result<BigInt> {
    let inverse = modular_inverse(b, p)?;
    Ok(mul(a, &inverse, p))
}
