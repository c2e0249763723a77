//! Implements the secret sharing scheme: share generation and secret recovery

use crate::error::{Result, SecretSharingError};
use crate::modular_arithmetic::{add, default_prime, div, mul, pow, reduce, sub};
use log::{debug, trace};
use num::{bigint::{BigInt, RandBigInt}, traits::{One, Zero}};
use rand::{rngs::OsRng, seq::index, CryptoRng, RngCore};
use std::collections::HashSet;

/// A single participant's share: a point `(x, f(x))` on the dealer's polynomial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Evaluation point `x`, nonzero and unique within its session
    pub public_key: BigInt,
    /// Polynomial value `f(x) mod p`
    pub secret_key: BigInt,
    /// Number of shares needed to recover the secret
    pub threshold: usize,
}

/// The shares produced by one generation session.
///
/// `secret_keys()[i]` is the polynomial value at `public_keys()[i]`.
#[derive(Debug, Clone)]
pub struct Shares {
    threshold: usize,
    public_keys: Vec<BigInt>,
    secret_keys: Vec<BigInt>,
}

impl Shares {
    /// Number of shares needed to recover the secret
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Distinct evaluation points, one per participant
    pub fn public_keys(&self) -> &[BigInt] {
        &self.public_keys
    }

    /// Polynomial values, index-aligned with [`Shares::public_keys`]
    pub fn secret_keys(&self) -> &[BigInt] {
        &self.secret_keys
    }

    /// Number of shares in the session
    pub fn len(&self) -> usize {
        self.public_keys.len()
    }

    /// Whether the session holds no share at all
    pub fn is_empty(&self) -> bool {
        self.public_keys.is_empty()
    }

    /// The `i`-th share, if any
    pub fn share(&self, i: usize) -> Option<Share> {
        let public_key = self.public_keys.get(i)?;
        let secret_key = self.secret_keys.get(i)?;
        Some(Share {
            public_key: public_key.clone(),
            secret_key: secret_key.clone(),
            threshold: self.threshold,
        })
    }

    /// Iterates over every share in generation order
    pub fn iter(&self) -> impl Iterator<Item = Share> + '_ {
        self.public_keys
            .iter()
            .zip(self.secret_keys.iter())
            .map(move |(x, y)| Share {
                public_key: x.clone(),
                secret_key: y.clone(),
                threshold: self.threshold,
            })
    }

    /// Picks exactly `threshold` shares uniformly at random, without replacement
    pub fn choose<R: RngCore + ?Sized>(&self, rng: &mut R) -> Vec<Share> {
        index::sample(rng, self.len(), self.threshold)
            .into_iter()
            .filter_map(|i| self.share(i))
            .collect()
    }
}

/// Polynomial over Z/pZ with coefficients in increasing degree.
/// Lives only for the duration of one share generation.
struct Polynomial {
    coeffs: Vec<BigInt>,
}

impl Polynomial {
    /// `secret + a_1 x + ... + a_degree x^degree` with uniform random `a_i`
    fn random<R: RngCore + CryptoRng + ?Sized>(
        secret: &BigInt,
        degree: usize,
        prime: &BigInt,
        rng: &mut R,
    ) -> Self {
        let mut coeffs = Vec::with_capacity(degree + 1);
        coeffs.push(secret.clone());
        let zero = BigInt::zero();
        for _ in 0..degree {
            coeffs.push(rng.gen_bigint_range(&zero, prime));
        }
        Self { coeffs }
    }

    fn evaluate(&self, x: &BigInt, prime: &BigInt) -> BigInt {
        self.coeffs
            .iter()
            .enumerate()
            .fold(BigInt::zero(), |y, (j, a)| {
                add(&y, &mul(a, &pow(x, j as u64, prime), prime), prime)
            })
    }
}

/// Parameters of the secret sharing scheme
#[derive(Debug, Clone)]
pub struct SecretSharingScheme {
    /// Number of shares needed to recover the secret
    threshold: usize,
    /// Number of shares handed out
    n: usize,
    /// Prime defining the Zp field in which computation is taking place.
    prime: BigInt,
}

impl SecretSharingScheme {
    /// Creates a new scheme, checking that `1 <= threshold <= n` and that the
    /// prime has at least `n` distinct nonzero elements. `prime` must be
    /// prime; this is not verified.
    pub fn new(threshold: usize, n: usize, prime: BigInt) -> Result<Self> {
        if threshold < 1 {
            return Err(SecretSharingError::InvalidParameters(format!(
                "threshold must be at least 1, got {}",
                threshold
            )));
        }
        if threshold > n {
            return Err(SecretSharingError::InvalidParameters(format!(
                "threshold k={} exceeds share count n={}",
                threshold, n
            )));
        }
        if prime < BigInt::from(2) {
            return Err(SecretSharingError::InvalidParameters(format!(
                "modulus must be at least 2, got {}",
                prime
            )));
        }
        if &prime - BigInt::one() < BigInt::from(n) {
            return Err(SecretSharingError::InvalidParameters(format!(
                "modulus {} has fewer than n={} nonzero elements",
                prime, n
            )));
        }
        Ok(Self { threshold, n, prime })
    }

    /// Creates a new scheme over 2^127 - 1
    pub fn with_default_prime(threshold: usize, n: usize) -> Result<Self> {
        Self::new(threshold, n, default_prime())
    }

    /// Number of shares needed to recover the secret
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of shares handed out
    pub fn n(&self) -> usize {
        self.n
    }

    /// The field modulus
    pub fn prime(&self) -> &BigInt {
        &self.prime
    }

    /// Splits `secret` into `n` shares.
    ///
    /// The secret must already lie in `[0, p - 1]`. Public keys and polynomial
    /// coefficients are all drawn from `rng`, which must be a cryptographically
    /// secure source.
    pub fn generate_shares<R: RngCore + CryptoRng + ?Sized>(
        &self,
        secret: &BigInt,
        rng: &mut R,
    ) -> Result<Shares> {
        if secret < &BigInt::zero() || secret >= &self.prime {
            return Err(SecretSharingError::InvalidParameters(
                "secret must lie in [0, p - 1]".to_string(),
            ));
        }
        debug!(
            "generating {} shares with threshold {} over a {}-bit prime",
            self.n,
            self.threshold,
            self.prime.bits()
        );

        let public_keys = self.choose_public_keys(rng);
        let polynomial = Polynomial::random(secret, self.threshold - 1, &self.prime, rng);
        let secret_keys = public_keys
            .iter()
            .map(|x| polynomial.evaluate(x, &self.prime))
            .collect();

        Ok(Shares {
            threshold: self.threshold,
            public_keys,
            secret_keys,
        })
    }

    /// Rejection-samples `n` distinct public keys from `[1, p - 1]`
    fn choose_public_keys<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Vec<BigInt> {
        let one = BigInt::one();
        let mut seen = HashSet::with_capacity(self.n);
        let mut public_keys = Vec::with_capacity(self.n);
        while public_keys.len() < self.n {
            let x = rng.gen_bigint_range(&one, &self.prime);
            if seen.insert(x.clone()) {
                public_keys.push(x);
            } else {
                trace!("public key collision after {} draws, redrawing", public_keys.len());
            }
        }
        public_keys
    }

    /// Recovers the secret from exactly `threshold` shares of this scheme
    pub fn recover_secret(&self, shares: &[Share]) -> Result<BigInt> {
        if shares.len() != self.threshold {
            return Err(SecretSharingError::IncorrectShareCount {
                got: shares.len(),
                need: self.threshold,
            });
        }
        if shares.iter().any(|s| s.threshold != self.threshold) {
            return Err(SecretSharingError::InconsistentShares);
        }
        recover_secret(shares, &self.prime)
    }
}

/// Splits `secret` into `n` shares with threshold `k`, drawing randomness from
/// the operating system.
pub fn generate_shares(n: usize, k: usize, secret: &BigInt, prime: &BigInt) -> Result<Shares> {
    SecretSharingScheme::new(k, n, prime.clone())?.generate_shares(secret, &mut OsRng)
}

/// Recovers the secret from exactly `k` shares, `k` being the threshold the
/// shares carry.
///
/// Fails with [`SecretSharingError::IncorrectShareCount`] for any other number
/// of shares, and with [`SecretSharingError::DegenerateShareSet`] when two
/// public keys coincide modulo `prime`.
pub fn recover_secret(shares: &[Share], prime: &BigInt) -> Result<BigInt> {
    if prime < &BigInt::from(2) {
        return Err(SecretSharingError::InvalidParameters(format!(
            "modulus must be at least 2, got {}",
            prime
        )));
    }
    // an empty set does not even tell us the threshold; one share is the least any threshold needs
    let threshold = match shares.first() {
        Some(share) => share.threshold,
        None => return Err(SecretSharingError::IncorrectShareCount { got: 0, need: 1 }),
    };
    if shares.iter().any(|s| s.threshold != threshold) {
        return Err(SecretSharingError::InconsistentShares);
    }
    if shares.len() != threshold {
        return Err(SecretSharingError::IncorrectShareCount {
            got: shares.len(),
            need: threshold,
        });
    }
    debug!("recovering secret from {} shares", shares.len());
    lagrange_at_zero(shares, prime)
}

/// Evaluates at zero the unique polynomial through the given points
fn lagrange_at_zero(shares: &[Share], prime: &BigInt) -> Result<BigInt> {
    let xs: Vec<BigInt> = shares.iter().map(|s| reduce(&s.public_key, prime)).collect();

    let mut seen = HashSet::with_capacity(xs.len());
    for x in &xs {
        if !seen.insert(x) {
            return Err(SecretSharingError::DegenerateShareSet {
                public_key: x.clone(),
            });
        }
    }

    let mut secret = BigInt::zero();
    for (i, share) in shares.iter().enumerate() {
        let mut numerator = BigInt::one();
        let mut denominator = BigInt::one();
        for (j, xj) in xs.iter().enumerate() {
            if i != j {
                numerator = mul(&numerator, &-xj, prime);
                denominator = mul(&denominator, &sub(&xs[i], xj, prime), prime);
            }
        }
        let basis = div(&numerator, &denominator, prime)?;
        secret = add(&secret, &mul(&share.secret_key, &basis, prime), prime);
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use crate::secret_sharing_scheme::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn shares_of(points: &[(i64, i64)], threshold: usize) -> Vec<Share> {
        points
            .iter()
            .map(|&(x, y)| Share {
                public_key: BigInt::from(x),
                secret_key: BigInt::from(y),
                threshold,
            })
            .collect()
    }

    /// Every size-`k` subset of `0..n`, in lexicographic order
    fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
        if k == 0 {
            return vec![vec![]];
        }
        let mut out = Vec::new();
        for first in 0..n {
            for rest in combinations(n, k - 1) {
                if rest.first().map_or(true, |&r| r > first) {
                    let mut c = vec![first];
                    c.extend(rest);
                    out.push(c);
                }
            }
        }
        out
    }

    #[test]
    fn polynomial_evaluate_test() {
        let p = BigInt::from(1613);
        let f = Polynomial {
            coeffs: vec![BigInt::from(1234), BigInt::from(166), BigInt::from(94)],
        };
        let ys: Vec<BigInt> = (1..=6i32).map(|x| f.evaluate(&BigInt::from(x), &p)).collect();
        let expected: Vec<BigInt> = [1494, 329, 965, 176, 1188, 775].iter().map(|&y| BigInt::from(y)).collect();
        assert_eq!(ys, expected);
    }

    #[test]
    fn recover_known_points_test() {
        let p = BigInt::from(1613);
        let shares = shares_of(&[(1, 1494), (2, 329), (3, 965)], 3);
        assert_eq!(recover_secret(&shares, &p).unwrap(), BigInt::from(1234));
        let shares = shares_of(&[(6, 775), (4, 176), (5, 1188)], 3);
        assert_eq!(recover_secret(&shares, &p).unwrap(), BigInt::from(1234));
    }

    #[test]
    fn round_trip_every_subset_test() {
        let rng = &mut StdRng::seed_from_u64(1337);
        let scheme = SecretSharingScheme::with_default_prime(4, 10).unwrap();
        let secret = BigInt::from(1337);
        let shares = scheme.generate_shares(&secret, rng).unwrap();
        assert_eq!(shares.len(), 10);
        assert_eq!(shares.secret_keys().len(), 10);

        for subset in combinations(10, 4) {
            let chosen: Vec<Share> = subset.iter().map(|&i| shares.share(i).unwrap()).collect();
            assert_eq!(scheme.recover_secret(&chosen).unwrap(), secret);
        }
    }

    #[test]
    fn public_keys_distinct_and_nonzero_test() {
        let rng = &mut StdRng::seed_from_u64(3);
        // n = p - 1 forces every nonzero element to be drawn
        let p = BigInt::from(13);
        let scheme = SecretSharingScheme::new(3, 12, p.clone()).unwrap();
        let shares = scheme.generate_shares(&BigInt::from(5), rng).unwrap();
        let mut keys = shares.public_keys().to_vec();
        keys.sort();
        let expected: Vec<BigInt> = (1..13i32).map(BigInt::from).collect();
        assert_eq!(keys, expected);

        let chosen = shares.choose(rng);
        assert_eq!(scheme.recover_secret(&chosen).unwrap(), BigInt::from(5));
    }

    #[test]
    fn threshold_one_test() {
        let rng = &mut StdRng::seed_from_u64(11);
        let secret = BigInt::from(424242);
        let shares = SecretSharingScheme::with_default_prime(1, 5)
            .unwrap()
            .generate_shares(&secret, rng)
            .unwrap();
        for y in shares.secret_keys() {
            assert_eq!(y, &secret);
        }
    }

    #[test]
    fn wrong_share_count_test() {
        let rng = &mut StdRng::seed_from_u64(5);
        let scheme = SecretSharingScheme::with_default_prime(3, 5).unwrap();
        let shares: Vec<Share> = scheme.generate_shares(&BigInt::from(9), rng).unwrap().iter().collect();

        assert_eq!(
            scheme.recover_secret(&shares[..2]),
            Err(SecretSharingError::IncorrectShareCount { got: 2, need: 3 })
        );
        assert_eq!(
            recover_secret(&shares[..4], scheme.prime()),
            Err(SecretSharingError::IncorrectShareCount { got: 4, need: 3 })
        );
        assert_eq!(
            recover_secret(&[], scheme.prime()),
            Err(SecretSharingError::IncorrectShareCount { got: 0, need: 1 })
        );
    }

    #[test]
    fn duplicate_public_key_test() {
        let p = BigInt::from(1613);
        let shares = shares_of(&[(1, 1494), (2, 329), (1, 1494)], 3);
        assert_eq!(
            recover_secret(&shares, &p),
            Err(SecretSharingError::DegenerateShareSet { public_key: BigInt::one() })
        );
        // equal modulo p
        let shares = shares_of(&[(2, 329), (1615, 7)], 2);
        assert_eq!(
            recover_secret(&shares, &p),
            Err(SecretSharingError::DegenerateShareSet { public_key: BigInt::from(2) })
        );
    }

    #[test]
    fn inconsistent_threshold_test() {
        let p = BigInt::from(1613);
        let mut shares = shares_of(&[(1, 1494), (2, 329), (3, 965)], 3);
        shares[1].threshold = 2;
        assert_eq!(recover_secret(&shares, &p), Err(SecretSharingError::InconsistentShares));
    }

    #[test]
    fn invalid_parameters_test() {
        let p = default_prime();
        assert!(matches!(
            SecretSharingScheme::new(0, 3, p.clone()),
            Err(SecretSharingError::InvalidParameters(_))
        ));
        assert!(matches!(
            SecretSharingScheme::new(4, 3, p.clone()),
            Err(SecretSharingError::InvalidParameters(_))
        ));
        assert!(matches!(
            SecretSharingScheme::new(1, 1, BigInt::one()),
            Err(SecretSharingError::InvalidParameters(_))
        ));
        assert!(matches!(
            SecretSharingScheme::new(2, 13, BigInt::from(13)),
            Err(SecretSharingError::InvalidParameters(_))
        ));

        let rng = &mut StdRng::seed_from_u64(0);
        let scheme = SecretSharingScheme::new(2, 3, BigInt::from(13)).unwrap();
        assert!(scheme.generate_shares(&BigInt::from(13), rng).is_err());
        assert!(scheme.generate_shares(&BigInt::from(-1), rng).is_err());
    }
}
