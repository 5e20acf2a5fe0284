//! # Shamir Secret Sharing over GF(2^8)
//!
//! Splits a byte string into `n` shares such that any `threshold` of them
//! reconstruct it and fewer reveal nothing. Each byte is shared
//! independently with a random polynomial of degree `threshold - 1` over
//! GF(2^8) with the AES reduction polynomial `x^8 + x^4 + x^3 + x + 1`.
//!
//! Share x-coordinates are `1..=n`; zero is the secret's coordinate and is
//! never handed out.

use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

/// One share: its x-coordinate and one y-value per secret byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Share {
    /// Evaluation point, never zero.
    pub x: u8,
    /// Polynomial values at `x`, one per secret byte.
    pub y: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x)
            .field("y", &"[REDACTED]")
            .finish()
    }
}

/// Reasons share operations refuse their input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// `threshold` is zero or larger than `n`.
    #[error("threshold {threshold} invalid for {shares} shares")]
    BadThreshold {
        /// Requested threshold.
        threshold: u8,
        /// Requested share count.
        shares: u8,
    },
    /// No shares supplied.
    #[error("no shares")]
    Empty,
    /// Two shares share an x-coordinate, or one uses zero.
    #[error("invalid or duplicate share index {0}")]
    BadCoordinate(u8),
    /// Shares have different lengths.
    #[error("shares have different lengths")]
    LengthMismatch,
}

fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80;
        a <<= 1;
        if carry != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    product
}

/// Multiplicative inverse via `a^254`. Callers never pass zero.
fn gf_inv(a: u8) -> u8 {
    let mut result = 1u8;
    let mut base = a;
    let mut exp = 254u8;
    while exp > 0 {
        if exp & 1 != 0 {
            result = gf_mul(result, base);
        }
        base = gf_mul(base, base);
        exp >>= 1;
    }
    result
}

/// Horner evaluation; `coeffs[0]` is the constant term.
fn eval(coeffs: &[u8], x: u8) -> u8 {
    coeffs.iter().rev().fold(0u8, |acc, c| gf_mul(acc, x) ^ c)
}

/// Split `secret` into `shares` shares, any `threshold` of which recover it.
pub fn split<R: RngCore + CryptoRng>(
    secret: &[u8],
    threshold: u8,
    shares: u8,
    rng: &mut R,
) -> Result<Vec<Share>, ShareError> {
    if threshold == 0 || threshold > shares {
        return Err(ShareError::BadThreshold { threshold, shares });
    }
    let mut out: Vec<Share> = (1..=shares)
        .map(|x| Share {
            x,
            y: Zeroizing::new(Vec::with_capacity(secret.len())),
        })
        .collect();
    let mut coeffs = vec![0u8; threshold as usize];
    for &byte in secret {
        coeffs[0] = byte;
        rng.fill_bytes(&mut coeffs[1..]);
        for share in out.iter_mut() {
            share.y.push(eval(&coeffs, share.x));
        }
    }
    coeffs.zeroize();
    Ok(out)
}

/// Reconstruct the secret by Lagrange interpolation at zero.
///
/// Exactly the supplied shares are used; passing fewer than the threshold
/// yields garbage rather than an error, since the threshold is not encoded
/// in the shares themselves.
pub fn combine(shares: &[Share]) -> Result<Zeroizing<Vec<u8>>, ShareError> {
    let first = shares.first().ok_or(ShareError::Empty)?;
    let len = first.y.len();
    let mut seen = [false; 256];
    for share in shares {
        if share.x == 0 || seen[share.x as usize] {
            return Err(ShareError::BadCoordinate(share.x));
        }
        seen[share.x as usize] = true;
        if share.y.len() != len {
            return Err(ShareError::LengthMismatch);
        }
    }

    // Lagrange basis at 0: l_i = prod_{j != i} x_j / (x_j - x_i); subtraction is XOR.
    let basis: Vec<u8> = shares
        .iter()
        .map(|si| {
            shares
                .iter()
                .filter(|sj| sj.x != si.x)
                .fold(1u8, |acc, sj| gf_mul(acc, gf_mul(sj.x, gf_inv(sj.x ^ si.x))))
        })
        .collect();

    let mut secret = Zeroizing::new(vec![0u8; len]);
    for (share, l) in shares.iter().zip(&basis) {
        for (out, y) in secret.iter_mut().zip(share.y.iter()) {
            *out ^= gf_mul(*y, *l);
        }
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand_core::OsRng;

    #[test]
    fn share_errors_display_their_cause() {
        let err = ShareError::BadThreshold { threshold: 4, shares: 3 };
        assert_eq!(err.to_string(), "threshold 4 invalid for 3 shares");
        assert_eq!(ShareError::BadCoordinate(0).to_string(), "invalid or duplicate share index 0");
        let boxed: Box<dyn std::error::Error> = Box::new(ShareError::Empty);
        assert_eq!(boxed.to_string(), "no shares");
    }

    #[test]
    fn gf_inverse_is_inverse() {
        for a in 1..=255u8 {
            assert_eq!(gf_mul(a, gf_inv(a)), 1, "a = {a}");
        }
    }

    #[test]
    fn known_product() {
        // FIPS-197 §4.2 example: {57} • {83} = {c1}.
        assert_eq!(gf_mul(0x57, 0x83), 0xc1);
    }

    #[test]
    fn threshold_shares_recover_secret() {
        let secret = b"thirty-two bytes of data key!!!!";
        let shares = split(secret, 3, 5, &mut OsRng).unwrap();
        let recovered = combine(&[shares[4].clone(), shares[0].clone(), shares[2].clone()]).unwrap();
        assert_eq!(&recovered[..], secret);
    }

    #[test]
    fn fewer_shares_do_not_recover() {
        let secret = [0xAAu8; 32];
        let shares = split(&secret, 3, 5, &mut OsRng).unwrap();
        let partial = combine(&shares[..2]).unwrap();
        // With overwhelming probability two shares of a degree-2 polynomial miss.
        assert_ne!(&partial[..], &secret[..]);
    }

    #[test]
    fn one_of_one_is_identity_share() {
        let shares = split(b"abc", 1, 1, &mut OsRng).unwrap();
        assert_eq!(&shares[0].y[..], b"abc");
    }

    #[test]
    fn bad_threshold_rejected() {
        assert!(split(b"x", 0, 3, &mut OsRng).is_err());
        assert!(split(b"x", 4, 3, &mut OsRng).is_err());
    }

    #[test]
    fn duplicate_coordinates_rejected() {
        let shares = split(b"x", 2, 3, &mut OsRng).unwrap();
        assert_eq!(
            combine(&[shares[0].clone(), shares[0].clone()]),
            Err(ShareError::BadCoordinate(1))
        );
        assert_eq!(combine(&[]), Err(ShareError::Empty));
    }

    #[test]
    fn debug_hides_share_values() {
        let shares = split(b"secret", 1, 1, &mut OsRng).unwrap();
        assert!(format!("{:?}", shares[0]).contains("REDACTED"));
    }

    proptest! {
        #[test]
        fn any_threshold_subset_recovers(
            secret in proptest::collection::vec(any::<u8>(), 1..48),
            n in 1u8..8,
            t_seed in any::<u8>(),
            start in any::<u8>(),
        ) {
            let t = t_seed % n + 1;
            let shares = split(&secret, t, n, &mut OsRng).unwrap();
            let offset = (start % n) as usize;
            let subset: Vec<Share> = (0..t as usize)
                .map(|i| shares[(offset + i) % n as usize].clone())
                .collect();
            let recovered = combine(&subset).unwrap();
            prop_assert_eq!(&recovered[..], &secret[..]);
        }
    }
}
