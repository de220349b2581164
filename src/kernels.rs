//! Pure numeric kernels behind the computation endpoint.
//!
//! Every function here is total and side-effect-free. Range enforcement
//! (e.g. the fibonacci 0..=200 window) belongs to the request parser, not
//! to the kernels. Fibonacci terms and lcm reductions grow past any fixed
//! integer width, so those run on `num_bigint` and are serialized as exact
//! JSON integers by the HTTP layer.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

/// First `n` terms of the Fibonacci sequence, starting `0, 1, 1, 2, ...`.
///
/// `n = 0` yields an empty vector. O(n) time and space.
pub fn fibonacci_series(n: u32) -> Vec<BigUint> {
    let mut out = Vec::with_capacity(n as usize);
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..n {
        out.push(a.clone());
        let next = &a + &b;
        a = b;
        b = next;
    }
    out
}

/// Primality by 6k±1 trial division up to sqrt(num).
///
/// Negative numbers, 0 and 1 are not prime.
pub fn is_prime(num: i64) -> bool {
    if num <= 1 {
        return false;
    }
    if num <= 3 {
        return true;
    }
    if num % 2 == 0 || num % 3 == 0 {
        return false;
    }
    let mut i: i64 = 5;
    while i.saturating_mul(i) <= num {
        if num % i == 0 || num % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Euclidean gcd on absolute values. `gcd(0, 0) = 0`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut x = a.abs();
    let mut y = b.abs();
    while !y.is_zero() {
        let t = &x % &y;
        x = y;
        y = t;
    }
    x
}

/// Least common multiple; 0 if either operand is 0.
///
/// The zero rule is explicit, the division below would otherwise have a
/// zero divisor.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    (a * b).abs() / gcd(a, b)
}

/// Left-to-right gcd fold. A singleton array returns its element unchanged,
/// sign included; an empty slice folds to 0.
pub fn reduce_hcf(nums: &[i64]) -> BigInt {
    let mut terms = nums.iter().map(|&n| BigInt::from(n));
    let first = terms.next().unwrap_or_else(BigInt::zero);
    terms.fold(first, |acc, n| gcd(&acc, &n))
}

/// Left-to-right lcm fold. Same singleton/empty conventions as
/// [`reduce_hcf`].
pub fn reduce_lcm(nums: &[i64]) -> BigInt {
    let mut terms = nums.iter().map(|&n| BigInt::from(n));
    let first = terms.next().unwrap_or_else(BigInt::zero);
    terms.fold(first, |acc, n| lcm(&acc, &n))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
