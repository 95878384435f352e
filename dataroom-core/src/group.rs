//! A narrow capability set over a prime-order group, so the cryptographic
//! protocol in [`crate::manifest`] and [`crate::rotation`] never depends
//! directly on `curve25519-dalek`'s types.
//!
//! The only implementation shipped here is Ristretto255, which has prime
//! order: every non-zero scalar is invertible and there is no small
//! subgroup to fall into.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use rand_core::OsRng;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Canonical byte length of both scalars and elements in Ristretto255.
pub const ENCODED_LEN: usize = 32;

/// A scalar in the group's prime-order field.
///
/// Not `Copy`: it carries a `Drop` impl that zeroizes on scrub, and a
/// bitwise-copyable secret would defeat that.
#[derive(Clone)]
pub struct Scalar(pub(crate) DalekScalar);

/// An element of the group.
#[derive(Clone, Copy)]
pub struct Element(pub(crate) RistrettoPoint);

impl Scalar {
    /// Sample a uniformly random scalar.
    pub fn random() -> Self {
        Scalar(DalekScalar::random(&mut OsRng))
    }

    /// `true` iff this scalar is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&DalekScalar::ZERO).into()
    }

    /// Multiplicative inverse. Callers must reject zero scalars beforehand;
    /// the group has prime order so every non-zero scalar is invertible.
    pub fn invert(&self) -> Scalar {
        Scalar(self.0.invert())
    }

    pub fn mul(&self, other: &Scalar) -> Scalar {
        Scalar(self.0 * other.0)
    }

    /// `g * self`, i.e. scalar multiplication of the generator.
    pub fn mul_gen(&self) -> Element {
        Element(&self.0 * RISTRETTO_BASEPOINT_TABLE)
    }

    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        self.0.to_bytes()
    }

    /// Decode a canonical scalar encoding, rejecting any value that is not
    /// the unique canonical representative of its residue class.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; ENCODED_LEN] = bytes
            .try_into()
            .map_err(|_| Error::Format(format!("scalar must be {ENCODED_LEN} bytes")))?;
        let scalar = DalekScalar::from_canonical_bytes(arr);
        if scalar.is_some().into() {
            Ok(Scalar(scalar.unwrap()))
        } else {
            Err(Error::Format("non-canonical scalar encoding".into()))
        }
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Element {
    /// Scalar multiplication: `self * scalar`.
    pub fn mul(&self, scalar: &Scalar) -> Element {
        Element(self.0 * scalar.0)
    }

    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        self.0.compress().to_bytes()
    }

    /// Decode a canonical element encoding, rejecting non-canonical or
    /// off-curve (not-in-the-Ristretto-subgroup) inputs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; ENCODED_LEN] = bytes
            .try_into()
            .map_err(|_| Error::Format(format!("element must be {ENCODED_LEN} bytes")))?;
        let compressed = CompressedRistretto(arr);
        compressed
            .decompress()
            .map(Element)
            .ok_or_else(|| Error::Format("invalid or non-canonical group element".into()))
    }
}

/// The capability set [`crate::manifest`] and [`crate::rotation`] are
/// written against: sampling, zero-check, inversion, the two scalar
/// multiplications, and canonical encode/decode for both scalars and
/// elements. A different prime-order group could be dropped in by
/// implementing this trait without touching the protocol layers above it.
pub trait PrimeOrderGroup {
    type Scalar: Clone;
    type Element: Clone;

    fn random_scalar() -> Self::Scalar;
    fn scalar_is_zero(scalar: &Self::Scalar) -> bool;
    fn invert(scalar: &Self::Scalar) -> Self::Scalar;
    fn mul_scalars(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn mul_gen(scalar: &Self::Scalar) -> Self::Element;
    fn mul_element(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element;
    fn scalar_to_bytes(scalar: &Self::Scalar) -> [u8; ENCODED_LEN];
    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar>;
    fn element_to_bytes(element: &Self::Element) -> [u8; ENCODED_LEN];
    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element>;
}

/// Ristretto255: a prime-order group, so every non-zero scalar is
/// invertible and there is no small subgroup to fall into. The only
/// implementation of [`PrimeOrderGroup`] this crate ships.
pub struct Ristretto255;

impl PrimeOrderGroup for Ristretto255 {
    type Scalar = Scalar;
    type Element = Element;

    fn random_scalar() -> Scalar {
        Scalar::random()
    }

    fn scalar_is_zero(scalar: &Scalar) -> bool {
        scalar.is_zero()
    }

    fn invert(scalar: &Scalar) -> Scalar {
        scalar.invert()
    }

    fn mul_scalars(a: &Scalar, b: &Scalar) -> Scalar {
        a.mul(b)
    }

    fn mul_gen(scalar: &Scalar) -> Element {
        scalar.mul_gen()
    }

    fn mul_element(element: &Element, scalar: &Scalar) -> Element {
        element.mul(scalar)
    }

    fn scalar_to_bytes(scalar: &Scalar) -> [u8; ENCODED_LEN] {
        scalar.to_bytes()
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar> {
        Scalar::from_bytes(bytes)
    }

    fn element_to_bytes(element: &Element) -> [u8; ENCODED_LEN] {
        element.to_bytes()
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Element> {
        Element::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_scalar_is_detected() {
        assert!(!Scalar::random().is_zero());
    }

    #[test]
    fn scalar_roundtrips_through_canonical_bytes() {
        let s = Scalar::random();
        let bytes = s.to_bytes();
        let s2 = Scalar::from_bytes(&bytes).unwrap();
        assert_eq!(s.to_bytes(), s2.to_bytes());
    }

    #[test]
    fn element_roundtrips_through_canonical_bytes() {
        let e = Scalar::random().mul_gen();
        let bytes = e.to_bytes();
        let e2 = Element::from_bytes(&bytes).unwrap();
        assert_eq!(e.to_bytes(), e2.to_bytes());
    }

    #[test]
    fn non_canonical_element_encoding_is_rejected() {
        // All-0xff is not a valid Ristretto255 encoding.
        let bytes = [0xffu8; ENCODED_LEN];
        assert!(Element::from_bytes(&bytes).is_err());
    }

    #[test]
    fn inverse_undoes_multiplication() {
        let a = Scalar::random();
        let b = Scalar::random();
        let inv_b = b.invert();
        let product = a.mul(&b).mul(&inv_b);
        assert_eq!(product.to_bytes(), a.to_bytes());
    }

    #[test]
    fn shared_element_is_stable_under_rotation_factor() {
        // E = g*e ; K = E*s. f = s*s'^-1. E' = E*f. Then E'*s' == E*s.
        let e = Scalar::random();
        let encap = e.mul_gen();
        let s = Scalar::random();
        let s_new = Scalar::random();

        let shared_before = encap.mul(&s);

        let factor = s.mul(&s_new.invert());
        let encap_new = encap.mul(&factor);
        let shared_after = encap_new.mul(&s_new);

        assert_eq!(shared_before.to_bytes(), shared_after.to_bytes());
    }

    #[test]
    fn rotation_is_stable_through_the_trait_interface() {
        fn rotation_holds<G: PrimeOrderGroup>() {
            let e = G::random_scalar();
            let encap = G::mul_gen(&e);
            let s = G::random_scalar();
            let s_new = G::random_scalar();

            let shared_before = G::mul_element(&encap, &s);

            let factor = G::mul_scalars(&s, &G::invert(&s_new));
            let encap_new = G::mul_element(&encap, &factor);
            let shared_after = G::mul_element(&encap_new, &s_new);

            assert_eq!(
                G::element_to_bytes(&shared_before),
                G::element_to_bytes(&shared_after)
            );
        }

        rotation_holds::<Ristretto255>();
    }
}
