//! Non-interactive master-secret rotation. `key_rotate` runs where the
//! owner's secret lives; `rekey` runs wherever the dataroom lives, with no
//! secrets in scope at all.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::group::{Element, Scalar};
use crate::layout::{encap_path, factor_path, read_secret_key, write_secret_key};

/// Owner side: replace `s` with a fresh `s'`, and publish the factor
/// `f = s * s'^-1` that lets a dataroom-only party transform `E` so that
/// `s'` reproduces the same shared element `E*s`.
///
/// The caller's `s` is consumed and zeroized; it is never written anywhere.
pub fn key_rotate(secret_key_path: &Path, dataroom: &Path) -> Result<()> {
    let old_secret = read_secret_key(secret_key_path)?;

    let new_secret = loop {
        let candidate = Scalar::random();
        if !candidate.is_zero() {
            break candidate;
        }
    };

    let factor = old_secret.mul(&new_secret.invert());

    write_secret_key(secret_key_path, &new_secret)?;
    crate::layout::atomic_write(&factor_path(dataroom), &factor.to_bytes())?;

    info!(dataroom = %dataroom.display(), "key rotation staged; run rekey to apply the factor");
    Ok(())
}

/// Dataroom side: apply the published factor to `E`, then delete it.
/// `.meta/factor` is removed only after `.meta/encap` has been
/// successfully overwritten, so a crash mid-operation always leaves the
/// factor recoverable rather than silently discarded.
pub fn rekey(dataroom: &Path) -> Result<()> {
    let encap_bytes = fs::read(encap_path(dataroom))?;
    let encap = Element::from_bytes(&encap_bytes)?;

    let factor_bytes = fs::read(factor_path(dataroom))
        .map_err(|_| Error::NotFound(".meta/factor".to_string()))?;
    let factor = Scalar::from_bytes(&factor_bytes)?;

    let rotated = encap.mul(&factor);
    crate::layout::atomic_write(&encap_path(dataroom), &rotated.to_bytes())?;

    fs::remove_file(factor_path(dataroom))?;
    info!(dataroom = %dataroom.display(), "rekey applied, factor discarded");
    Ok(())
}
