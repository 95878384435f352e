//! Black-box exercises of the public API, covering the scenarios from
//! the spec's testable-properties section.

use dataroom_core::error::Error;
use dataroom_core::layout::{self, factor_path, filekeys_path};
use dataroom_core::{create_dataroom, download, key_rotate, list, rekey, upload};
use tempfile::tempdir;

fn new_room(base: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let dataroom = base.join("room");
    let keyfile = base.join("secretkey");
    create_dataroom(&dataroom, &keyfile).unwrap();
    (dataroom, keyfile)
}

#[test]
fn s1_fresh_dataroom_has_empty_listing_and_expected_sizes() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();

    assert!(list(&secret, &dataroom).unwrap().is_empty());
    assert_eq!(std::fs::metadata(layout::encap_path(&dataroom)).unwrap().len(), 32);
    assert!(filekeys_path(&dataroom).is_file());
}

#[test]
fn s2_and_s3_upload_then_download_round_trips() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();

    upload(&secret, &dataroom, "hello.txt", b"hi").unwrap();
    assert_eq!(list(&secret, &dataroom).unwrap(), vec!["hello.txt".to_string()]);

    let blob_count = std::fs::read_dir(&dataroom)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_name() != ".meta")
        .count();
    assert_eq!(blob_count, 1);

    let dest = tempdir().unwrap();
    download(&secret, &dataroom, "hello.txt", dest.path()).unwrap();
    assert_eq!(std::fs::read(dest.path().join("hello.txt")).unwrap(), b"hi");
}

#[test]
fn s4_rotation_is_transparent_to_list_and_download() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();
    upload(&secret, &dataroom, "hello.txt", b"hi").unwrap();

    let before_key_contents = std::fs::read_to_string(&keyfile).unwrap();

    key_rotate(&keyfile, &dataroom).unwrap();
    assert!(factor_path(&dataroom).is_file());
    assert_ne!(std::fs::read_to_string(&keyfile).unwrap(), before_key_contents);

    let encap_before = std::fs::read(layout::encap_path(&dataroom)).unwrap();
    rekey(&dataroom).unwrap();
    assert!(!factor_path(&dataroom).exists());
    assert_ne!(std::fs::read(layout::encap_path(&dataroom)).unwrap(), encap_before);

    let new_secret = layout::read_secret_key(&keyfile).unwrap();
    assert_eq!(list(&new_secret, &dataroom).unwrap(), vec!["hello.txt".to_string()]);

    let dest = tempdir().unwrap();
    download(&new_secret, &dataroom, "hello.txt", dest.path()).unwrap();
    assert_eq!(std::fs::read(dest.path().join("hello.txt")).unwrap(), b"hi");
}

#[test]
fn s5_bit_flip_in_one_blob_never_lets_both_downloads_succeed() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();
    upload(&secret, &dataroom, "a.txt", b"aaaa").unwrap();
    upload(&secret, &dataroom, "b.txt", b"bbbb").unwrap();

    let manifest = dataroom_core::manifest::open(&secret, &dataroom).unwrap();
    let (_, name_a) = manifest.keys.get("a.txt").unwrap().clone();
    let mut blob_a = std::fs::read(dataroom.join(&name_a)).unwrap();
    *blob_a.last_mut().unwrap() ^= 0xff;
    std::fs::write(dataroom.join(&name_a), &blob_a).unwrap();

    let dest = tempdir().unwrap();
    let a_ok = download(&secret, &dataroom, "a.txt", dest.path()).is_ok();
    let b_ok = download(&secret, &dataroom, "b.txt", dest.path()).is_ok();
    assert!(!(a_ok && b_ok));
}

#[test]
fn s6_duplicate_upload_name_is_refused_without_mutating_filekeys() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();
    upload(&secret, &dataroom, "hello.txt", b"hi").unwrap();

    let before = std::fs::read(filekeys_path(&dataroom)).unwrap();
    let err = upload(&secret, &dataroom, "hello.txt", b"again").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    let after = std::fs::read(filekeys_path(&dataroom)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn operations_refuse_while_a_rotation_factor_is_unapplied() {
    let dir = tempdir().unwrap();
    let (dataroom, keyfile) = new_room(dir.path());
    let secret = layout::read_secret_key(&keyfile).unwrap();
    upload(&secret, &dataroom, "hello.txt", b"hi").unwrap();
    key_rotate(&keyfile, &dataroom).unwrap();

    let new_secret = layout::read_secret_key(&keyfile).unwrap();
    assert!(matches!(
        list(&new_secret, &dataroom),
        Err(Error::StaleFactor)
    ));

    rekey(&dataroom).unwrap();
    assert!(list(&new_secret, &dataroom).is_ok());
}
