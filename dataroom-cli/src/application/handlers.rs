use std::fs;
use std::path::{Path, PathBuf};

use dataroom_core::error::{Error, Result};
use dataroom_core::layout::{encap_path, factor_path, meta_dir, read_secret_key};

pub fn handle_mkdr(secret_key: &Path, dataroom: &Path) -> Result<()> {
    if dataroom.exists() {
        return Err(Error::AlreadyExists(dataroom.display().to_string()));
    }
    if secret_key.exists() {
        return Err(Error::AlreadyExists(secret_key.display().to_string()));
    }
    dataroom_core::create_dataroom(dataroom, secret_key)
}

pub fn handle_upload(secret_key: &Path, file: &Path, dataroom: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(Error::NotFound(file.display().to_string()));
    }
    if !dataroom.is_dir() {
        return Err(Error::NotFound(dataroom.display().to_string()));
    }

    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Format(format!("{} has no file name", file.display())))?;
    let bytes = fs::read(file)?;

    let secret = read_secret_key(secret_key)?;
    dataroom_core::upload(&secret, dataroom, name, &bytes)
}

pub fn handle_ls(secret_key: &Path, dataroom: &Path) -> Result<()> {
    if !dataroom.is_dir() {
        return Err(Error::NotFound(dataroom.display().to_string()));
    }

    let secret = read_secret_key(secret_key)?;
    for name in dataroom_core::list(&secret, dataroom)? {
        println!("{name}");
    }
    Ok(())
}

/// `file` is `<dataroom>/<plaintext file name>`; the dataroom is its parent.
pub fn handle_download(secret_key: &Path, file: &Path, dest: &Path) -> Result<()> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Format(format!("{} has no file name", file.display())))?
        .to_string();
    let dataroom: PathBuf = match file.parent() {
        Some(p) if p != Path::new("") => p.to_path_buf(),
        _ => return Err(Error::Format("use a valid dataroom path".into())),
    };

    if !dest.is_dir() {
        return Err(Error::NotFound(dest.display().to_string()));
    }
    if !dataroom.is_dir() {
        return Err(Error::NotFound(dataroom.display().to_string()));
    }

    let secret = read_secret_key(secret_key)?;
    dataroom_core::download(&secret, &dataroom, &name, dest)
}

pub fn handle_keyrotate(secret_key: &Path, dataroom: &Path) -> Result<()> {
    if !meta_dir(dataroom).is_dir() {
        return Err(Error::NotFound(format!("{}", meta_dir(dataroom).display())));
    }
    dataroom_core::key_rotate(secret_key, dataroom)
}

pub fn handle_rekey(dataroom: &Path) -> Result<()> {
    if !factor_path(dataroom).is_file() {
        return Err(Error::NotFound(format!("{}", factor_path(dataroom).display())));
    }
    if !encap_path(dataroom).is_file() {
        return Err(Error::NotFound(format!("{}", encap_path(dataroom).display())));
    }
    dataroom_core::rekey(dataroom)
}
