//! # Keystore
//!
//! Loads the fee payer's key material, or generates a fresh keypair and
//! persists it so later runs reuse the same identity.
//!
//! Two on-disk formats are understood:
//! - a dotenv line `PRIVATE_KEY=[12,34,...]` (the byte array of the 64-byte
//!   secret key; a base58 string is accepted as well)
//! - a JSON byte-array keypair file, as written by `solana-keygen`

use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use solana_sdk::signature::{Keypair, Signer};

use crate::error::{Error, Result};

/// Where key material is read from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    EnvFile { path: PathBuf, var: String },
    KeypairFile(PathBuf),
}

/// Load the keypair from `source`, generating and persisting one if absent.
///
/// Present-but-invalid key material is an error; it is never overwritten.
pub fn load_or_generate(source: &KeySource) -> Result<Keypair> {
    match source {
        KeySource::EnvFile { path, var } => {
            if let Some(secret) = lookup_env_secret(path, var)? {
                let keypair = parse_keypair(&secret)?;
                tracing::debug!("Loaded keypair {} from {}", keypair.pubkey(), var);
                return Ok(keypair);
            }

            tracing::info!("Generating new keypair... 🔑");
            let keypair = Keypair::new();
            append_env_secret(path, var, &keypair)?;
            tracing::info!("Saved {} to {}", var, path.display());
            Ok(keypair)
        }
        KeySource::KeypairFile(path) => {
            if path.exists() {
                let contents = fs::read_to_string(path)?;
                let keypair = parse_keypair(&contents)?;
                tracing::debug!("Loaded keypair {} from {}", keypair.pubkey(), path.display());
                return Ok(keypair);
            }

            tracing::info!("Generating new keypair... 🔑");
            let keypair = Keypair::new();
            write_keypair_file(path, &keypair)?;
            tracing::info!("Saved keypair to {}", path.display());
            Ok(keypair)
        }
    }
}

/// Parse key material given either as a JSON byte array or as base58.
pub fn parse_keypair(secret: &str) -> Result<Keypair> {
    let secret = secret.trim();
    let bytes = if secret.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(secret)
            .map_err(|e| Error::InvalidKey(format!("not a byte array: {}", e)))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| Error::InvalidKey(format!("not base58: {}", e)))?
    };

    Keypair::from_bytes(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))
}

/// Encode a keypair the way it is stored on disk.
pub fn encode_keypair(keypair: &Keypair) -> String {
    let bytes: Vec<u8> = keypair.to_bytes().to_vec();
    // Vec<u8> always serializes
    serde_json::to_string(&bytes).unwrap_or_default()
}

fn lookup_env_secret(path: &Path, var: &str) -> Result<Option<String>> {
    if let Ok(value) = env::var(var) {
        return Ok(Some(value));
    }
    if !path.exists() {
        return Ok(None);
    }

    let entries = dotenv::from_path_iter(path)
        .map_err(|e| Error::InvalidKey(format!("unreadable env file {}: {}", path.display(), e)))?;
    for entry in entries {
        let (key, value) =
            entry.map_err(|e| Error::InvalidKey(format!("malformed env file {}: {}", path.display(), e)))?;
        if key == var {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn append_env_secret(path: &Path, var: &str, keypair: &Keypair) -> Result<()> {
    let needs_newline = fs::read(path)
        .map(|existing| !existing.is_empty() && !existing.ends_with(b"\n"))
        .unwrap_or(false);

    let mut file = secret_file_options().create(true).append(true).open(path)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{}={}", var, encode_keypair(keypair))?;
    Ok(())
}

fn write_keypair_file(path: &Path, keypair: &Keypair) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = secret_file_options().write(true).create_new(true).open(path)?;
    file.write_all(encode_keypair(keypair).as_bytes())?;
    Ok(())
}

/// Files holding key material are created readable by the owner only.
fn secret_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}
