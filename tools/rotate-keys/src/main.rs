//! Rotate one secret in a dotenv-style file.
//!
//! Generates a fresh random hex value for `--key`, replaces the existing
//! `KEY=...` line (or appends one), and keeps the previous file as
//! `<env-file>.bak`. Both files are written through a temp file in the same
//! directory and keep the original's permissions. The new secret is never
//! logged.

use std::fs::{self, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::OsRng;
use rand::RngCore;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shamba-rotate-keys", about = "Rotate a secret in an env file")]
struct Cli {
    /// Env file to update.
    #[arg(long)]
    env_file: PathBuf,

    /// Variable name to rotate (e.g. SESSION_SECRET).
    #[arg(long)]
    key: String,

    /// Random bytes in the new secret; the value is hex, so twice as many characters.
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u16).range(16..=256))]
    bytes: u16,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
}

/// Outcome of rewriting the env file contents.
#[derive(Debug, PartialEq, Eq)]
struct Rotation {
    contents: String,
    /// Number of existing assignments that were replaced; 0 means appended.
    replaced: usize,
}

fn validate_key(key: &str) -> Result<()> {
    let mut chars = key.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("invalid variable name {key:?}: use letters, digits and underscores");
    }
    Ok(())
}

fn generate_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Name assigned by a line, accepting an optional `export ` prefix.
/// Comments and blank lines assign nothing.
fn assigned_name(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (name, _) = line.split_once('=')?;
    Some(name.trim())
}

/// Rewrites `contents`, keeping CRLF line endings when the file uses them.
fn rotate(contents: &str, key: &str, secret: &str) -> Rotation {
    let eol = if contents.contains("\r\n") { "\r\n" } else { "\n" };
    let mut replaced = 0;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            if assigned_name(line) == Some(key) {
                replaced += 1;
                let export = if line.trim_start().starts_with("export ") {
                    "export "
                } else {
                    ""
                };
                format!("{export}{key}={secret}")
            } else {
                line.to_string()
            }
        })
        .collect();
    if replaced == 0 {
        lines.push(format!("{key}={secret}"));
    }
    let mut contents = lines.join(eol);
    contents.push_str(eol);
    Rotation { contents, replaced }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Writes `contents` to a temp file next to `path`, applies `permissions`,
/// then renames it into place. New files keep the temp file's owner-only mode.
fn replace_file(path: &Path, contents: &str, permissions: Option<Permissions>) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing temp file for {}", path.display()))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("setting permissions for {}", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

fn run(cli: &Cli, secret: &str) -> Result<Rotation> {
    validate_key(&cli.key)?;
    let existing = read_existing(&cli.env_file)?;
    let rotation = rotate(existing.as_deref().unwrap_or_default(), &cli.key, secret);

    if cli.dry_run {
        tracing::info!(
            path = %cli.env_file.display(),
            key = %cli.key,
            replaced = rotation.replaced,
            "Dry run, nothing written"
        );
        return Ok(rotation);
    }

    let permissions = match &existing {
        Some(previous) => {
            let permissions = fs::metadata(&cli.env_file)
                .with_context(|| format!("reading metadata of {}", cli.env_file.display()))?
                .permissions();
            let backup = backup_path(&cli.env_file);
            replace_file(&backup, previous, Some(permissions.clone()))?;
            tracing::debug!(backup = %backup.display(), "Backup written");
            Some(permissions)
        }
        None => {
            tracing::warn!(path = %cli.env_file.display(), "Env file missing, creating it");
            None
        }
    };
    replace_file(&cli.env_file, &rotation.contents, permissions)?;

    tracing::info!(
        path = %cli.env_file.display(),
        key = %cli.key,
        replaced = rotation.replaced,
        "Secret rotated"
    );
    Ok(rotation)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let secret = generate_secret(usize::from(cli.bytes));
    run(&cli, &secret)?;
    Ok(())
}
