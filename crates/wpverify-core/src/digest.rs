//! MD5 content digests.
//!
//! MD5 matches the digests published next to the upstream archives; it is
//! used for equality checks only.

use md5::Digest;
use md5::Md5;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

/// Digest of empty content.
pub const EMPTY_DIGEST: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Returns the lowercase hex MD5 digest of `data`.
///
/// # Examples
///
/// ```
/// use wpverify_core::digest::digest_bytes;
///
/// assert_eq!(digest_bytes(b"hello"), "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn digest_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Returns the digest of everything readable from `reader`.
///
/// # Errors
///
/// Returns any error raised while reading.
pub fn digest_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Md5::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Returns the digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    digest_reader(&mut file)
}

/// Extracts the digest from the content of a `.md5` manifest.
///
/// Manifests hold the hex digest, possibly followed by a file name or a
/// newline. The result is lowercased so it compares with [`digest_bytes`].
#[must_use]
pub fn parse_manifest(content: &str) -> Option<String> {
    content
        .split_whitespace()
        .next()
        .map(str::to_ascii_lowercase)
}
