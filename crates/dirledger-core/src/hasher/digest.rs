use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read size for streaming a file through the hasher.
pub const CHUNK_SIZE: usize = 4096;

/// BLAKE3 digest of a file's bytes as 64 lowercase hex characters.
///
/// The file is streamed in `CHUNK_SIZE` reads so memory use does not depend
/// on file size. Read errors are returned to the caller as-is.
pub fn content_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
