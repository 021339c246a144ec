pub mod digest;

pub use digest::{content_hash, hash_bytes, CHUNK_SIZE};
