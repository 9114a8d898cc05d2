//! Fixed-size character chunking.
//!
//! Chunks are contiguous and non-overlapping, so concatenating them in order
//! reproduces the input exactly. Sizes are measured in characters, not bytes,
//! which keeps multi-byte text from being split mid-code-point.

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Smallest chunk size the upload form accepts.
pub const MIN_CHUNK_SIZE: usize = 300;
/// Largest chunk size the upload form accepts.
pub const MAX_CHUNK_SIZE: usize = 1000;

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// Every chunk except possibly the last has exactly `chunk_size` characters;
/// the last holds whatever remains. Empty input yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();

    chars
        .chunks(size)
        .map(|window| window.iter().collect())
        .collect()
}

/// Clamp a requested chunk size to the accepted range.
pub fn clamp_chunk_size(requested: usize) -> usize {
    requested.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}
