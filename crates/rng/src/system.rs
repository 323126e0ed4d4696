//! Provide entropy from the operating system.

/// Returns a random `u64` value.
///
/// # Remarks
///
/// If the operating system fails to provide entropy, the returned value is derived from the
/// current time instead.
pub fn entropy() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_ne_bytes(bytes),
        Err(_) => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    }
}
