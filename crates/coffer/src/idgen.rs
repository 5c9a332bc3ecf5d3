//! Random group-id generation.
//!
//! Ids are short lowercase-alphanumeric names, assigned when the caller
//! creates a group without supplying one.

use coffer_core::GroupId;
use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random id of `len` characters.
pub(crate) fn generate_id(len: usize) -> GroupId {
    let mut rng = rand::thread_rng();
    let name: String = (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    GroupId::new(name)
}
