//! HMAC-SHA1 over NUL-separated fields.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Compute the lowercase hex HMAC-SHA1 of `fields`, keyed by `secret`.
///
/// Fields are fed in order with a single `0x00` byte between each pair. The
/// byte layout is part of the contract with Synapse, which recomputes the
/// digest on its side.
pub fn compute_mac(secret: &[u8], fields: &[&[u8]]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            mac.update(&[0]);
        }
        mac.update(field);
    }

    hex::encode(mac.finalize().into_bytes())
}
