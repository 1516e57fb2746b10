//! Byte-level UTF-8 validation and length-bounded percent-encoding.
//!
//! Both routines walk raw bytes rather than `char`s: the validator accepts the
//! legacy 5- and 6-byte forms that `std::str::from_utf8` rejects, and the
//! encoder must count output in units while never splitting a character.

/// Returns `true` when `bytes` is well-formed UTF-8, including the legacy
/// 5- and 6-byte sequences.
pub fn seems_utf8(bytes: &[u8]) -> bool {
    let mut iter = bytes.iter();
    while let Some(&lead) = iter.next() {
        let continuation = match lead {
            b if b < 0x80 => 0,
            b if b & 0xE0 == 0xC0 => 1,
            b if b & 0xF0 == 0xE0 => 2,
            b if b & 0xF8 == 0xF0 => 3,
            b if b & 0xFC == 0xF8 => 4,
            b if b & 0xFE == 0xFC => 5,
            _ => return false,
        };
        for _ in 0..continuation {
            match iter.next() {
                Some(&b) if b & 0xC0 == 0x80 => {}
                _ => return false,
            }
        }
    }
    true
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Percent-encodes every non-ASCII byte of `bytes` as a lowercase `%xx`
/// triplet, leaving ASCII untouched.
///
/// `max_units` bounds the output: each ASCII byte costs one unit and each
/// byte of a multi-byte character costs three. A character whose triplets
/// would not fit is dropped whole and encoding stops there. `0` disables the
/// bound.
pub fn utf8_uri_encode(bytes: &[u8], max_units: usize) -> String {
    let bounded = max_units > 0;
    let mut out = String::with_capacity(bytes.len());
    let mut pending: Vec<u8> = Vec::with_capacity(4);
    let mut octets = 1usize;
    let mut units = 0usize;

    for &byte in bytes {
        if byte < 0x80 {
            if bounded && units >= max_units {
                break;
            }
            out.push(char::from(byte));
            units += 1;
            continue;
        }

        // The lead byte fixes the width of the whole character.
        if pending.is_empty() {
            octets = match byte {
                b if b < 0xE0 => 2,
                b if b < 0xF0 => 3,
                _ => 4,
            };
        }
        pending.push(byte);
        if bounded && units + octets * 3 > max_units {
            break;
        }

        if pending.len() == octets {
            for b in pending.drain(..) {
                push_triplet(&mut out, b);
            }
            units += octets * 3;
            octets = 1;
        }
    }
    out
}

fn push_triplet(out: &mut String, byte: u8) {
    out.push('%');
    out.push(char::from(HEX[usize::from(byte >> 4)]));
    out.push(char::from(HEX[usize::from(byte & 0x0F)]));
}
