//! Firmware identification blob.
//!
//! A constant byte string kept in its own section so a flash dump can be
//! identified offline with `strings`; no runtime code reads it. The demo
//! linker scripts `KEEP` the section.

const BUILD_ID_TEXT: &str = concat!(
    "FWID\n",
    "crate=",
    env!("CARGO_PKG_NAME"),
    "\n",
    "version=",
    env!("CARGO_PKG_VERSION"),
    "\n",
);

const fn as_bytes<const N: usize>(text: &str) -> [u8; N] {
    let src = text.as_bytes();
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = src[i];
        i += 1;
    }
    out
}

/// The embedded identification blob.
#[link_section = ".build_id"]
#[used]
pub static BUILD_ID: [u8; BUILD_ID_TEXT.len()] = as_bytes(BUILD_ID_TEXT);

#[cfg(test)]
mod tests {
    use super::BUILD_ID;

    #[test]
    fn blob_is_tagged_for_strings() {
        assert!(BUILD_ID.starts_with(b"FWID\n"));
        // Must stay visible to `strings`: printable ASCII and newlines only.
        assert!(BUILD_ID
            .iter()
            .all(|&b| b == b'\n' || (0x20..0x7f).contains(&b)));
    }
}
