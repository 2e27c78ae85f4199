use xxhash_rust::xxh3::Xxh3;

use crate::composition::model::{Element, ElementKind};

const XXH3_SEED: u64 = 0x5e3a_91c4_d27b_08f6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Identity of an element's runtime state: its type and its sources, in order.
///
/// Two elements with equal signatures can share one sequencer; anything else about them
/// (durations, flags, volume) is applied to the running sequencer in place.
pub struct ContentSignature {
    pub hi: u64,
    pub lo: u64,
}

/// Signature of an element that owns a sequencer; `None` for elements without runtime state.
pub fn signature_of(element: &Element) -> Option<ContentSignature> {
    let mut h = StableHasher::new();
    h.write_str(element.element_type().as_str());
    match &element.kind {
        ElementKind::Image(c) => h.write_str(&c.src),
        ElementKind::Slideshow(c) => {
            h.write_u64(c.images.len() as u64);
            for slide in &c.images {
                h.write_str(&slide.src);
            }
        }
        ElementKind::Video(c) => {
            let playlist = c.playlist();
            h.write_u64(playlist.len() as u64);
            for src in playlist {
                h.write_str(src);
            }
        }
        ElementKind::Audio(c) => h.write_str(&c.src),
        ElementKind::Ticker(_) | ElementKind::Text(_) => return None,
    }
    Some(h.finish())
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    // Length prefix keeps ["ab", "c"] and ["a", "bc"] apart.
    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> ContentSignature {
        let v = self.inner.digest128();
        ContentSignature {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/signature.rs"]
mod tests;
