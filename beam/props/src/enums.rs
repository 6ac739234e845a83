/*!
    Enumerated native constant families and their canonical names.
*/

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name reported for values a descriptor does not know.
pub const UNKNOWN_NAME: &str = "unknown";

/// Value reported for names a descriptor does not know. Lies outside every
/// native family.
pub const ENUM_UNKNOWN: i32 = -4242;

/**
    Bidirectional lookup between a family of native integer constants and
    their canonical names.

    Lookups never fail: unknown values map to [`UNKNOWN_NAME`] and unknown
    names map to [`ENUM_UNKNOWN`].
*/
#[derive(Debug)]
pub struct EnumDescriptor {
    family: &'static str,
    forward: HashMap<i32, &'static str>,
    inverse: HashMap<&'static str, i32>,
}

impl EnumDescriptor {
    /**
        Build a descriptor from `(value, name)` pairs.

        Values and names must each be unique, so both tables round-trip.
    */
    pub fn new(family: &'static str, entries: &[(i32, &'static str)]) -> Self {
        let forward = entries.iter().copied().collect::<HashMap<_, _>>();
        let inverse = entries
            .iter()
            .map(|&(value, name)| (name, value))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(forward.len(), entries.len(), "duplicate value in {family}");
        debug_assert_eq!(inverse.len(), entries.len(), "duplicate name in {family}");
        Self {
            family,
            forward,
            inverse,
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn to_name(&self, value: i32) -> &'static str {
        self.forward.get(&value).copied().unwrap_or(UNKNOWN_NAME)
    }

    pub fn to_value(&self, name: &str) -> i32 {
        self.inverse.get(name).copied().unwrap_or(ENUM_UNKNOWN)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.forward.contains_key(&value)
    }

    /**
        All `(value, name)` pairs, ordered by value.
    */
    pub fn entries(&self) -> Vec<(i32, &'static str)> {
        let mut entries = self
            .forward
            .iter()
            .map(|(v, n)| (*v, *n))
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(v, _)| *v);
        entries
    }
}

/// Interlacing field order.
pub static FIELD_ORDER: LazyLock<EnumDescriptor> = LazyLock::new(|| {
    EnumDescriptor::new(
        "field_order",
        &[
            (0, "unknown"),
            (1, "progressive"),
            (2, "top coded first, top displayed first"),
            (3, "bottom coded first, bottom displayed first"),
            (4, "top coded first, bottom displayed first"),
            (5, "bottom coded first, top displayed first"),
        ],
    )
});

/// Motion estimation comparison functions.
pub static CMP_FUNCTION: LazyLock<EnumDescriptor> = LazyLock::new(|| {
    EnumDescriptor::new(
        "cmp",
        &[
            (0, "sad"),
            (1, "sse"),
            (2, "satd"),
            (3, "dct"),
            (4, "psnr"),
            (5, "bit"),
            (6, "rd"),
            (7, "zero"),
            (8, "vsad"),
            (9, "vsse"),
            (10, "nsse"),
            (11, "w53"),
            (12, "w97"),
            (13, "dctmax"),
            (14, "dct264"),
            (15, "median_sad"),
            (256, "chroma"),
        ],
    )
});

/// Macroblock decision modes.
pub static MB_DECISION: LazyLock<EnumDescriptor> = LazyLock::new(|| {
    EnumDescriptor::new("mb_decision", &[(0, "simple"), (1, "bits"), (2, "rd")])
});

/// Audio service types.
pub static AUDIO_SERVICE_TYPE: LazyLock<EnumDescriptor> = LazyLock::new(|| {
    EnumDescriptor::new(
        "audio_service_type",
        &[
            (0, "main"),
            (1, "effects"),
            (2, "visually-impaired"),
            (3, "hearing-impaired"),
            (4, "dialogue"),
            (5, "commentary"),
            (6, "emergency"),
            (7, "voice-over"),
            (8, "karaoke"),
            (9, "nb"),
        ],
    )
});
