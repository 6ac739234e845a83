/*!
    Packed flag words exposed as independent boolean keys.

    Every flag is a `(word, mask)` pair. Reads test the mask, writes set or
    clear exactly the masked bits and leave the rest of the word alone.
*/

use FlagWord::{Flags, Flags2, SliceFlags};

/**
    The packed flag words of a codec configuration record.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagWord {
    Flags,
    Flags2,
    SliceFlags,
}

/**
    One named bit of a flag word.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: &'static str,
    pub word: FlagWord,
    pub mask: u32,
}

impl FlagSpec {
    const fn new(name: &'static str, word: FlagWord, mask: u32) -> Self {
        Self { name, word, mask }
    }

    #[inline]
    pub const fn test(&self, word: u32) -> bool {
        test(word, self.mask)
    }

    #[inline]
    pub const fn apply(&self, word: u32, on: bool) -> u32 {
        apply(word, self.mask, on)
    }
}

/**
    Returns true if any bit of `mask` is set in `word`.
*/
#[inline]
pub const fn test(word: u32, mask: u32) -> bool {
    word & mask != 0
}

/**
    Returns `word` with the bits of `mask` set or cleared.
*/
#[inline]
pub const fn apply(word: u32, mask: u32, on: bool) -> u32 {
    if on { word | mask } else { word & !mask }
}

pub const CODEC_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("UNALIGNED", Flags, 1 << 0),
    FlagSpec::new("QSCALE", Flags, 1 << 1),
    FlagSpec::new("4MV", Flags, 1 << 2),
    FlagSpec::new("OUTPUT_CORRUPT", Flags, 1 << 3),
    FlagSpec::new("QPEL", Flags, 1 << 4),
    FlagSpec::new("PASS1", Flags, 1 << 9),
    FlagSpec::new("PASS2", Flags, 1 << 10),
    FlagSpec::new("LOOP_FILTER", Flags, 1 << 11),
    FlagSpec::new("GRAY", Flags, 1 << 13),
    FlagSpec::new("PSNR", Flags, 1 << 15),
    FlagSpec::new("TRUNCATED", Flags, 1 << 16),
    FlagSpec::new("INTERLACED_DCT", Flags, 1 << 18),
    FlagSpec::new("LOW_DELAY", Flags, 1 << 19),
    FlagSpec::new("GLOBAL_HEADER", Flags, 1 << 22),
    FlagSpec::new("BITEXACT", Flags, 1 << 23),
    FlagSpec::new("AC_PRED", Flags, 1 << 24),
    FlagSpec::new("INTERLACED_ME", Flags, 1 << 29),
    FlagSpec::new("CLOSED_GOP", Flags, 1 << 31),
];

pub const CODEC_FLAGS2: &[FlagSpec] = &[
    FlagSpec::new("FAST", Flags2, 1 << 0),
    FlagSpec::new("NO_OUTPUT", Flags2, 1 << 2),
    FlagSpec::new("LOCAL_HEADER", Flags2, 1 << 3),
    FlagSpec::new("DROP_FRAME_TIMECODE", Flags2, 1 << 13),
    FlagSpec::new("CHUNKS", Flags2, 1 << 15),
    FlagSpec::new("IGNORE_CROP", Flags2, 1 << 16),
    FlagSpec::new("SHOW_ALL", Flags2, 1 << 22),
    FlagSpec::new("EXPORT_MVS", Flags2, 1 << 28),
    FlagSpec::new("SKIP_MANUAL", Flags2, 1 << 29),
    FlagSpec::new("RO_FLUSH_NOOP", Flags2, 1 << 30),
];

/// Horizontal band drawing flags, meaningful to video decoders only.
pub const SLICE_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("SLICE_FLAG_CODED_ORDER", SliceFlags, 0x1),
    FlagSpec::new("SLICE_FLAG_ALLOW_FIELD", SliceFlags, 0x2),
    FlagSpec::new("SLICE_FLAG_ALLOW_PLANE", SliceFlags, 0x4),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn apply_touches_only_the_mask() {
        let word = 0b1010_1010;
        assert_eq!(apply(word, 0b10, false), 0b1010_1000);
        assert_eq!(apply(word, 0b01, true), 0b1010_1011);
        assert_eq!(apply(word, 0b10, true), word);
    }

    #[test]
    fn high_bit_flag() {
        let closed_gop = CODEC_FLAGS.iter().find(|f| f.name == "CLOSED_GOP").unwrap();
        assert_eq!(closed_gop.mask, 0x8000_0000);
        let word = closed_gop.apply(0, true);
        assert!(closed_gop.test(word));
        assert_eq!(closed_gop.apply(word, false), 0);
    }

    #[test]
    fn masks_are_single_bits_and_unique_per_word() {
        for table in [CODEC_FLAGS, CODEC_FLAGS2, SLICE_FLAGS] {
            let mut seen = HashSet::new();
            for flag in table {
                assert_eq!(flag.mask.count_ones(), 1, "{}", flag.name);
                assert!(seen.insert(flag.mask), "{}", flag.name);
                assert_eq!(flag.word, table[0].word);
            }
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for flag in CODEC_FLAGS.iter().chain(CODEC_FLAGS2).chain(SLICE_FLAGS) {
            assert!(seen.insert(flag.name), "{}", flag.name);
        }
    }
}
