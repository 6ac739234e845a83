/*!
    The declarative field table.

    Each entry names one property bag key, how its value is stored in a
    [`CodecContext`], which `(mode, media type)` combinations can see it,
    and when it may be written. The marshalling engine is a single loop
    over this table; nothing outside the table decides visibility.

    Entries are listed in the order keys appear in a marshalled bag.
*/

use std::sync::LazyLock;

use beam_types::{MediaType, Mode, NameTable, Rational, names};

use crate::enums::{self, EnumDescriptor};
use crate::flags::{self, FlagSpec};
use crate::record::{CodecContext, Matrix};

/**
    When a visible field may be written.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Reported by the library, never written.
    ReadOnly,
    /// Written whenever visible.
    ReadWrite,
    /// Written only while encoding. Decoders report it.
    EncoderSettable,
    /// Written only while decoding. Encoders report it.
    DecoderSettable,
}

impl Access {
    pub const fn is_writable(self, mode: Mode) -> bool {
        match self {
            Self::ReadOnly => false,
            Self::ReadWrite => true,
            Self::EncoderSettable => mode.is_encoding(),
            Self::DecoderSettable => !mode.is_encoding(),
        }
    }
}

/**
    Storage kind of a field, with accessors into the record.
*/
#[derive(Clone, Copy)]
pub enum Kind {
    Int32 {
        get: fn(&CodecContext) -> i32,
        set: fn(&mut CodecContext, i32),
    },
    Int64 {
        get: fn(&CodecContext) -> i64,
        set: fn(&mut CodecContext, i64),
    },
    /// Single precision natively, double precision in the bag.
    Float {
        get: fn(&CodecContext) -> f32,
        set: fn(&mut CodecContext, f32),
    },
    Rational {
        get: fn(&CodecContext) -> Rational,
        set: fn(&mut CodecContext, Rational),
    },
    /// Library-owned text, `null` when absent.
    Text { get: fn(&CodecContext) -> Option<String> },
    /// One bit of a flag word.
    Flag(FlagSpec),
    /// An integer named through an [`EnumDescriptor`].
    Enum {
        desc: &'static LazyLock<EnumDescriptor>,
        get: fn(&CodecContext) -> i32,
        set: fn(&mut CodecContext, i32),
    },
    /// An integer named through a native [`NameTable`].
    Named {
        table: &'static NameTable,
        get: fn(&CodecContext) -> i32,
        set: fn(&mut CodecContext, i32),
    },
    /// A channel layout mask, named together with the channel count.
    Layout {
        get: fn(&CodecContext) -> u64,
        set: fn(&mut CodecContext, u64),
    },
    /// A 64-entry quantization matrix, absent when unset.
    Matrix {
        get: fn(&CodecContext) -> Option<Matrix>,
        set: fn(&mut CodecContext, Option<Box<Matrix>>),
    },
    /// A variable-length list of integers.
    IntList {
        get: fn(&CodecContext) -> Vec<i32>,
        set: fn(&mut CodecContext, Vec<i32>),
    },
    /// The rate control override list.
    RcOverrides,
}

impl Kind {
    /**
        The kind name used in diagnostics.
    */
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int32 { .. } => "int32",
            Self::Int64 { .. } => "int64",
            Self::Float { .. } => "double",
            Self::Rational { .. } => "rational",
            Self::Text { .. } => "string",
            Self::Flag(_) => "bool",
            Self::Enum { .. } => "enum",
            Self::Named { .. } => "string",
            Self::Layout { .. } => "string",
            Self::Matrix { .. } => "array",
            Self::IntList { .. } => "array",
            Self::RcOverrides => "struct-array",
        }
    }
}

/**
    Visibility predicate over `(mode, media type)`.
*/
pub type Visibility = fn(Mode, MediaType) -> bool;

/**
    One entry of the field table.
*/
#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub visible: Visibility,
    pub access: Access,
}

impl Field {
    #[inline]
    pub fn is_visible(&self, mode: Mode, media: MediaType) -> bool {
        (self.visible)(mode, media)
    }

    #[inline]
    pub fn is_writable(&self, mode: Mode, media: MediaType) -> bool {
        self.is_visible(mode, media) && self.access.is_writable(mode)
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind.name())
            .field("access", &self.access)
            .finish()
    }
}

pub fn always(_: Mode, _: MediaType) -> bool {
    true
}

pub fn encode(mode: Mode, _: MediaType) -> bool {
    mode.is_encoding()
}

pub fn video(_: Mode, media: MediaType) -> bool {
    media.is_video()
}

pub fn encode_video(mode: Mode, media: MediaType) -> bool {
    mode.is_encoding() && media.is_video()
}

pub fn decode_video(mode: Mode, media: MediaType) -> bool {
    !mode.is_encoding() && media.is_video()
}

pub fn audio(_: Mode, media: MediaType) -> bool {
    media.is_audio()
}

pub fn encode_audio(mode: Mode, media: MediaType) -> bool {
    mode.is_encoding() && media.is_audio()
}

pub fn decode_audio(mode: Mode, media: MediaType) -> bool {
    !mode.is_encoding() && media.is_audio()
}

/// Audio encoders report their delay through `initial_padding` instead.
pub fn not_encode_audio(mode: Mode, media: MediaType) -> bool {
    !(mode.is_encoding() && media.is_audio())
}

macro_rules! int32 {
    ($field:ident) => {
        Kind::Int32 {
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! int64 {
    ($field:ident) => {
        Kind::Int64 {
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! float {
    ($field:ident) => {
        Kind::Float {
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! rational {
    ($field:ident) => {
        Kind::Rational {
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! enumerated {
    ($desc:expr, $field:ident) => {
        Kind::Enum {
            desc: $desc,
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! named {
    ($table:expr, $field:ident) => {
        Kind::Named {
            table: $table,
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! layout {
    ($field:ident) => {
        Kind::Layout {
            get: |c| c.$field,
            set: |c, v| c.$field = v,
        }
    };
}

macro_rules! matrix {
    ($field:ident) => {
        Kind::Matrix {
            get: |c| c.$field.as_deref().copied(),
            set: |c, v| c.$field = v,
        }
    };
}

const fn field(name: &'static str, kind: Kind, visible: Visibility, access: Access) -> Field {
    Field {
        name,
        kind,
        visible,
        access,
    }
}

fn flag_fields(table: &'static [FlagSpec], visible: Visibility) -> impl Iterator<Item = Field> {
    table
        .iter()
        .map(move |spec| field(spec.name, Kind::Flag(*spec), visible, Access::ReadWrite))
}

/**
    The codec configuration field table.
*/
pub static FIELDS: LazyLock<Vec<Field>> = LazyLock::new(build_fields);

fn build_fields() -> Vec<Field> {
    use Access::{DecoderSettable, EncoderSettable, ReadOnly, ReadWrite};

    let mut fields = vec![
        field(
            "codec_id",
            Kind::Int32 {
                get: |c| c.codec_id,
                set: |_, _| {},
            },
            always,
            ReadOnly,
        ),
        field(
            "name",
            Kind::Text {
                get: |c| c.codec_name.clone(),
            },
            always,
            ReadOnly,
        ),
        field(
            "long_name",
            Kind::Text {
                get: |c| c.codec_long_name.clone(),
            },
            always,
            ReadOnly,
        ),
        field(
            "codec_type",
            Kind::Text {
                get: |c| c.media_type.name().map(str::to_string),
            },
            always,
            ReadOnly,
        ),
        field(
            "codec_tag",
            Kind::Text {
                get: |c| Some(c.codec_tag_string()),
            },
            always,
            ReadOnly,
        ),
        field("bit_rate", int64!(bit_rate), always, ReadWrite),
        field("bit_rate_tolerance", int32!(bit_rate_tolerance), encode, ReadWrite),
        field("global_quality", int32!(global_quality), encode, ReadWrite),
        field("compression_level", int32!(compression_level), encode, ReadWrite),
    ];

    fields.extend(flag_fields(flags::CODEC_FLAGS, always));
    fields.extend(flag_fields(flags::CODEC_FLAGS2, always));

    fields.extend([
        field("time_base", rational!(time_base), encode, ReadWrite),
        field("ticks_per_frame", int32!(ticks_per_frame), encode, ReadWrite),
        field("delay", int32!(delay), not_encode_audio, ReadOnly),
        // Video
        field("width", int32!(width), video, ReadWrite),
        field("height", int32!(height), video, ReadWrite),
        field("coded_width", int32!(coded_width), decode_video, ReadWrite),
        field("coded_height", int32!(coded_height), decode_video, ReadWrite),
        field("gop_size", int32!(gop_size), encode_video, ReadWrite),
        field("pix_fmt", named!(&names::PIXEL_FORMATS, pix_fmt), video, ReadWrite),
        field("max_b_frames", int32!(max_b_frames), encode_video, ReadWrite),
        field("b_quant_factor", float!(b_quant_factor), encode_video, ReadWrite),
        field("b_quant_offset", float!(b_quant_offset), encode_video, ReadWrite),
        field("has_b_frames", int32!(has_b_frames), video, ReadOnly),
        field("i_quant_factor", float!(i_quant_factor), encode_video, ReadWrite),
        field("i_quant_offset", float!(i_quant_offset), encode_video, ReadWrite),
        field("lumi_masking", float!(lumi_masking), encode_video, ReadWrite),
        field(
            "temporal_cplx_masking",
            float!(temporal_cplx_masking),
            encode_video,
            ReadWrite,
        ),
        field(
            "spatial_cplx_masking",
            float!(spatial_cplx_masking),
            encode_video,
            ReadWrite,
        ),
        field("p_masking", float!(p_masking), encode_video, ReadWrite),
        field("dark_masking", float!(dark_masking), encode_video, ReadWrite),
        field(
            "slice_offset",
            Kind::IntList {
                get: |c| c.slice_offset.clone(),
                set: |c, v| c.slice_offset = v,
            },
            video,
            DecoderSettable,
        ),
        field(
            "sample_aspect_ratio",
            rational!(sample_aspect_ratio),
            video,
            EncoderSettable,
        ),
        field(
            "me_cmp",
            enumerated!(&enums::CMP_FUNCTION, me_cmp),
            encode_video,
            ReadWrite,
        ),
        field(
            "me_sub_cmp",
            enumerated!(&enums::CMP_FUNCTION, me_sub_cmp),
            encode_video,
            ReadWrite,
        ),
        field(
            "mb_cmp",
            enumerated!(&enums::CMP_FUNCTION, mb_cmp),
            encode_video,
            ReadWrite,
        ),
        field(
            "ildct_cmp",
            enumerated!(&enums::CMP_FUNCTION, ildct_cmp),
            encode_video,
            ReadWrite,
        ),
        field("dia_size", int32!(dia_size), encode_video, ReadWrite),
        field(
            "last_predictor_count",
            int32!(last_predictor_count),
            encode_video,
            ReadWrite,
        ),
        field(
            "me_pre_cmp",
            enumerated!(&enums::CMP_FUNCTION, me_pre_cmp),
            encode_video,
            ReadWrite,
        ),
        field("pre_dia_size", int32!(pre_dia_size), encode_video, ReadWrite),
        field(
            "me_subpel_quality",
            int32!(me_subpel_quality),
            encode_video,
            ReadWrite,
        ),
        field("me_range", int32!(me_range), encode_video, ReadWrite),
    ]);

    fields.extend(flag_fields(flags::SLICE_FLAGS, decode_video));

    fields.extend([
        field(
            "mb_decision",
            enumerated!(&enums::MB_DECISION, mb_decision),
            encode_video,
            ReadWrite,
        ),
        field("intra_matrix", matrix!(intra_matrix), video, EncoderSettable),
        field("inter_matrix", matrix!(inter_matrix), video, EncoderSettable),
        field(
            "intra_dc_precision",
            int32!(intra_dc_precision),
            video,
            EncoderSettable,
        ),
        field("skip_top", int32!(skip_top), decode_video, ReadWrite),
        field("skip_bottom", int32!(skip_bottom), decode_video, ReadWrite),
        field("mb_lmin", int32!(mb_lmin), encode_video, ReadWrite),
        field("mb_lmax", int32!(mb_lmax), encode_video, ReadWrite),
        field("bidir_refine", int32!(bidir_refine), encode_video, ReadWrite),
        field("keyint_min", int32!(keyint_min), encode_video, ReadWrite),
        field("refs", int32!(refs), video, EncoderSettable),
        field("mv0_threshold", int32!(mv0_threshold), encode_video, ReadWrite),
        field(
            "color_primaries",
            named!(&names::COLOR_PRIMARIES, color_primaries),
            video,
            EncoderSettable,
        ),
        field(
            "color_trc",
            named!(&names::COLOR_TRANSFER, color_trc),
            video,
            EncoderSettable,
        ),
        field(
            "colorspace",
            named!(&names::COLOR_SPACES, colorspace),
            video,
            EncoderSettable,
        ),
        field(
            "color_range",
            named!(&names::COLOR_RANGES, color_range),
            video,
            EncoderSettable,
        ),
        field(
            "chroma_sample_location",
            named!(&names::CHROMA_LOCATIONS, chroma_sample_location),
            video,
            EncoderSettable,
        ),
        field("slices", int32!(slices), encode_video, ReadWrite),
        field(
            "field_order",
            enumerated!(&enums::FIELD_ORDER, field_order),
            video,
            ReadWrite,
        ),
        // Audio
        field("sample_rate", int32!(sample_rate), audio, ReadWrite),
        field("channels", int32!(channels), audio, ReadWrite),
        field(
            "sample_fmt",
            named!(&names::SAMPLE_FORMATS, sample_fmt),
            audio,
            EncoderSettable,
        ),
        field("frame_size", int32!(frame_size), audio, ReadOnly),
        field("frame_number", int32!(frame_number), audio, ReadOnly),
        field("block_align", int32!(block_align), audio, ReadWrite),
        field("cutoff", int32!(cutoff), encode_audio, ReadWrite),
        field("channel_layout", layout!(channel_layout), audio, ReadWrite),
        field(
            "request_channel_layout",
            layout!(request_channel_layout),
            decode_audio,
            ReadWrite,
        ),
        field(
            "audio_service_type",
            enumerated!(&enums::AUDIO_SERVICE_TYPE, audio_service_type),
            audio,
            EncoderSettable,
        ),
        field(
            "request_sample_fmt",
            named!(&names::SAMPLE_FORMATS, request_sample_fmt),
            decode_audio,
            ReadWrite,
        ),
        // Rate control
        field("qcompress", float!(qcompress), encode, ReadWrite),
        field("qblur", float!(qblur), encode, ReadWrite),
        field("qmin", int32!(qmin), encode, ReadWrite),
        field("qmax", int32!(qmax), encode, ReadWrite),
        field("max_qdiff", int32!(max_qdiff), encode, ReadWrite),
        field("rc_buffer_size", int32!(rc_buffer_size), encode, ReadWrite),
        field("rc_override", Kind::RcOverrides, encode, ReadWrite),
        field("rc_max_rate", int64!(rc_max_rate), always, ReadWrite),
        field("rc_min_rate", int64!(rc_min_rate), encode, ReadWrite),
        field(
            "rc_max_available_vbv_use",
            float!(rc_max_available_vbv_use),
            encode,
            ReadWrite,
        ),
        field(
            "rc_min_vbv_overflow_use",
            float!(rc_min_vbv_overflow_use),
            encode,
            ReadWrite,
        ),
        field(
            "rc_initial_buffer_occupancy",
            int32!(rc_initial_buffer_occupancy),
            encode,
            ReadWrite,
        ),
    ]);

    fields
}

/**
    Fields visible under `(mode, media)`, in table order.
*/
pub fn visible_fields(mode: Mode, media: MediaType) -> impl Iterator<Item = &'static Field> {
    FIELDS.iter().filter(move |f| f.is_visible(mode, media))
}

/**
    Look up a field by its bag key.
*/
pub fn field_named(name: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for f in FIELDS.iter() {
            assert!(seen.insert(f.name), "duplicate field {}", f.name);
        }
    }

    #[test]
    fn identity_fields_are_read_only() {
        for name in ["codec_id", "name", "long_name", "codec_type", "codec_tag"] {
            let f = field_named(name).unwrap();
            assert_eq!(f.access, Access::ReadOnly);
            for mode in Mode::ALL {
                assert!(!f.is_writable(mode, MediaType::Video));
            }
        }
    }

    #[test]
    fn encode_only_fields_hidden_while_decoding() {
        for name in ["gop_size", "me_cmp", "qmin", "rc_override", "time_base"] {
            let f = field_named(name).unwrap();
            for media in MediaType::ALL {
                assert!(!f.is_visible(Mode::Decoding, media), "{name}");
            }
        }
    }

    #[test]
    fn media_gating() {
        let width = field_named("width").unwrap();
        assert!(width.is_visible(Mode::Decoding, MediaType::Video));
        assert!(!width.is_visible(Mode::Decoding, MediaType::Audio));

        let sample_rate = field_named("sample_rate").unwrap();
        assert!(sample_rate.is_visible(Mode::Encoding, MediaType::Audio));
        assert!(!sample_rate.is_visible(Mode::Encoding, MediaType::Video));

        let delay = field_named("delay").unwrap();
        assert!(delay.is_visible(Mode::Encoding, MediaType::Video));
        assert!(!delay.is_visible(Mode::Encoding, MediaType::Audio));
    }

    #[test]
    fn settable_classes_restrict_writes() {
        let refs = field_named("refs").unwrap();
        assert!(refs.is_visible(Mode::Decoding, MediaType::Video));
        assert!(!refs.is_writable(Mode::Decoding, MediaType::Video));
        assert!(refs.is_writable(Mode::Encoding, MediaType::Video));

        let slice_offset = field_named("slice_offset").unwrap();
        assert!(slice_offset.is_writable(Mode::Decoding, MediaType::Video));
        assert!(!slice_offset.is_writable(Mode::Encoding, MediaType::Video));
    }

    #[test]
    fn slice_flags_only_for_video_decoders() {
        let f = field_named("SLICE_FLAG_ALLOW_FIELD").unwrap();
        assert!(f.is_visible(Mode::Decoding, MediaType::Video));
        assert!(!f.is_visible(Mode::Encoding, MediaType::Video));
        assert!(!f.is_visible(Mode::Decoding, MediaType::Audio));
    }

    #[test]
    fn every_flag_has_a_field() {
        for spec in flags::CODEC_FLAGS
            .iter()
            .chain(flags::CODEC_FLAGS2)
            .chain(flags::SLICE_FLAGS)
        {
            let f = field_named(spec.name).unwrap();
            assert!(matches!(f.kind, Kind::Flag(s) if s == *spec));
        }
    }

    #[test]
    fn accessors_target_their_own_field() {
        let Kind::Enum { set, .. } = field_named("ildct_cmp").unwrap().kind else {
            panic!("ildct_cmp is an enum field");
        };
        let mut ctx = CodecContext::new(27, MediaType::Video);
        let before = ctx.clone();
        set(&mut ctx, 3);
        assert_eq!(ctx.ildct_cmp, 3);
        assert_eq!(ctx.dia_size, before.dia_size);
        assert_eq!(ctx.mb_cmp, before.mb_cmp);
    }
}
