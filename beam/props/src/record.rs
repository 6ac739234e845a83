/*!
    The codec configuration record.
*/

use beam_types::{CodecId, MediaType, Rational, codec_name};

use crate::flags::FlagWord;

/// Entries in a quantization matrix.
pub const MATRIX_LEN: usize = 64;

/// A quantization matrix, in zigzag order as stored natively.
pub type Matrix = [u16; MATRIX_LEN];

/**
    A rate control override for a range of frames.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RcOverride {
    pub start_frame: i32,
    pub end_frame: i32,
    /// If this is zero, `quality_factor` is used instead.
    pub qscale: i32,
    pub quality_factor: f32,
}

/**
    Tunable state of one encoder or decoder instance.

    Field names and numbering follow the native codec context so that a
    record can be copied to and from it field by field. Enumerated values
    are kept as raw native integers and are only named when marshalled.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct CodecContext {
    // Identity, owned by the library
    pub codec_id: i32,
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub media_type: MediaType,
    pub codec_tag: u32,

    // General
    pub bit_rate: i64,
    pub bit_rate_tolerance: i32,
    pub global_quality: i32,
    pub compression_level: i32,
    pub flags: u32,
    pub flags2: u32,
    pub time_base: Rational,
    pub ticks_per_frame: i32,
    pub delay: i32,

    // Video
    pub width: i32,
    pub height: i32,
    pub coded_width: i32,
    pub coded_height: i32,
    pub gop_size: i32,
    pub pix_fmt: i32,
    pub max_b_frames: i32,
    pub b_quant_factor: f32,
    pub b_quant_offset: f32,
    pub has_b_frames: i32,
    pub i_quant_factor: f32,
    pub i_quant_offset: f32,
    pub lumi_masking: f32,
    pub temporal_cplx_masking: f32,
    pub spatial_cplx_masking: f32,
    pub p_masking: f32,
    pub dark_masking: f32,
    pub slice_offset: Vec<i32>,
    pub sample_aspect_ratio: Rational,
    pub me_cmp: i32,
    pub me_sub_cmp: i32,
    pub mb_cmp: i32,
    pub ildct_cmp: i32,
    pub dia_size: i32,
    pub last_predictor_count: i32,
    pub me_pre_cmp: i32,
    pub pre_dia_size: i32,
    pub me_subpel_quality: i32,
    pub me_range: i32,
    pub slice_flags: u32,
    pub mb_decision: i32,
    pub intra_matrix: Option<Box<Matrix>>,
    pub inter_matrix: Option<Box<Matrix>>,
    pub intra_dc_precision: i32,
    pub skip_top: i32,
    pub skip_bottom: i32,
    pub mb_lmin: i32,
    pub mb_lmax: i32,
    pub bidir_refine: i32,
    pub keyint_min: i32,
    pub refs: i32,
    pub mv0_threshold: i32,
    pub color_primaries: i32,
    pub color_trc: i32,
    pub colorspace: i32,
    pub color_range: i32,
    pub chroma_sample_location: i32,
    pub slices: i32,
    pub field_order: i32,

    // Audio
    pub sample_rate: i32,
    pub channels: i32,
    pub sample_fmt: i32,
    pub frame_size: i32,
    pub frame_number: i32,
    pub block_align: i32,
    pub cutoff: i32,
    pub channel_layout: u64,
    pub request_channel_layout: u64,
    pub audio_service_type: i32,
    pub request_sample_fmt: i32,

    // Rate control
    pub qcompress: f32,
    pub qblur: f32,
    pub qmin: i32,
    pub qmax: i32,
    pub max_qdiff: i32,
    pub rc_buffer_size: i32,
    pub rc_override: Vec<RcOverride>,
    pub rc_max_rate: i64,
    pub rc_min_rate: i64,
    pub rc_max_available_vbv_use: f32,
    pub rc_min_vbv_overflow_use: f32,
    pub rc_initial_buffer_occupancy: i32,
}

/// Lagrangian multiplier per quantizer step, as used for `mb_lmin`/`mb_lmax`.
const QP2LAMBDA: i32 = 118;

impl CodecContext {
    /**
        A record with the native library's allocation defaults for the
        given codec id and media type.
    */
    pub fn new(codec_id: i32, media_type: MediaType) -> Self {
        let known = CodecId::from_value(codec_id);
        Self {
            codec_id,
            codec_name: Some(codec_name(codec_id).to_string()),
            codec_long_name: known.map(|id| id.long_name().to_string()),
            media_type,
            codec_tag: 0,

            bit_rate: 200_000,
            bit_rate_tolerance: 4_000_000,
            global_quality: 0,
            compression_level: -1,
            flags: 0,
            flags2: 0,
            time_base: Rational::ZERO,
            ticks_per_frame: 1,
            delay: 0,

            width: 0,
            height: 0,
            coded_width: 0,
            coded_height: 0,
            gop_size: 12,
            pix_fmt: -1,
            max_b_frames: 0,
            b_quant_factor: 1.25,
            b_quant_offset: 1.25,
            has_b_frames: 0,
            i_quant_factor: -0.8,
            i_quant_offset: 0.0,
            lumi_masking: 0.0,
            temporal_cplx_masking: 0.0,
            spatial_cplx_masking: 0.0,
            p_masking: 0.0,
            dark_masking: 0.0,
            slice_offset: Vec::new(),
            sample_aspect_ratio: Rational::ZERO,
            me_cmp: 0,
            me_sub_cmp: 0,
            mb_cmp: 0,
            ildct_cmp: 8,
            dia_size: 0,
            last_predictor_count: 0,
            me_pre_cmp: 0,
            pre_dia_size: 0,
            me_subpel_quality: 8,
            me_range: 0,
            slice_flags: 0,
            mb_decision: 0,
            intra_matrix: None,
            inter_matrix: None,
            intra_dc_precision: 0,
            skip_top: 0,
            skip_bottom: 0,
            mb_lmin: QP2LAMBDA * 2,
            mb_lmax: QP2LAMBDA * 31,
            bidir_refine: 1,
            keyint_min: 25,
            refs: 1,
            mv0_threshold: 256,
            color_primaries: 2,
            color_trc: 2,
            colorspace: 2,
            color_range: 0,
            chroma_sample_location: 0,
            slices: 0,
            field_order: 0,

            sample_rate: 0,
            channels: 0,
            sample_fmt: -1,
            frame_size: 0,
            frame_number: 0,
            block_align: 0,
            cutoff: 0,
            channel_layout: 0,
            request_channel_layout: 0,
            audio_service_type: 0,
            request_sample_fmt: -1,

            qcompress: 0.5,
            qblur: 0.5,
            qmin: 2,
            qmax: 31,
            max_qdiff: 3,
            rc_buffer_size: 0,
            rc_override: Vec::new(),
            rc_max_rate: 0,
            rc_min_rate: 0,
            rc_max_available_vbv_use: 0.0,
            rc_min_vbv_overflow_use: 3.0,
            rc_initial_buffer_occupancy: 0,
        }
    }

    /**
        A record for a known codec, with its canonical media type.
    */
    pub fn for_codec(id: CodecId) -> Self {
        Self::new(id.value(), id.media_type())
    }

    #[inline]
    pub fn flag_word(&self, word: FlagWord) -> u32 {
        match word {
            FlagWord::Flags => self.flags,
            FlagWord::Flags2 => self.flags2,
            FlagWord::SliceFlags => self.slice_flags,
        }
    }

    #[inline]
    pub fn flag_word_mut(&mut self, word: FlagWord) -> &mut u32 {
        match word {
            FlagWord::Flags => &mut self.flags,
            FlagWord::Flags2 => &mut self.flags2,
            FlagWord::SliceFlags => &mut self.slice_flags,
        }
    }

    /**
        The codec tag as a fourcc string. Printable bytes are kept as is,
        other bytes are rendered as `[n]`.
    */
    pub fn codec_tag_string(&self) -> String {
        self.codec_tag
            .to_le_bytes()
            .iter()
            .map(|&b| {
                if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b' ' {
                    char::from(b).to_string()
                } else {
                    format!("[{b}]")
                }
            })
            .collect()
    }
}
