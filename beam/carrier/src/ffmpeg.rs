/*!
    A codec library backed by the system FFmpeg libraries.

    Named constants and channel layouts are converted with FFmpeg's own
    stringifiers and parsers, so every value the linked libraries know can
    be read and written, not only those listed in the static name tables.
*/

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::{mem, ptr};

use ffmpeg_next::ffi::{self, AVAudioServiceType, AVFieldOrder};

use beam_props::{CodecContext, Direction, FormatDescriptor, Matrix, RcOverride};
use beam_types::{
    Error, MediaType, NameFamily, NameTable, NativeNames, Rational, Result, UNKNOWN_CODEC_NAME,
    channel_layout_name,
};

use crate::library::{CodecInfo, CodecLibrary, NativeContext};

fn owned(s: *const c_char) -> Option<String> {
    if s.is_null() {
        None
    } else {
        // SAFETY: FFmpeg registry strings are static, NUL terminated C strings.
        Some(unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned())
    }
}

fn rational(r: ffi::AVRational) -> Rational {
    Rational::new(r.num, r.den)
}

fn av_rational(r: Rational) -> ffi::AVRational {
    ffi::AVRational { num: r.num, den: r.den }
}

type NameFn = unsafe extern "C" fn(c_int) -> *const c_char;

macro_rules! int_name_fn {
    ($f:path, $ty:ty) => {{
        let f: unsafe extern "C" fn($ty) -> *const c_char = $f;
        // SAFETY: C enums are passed as int, and every stringifier returns
        // NULL for values outside its table.
        unsafe { mem::transmute::<unsafe extern "C" fn($ty) -> *const c_char, NameFn>(f) }
    }};
}

fn name_fn(family: NameFamily) -> NameFn {
    match family {
        NameFamily::PixelFormat => int_name_fn!(ffi::av_get_pix_fmt_name, ffi::AVPixelFormat),
        NameFamily::SampleFormat => int_name_fn!(ffi::av_get_sample_fmt_name, ffi::AVSampleFormat),
        NameFamily::ColorPrimaries => int_name_fn!(ffi::av_color_primaries_name, ffi::AVColorPrimaries),
        NameFamily::ColorTransfer => {
            int_name_fn!(ffi::av_color_transfer_name, ffi::AVColorTransferCharacteristic)
        }
        NameFamily::ColorSpace => int_name_fn!(ffi::av_color_space_name, ffi::AVColorSpace),
        NameFamily::ColorRange => int_name_fn!(ffi::av_color_range_name, ffi::AVColorRange),
        NameFamily::ChromaLocation => int_name_fn!(ffi::av_chroma_location_name, ffi::AVChromaLocation),
    }
}

fn native_name(family: NameFamily, value: i32) -> Option<String> {
    owned(unsafe { name_fn(family)(value) })
}

fn native_cname(family: NameFamily, value: i32) -> Option<CString> {
    native_name(family, value).and_then(|n| CString::new(n).ok())
}

fn native_mask(layout: &ffi::AVChannelLayout) -> u64 {
    if layout.order == ffi::AVChannelOrder::AV_CHANNEL_ORDER_NATIVE {
        // SAFETY: mask is the active union member for native order layouts.
        unsafe { layout.u.mask }
    } else {
        0
    }
}

fn describe_layout(layout: &ffi::AVChannelLayout) -> Option<String> {
    let mut buf = [0 as c_char; 128];
    let ret = unsafe { ffi::av_channel_layout_describe(layout, buf.as_mut_ptr(), buf.len()) };
    if ret < 0 {
        return None;
    }
    // SAFETY: av_channel_layout_describe NUL terminates within the buffer.
    Some(unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy().into_owned())
}

/**
    FFmpeg's stringifiers and parsers for named constants and channel
    layouts.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegNames;

static FFMPEG_NAMES: FfmpegNames = FfmpegNames;

impl NativeNames for FfmpegNames {
    fn name(&self, table: &NameTable, value: i32) -> Option<String> {
        native_name(table.family(), value)
    }

    fn parse(&self, table: &NameTable, name: &str) -> i32 {
        let Ok(name) = CString::new(name) else {
            return table.invalid();
        };
        let name = name.as_ptr();
        unsafe {
            match table.family() {
                NameFamily::PixelFormat => ffi::av_get_pix_fmt(name) as i32,
                NameFamily::SampleFormat => ffi::av_get_sample_fmt(name) as i32,
                NameFamily::ColorPrimaries => ffi::av_color_primaries_from_name(name),
                NameFamily::ColorTransfer => ffi::av_color_transfer_from_name(name),
                NameFamily::ColorSpace => ffi::av_color_space_from_name(name),
                NameFamily::ColorRange => ffi::av_color_range_from_name(name),
                NameFamily::ChromaLocation => ffi::av_chroma_location_from_name(name),
            }
        }
    }

    fn layout_name(&self, channels: i32, layout: u64) -> String {
        // Counts that disagree with the mask are described generically.
        if layout == 0 || (channels > 0 && layout.count_ones() as i32 != channels) {
            return channel_layout_name(channels, layout);
        }
        // SAFETY: an all-zero layout is the unspecified, empty layout.
        let mut l: ffi::AVChannelLayout = unsafe { mem::zeroed() };
        let name = if unsafe { ffi::av_channel_layout_from_mask(&mut l, layout) } == 0 {
            describe_layout(&l)
        } else {
            None
        };
        unsafe { ffi::av_channel_layout_uninit(&mut l) };
        name.unwrap_or_else(|| channel_layout_name(channels, layout))
    }

    fn parse_layout(&self, name: &str) -> u64 {
        let Ok(name) = CString::new(name) else {
            return 0;
        };
        // SAFETY: an all-zero layout is the unspecified, empty layout.
        let mut l: ffi::AVChannelLayout = unsafe { mem::zeroed() };
        let mask = if unsafe { ffi::av_channel_layout_from_string(&mut l, name.as_ptr()) } == 0 {
            native_mask(&l)
        } else {
            0
        };
        unsafe { ffi::av_channel_layout_uninit(&mut l) };
        mask
    }
}

/**
    A codec registered with FFmpeg.
*/
#[derive(Clone, Copy, Debug)]
pub struct FfmpegCodec(*const ffi::AVCodec);

// SAFETY: Registered codecs are immutable statics owned by libavcodec.
unsafe impl Send for FfmpegCodec {}

/**
    Record fields that have no slot in every supported FFmpeg release.
    They live beside the context so written values read back unchanged.
*/
#[derive(Clone, Copy, Debug)]
struct Detached {
    ticks_per_frame: i32,
    mv0_threshold: i32,
    request_channel_layout: u64,
}

impl Detached {
    fn from_record(r: &CodecContext) -> Self {
        Self {
            ticks_per_frame: r.ticks_per_frame,
            mv0_threshold: r.mv0_threshold,
            request_channel_layout: r.request_channel_layout,
        }
    }
}

/**
    An FFmpeg codec context, freed on drop.
*/
pub struct FfmpegContext {
    ptr: *mut ffi::AVCodecContext,
    detached: Detached,
    /// Whether `slice_offset` was allocated here rather than by libavcodec.
    owns_slice_offset: bool,
}

// SAFETY: The context is exclusively owned; FFmpeg allows a context to be
// used from any thread as long as calls are not concurrent.
unsafe impl Send for FfmpegContext {}

impl Drop for FfmpegContext {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            tracing::trace!("freeing ffmpeg codec context");
            unsafe {
                // libavcodec leaves user supplied slice offsets to the user.
                if self.owns_slice_offset {
                    ffi::av_freep(&mut (*self.ptr).slice_offset as *mut *mut c_int as *mut c_void);
                }
                ffi::avcodec_free_context(&mut self.ptr);
            }
        }
    }
}

macro_rules! copy_fields {
    ($dst:expr, $src:expr; $($field:ident),* $(,)?) => {
        $( $dst.$field = $src.$field as _; )*
    };
}

/**
    Store a named constant into an enum typed field. Values FFmpeg cannot
    name leave the field unchanged.
*/
macro_rules! store_named {
    ($slot:expr, $family:expr, $value:expr, $ty:ty) => {
        if native_name($family, $value).is_some() {
            // SAFETY: every value FFmpeg can name is a variant of its enum.
            $slot = unsafe { mem::transmute::<c_int, $ty>($value) };
        } else {
            tracing::debug!(
                family = ?$family,
                value = $value,
                "no native name, leaving field unchanged"
            );
        }
    };
}

fn read_matrix(ptr: *const u16) -> Option<Box<Matrix>> {
    if ptr.is_null() {
        return None;
    }
    let mut matrix = Box::new([0u16; 64]);
    // SAFETY: FFmpeg quantization matrices hold 64 entries.
    unsafe { ptr::copy_nonoverlapping(ptr, matrix.as_mut_ptr(), matrix.len()) };
    Some(matrix)
}

fn write_matrix(slot: &mut *mut u16, matrix: Option<&Matrix>) -> Result<()> {
    unsafe {
        ffi::av_freep(slot as *mut *mut u16 as *mut c_void);
        if let Some(matrix) = matrix {
            let buf = ffi::av_malloc(mem::size_of::<Matrix>()) as *mut u16;
            if buf.is_null() {
                return Err(Error::runtime("Problem allocating quantization matrix."));
            }
            ptr::copy_nonoverlapping(matrix.as_ptr(), buf, matrix.len());
            *slot = buf;
        }
    }
    Ok(())
}

/**
    Replace an `av_malloc`ed array and its count. An empty slice leaves a
    null pointer and a zero count.
*/
fn write_array<T: Copy>(slot: &mut *mut T, count: &mut c_int, items: &[T], what: &str) -> Result<()> {
    let len = c_int::try_from(items.len())
        .map_err(|_| Error::marshal_size(what, c_int::MAX as usize, items.len()))?;
    unsafe {
        ffi::av_freep(slot as *mut *mut T as *mut c_void);
        *count = 0;
        if !items.is_empty() {
            let buf = ffi::av_malloc(mem::size_of_val(items)) as *mut T;
            if buf.is_null() {
                return Err(Error::runtime(format!("Problem allocating {what}.")));
            }
            ptr::copy_nonoverlapping(items.as_ptr(), buf, items.len());
            *slot = buf;
            *count = len;
        }
    }
    Ok(())
}

fn field_order(value: i32) -> Option<AVFieldOrder> {
    Some(match value {
        0 => AVFieldOrder::AV_FIELD_UNKNOWN,
        1 => AVFieldOrder::AV_FIELD_PROGRESSIVE,
        2 => AVFieldOrder::AV_FIELD_TT,
        3 => AVFieldOrder::AV_FIELD_BB,
        4 => AVFieldOrder::AV_FIELD_TB,
        5 => AVFieldOrder::AV_FIELD_BT,
        _ => return None,
    })
}

fn audio_service_type(value: i32) -> Option<AVAudioServiceType> {
    Some(match value {
        0 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_MAIN,
        1 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_EFFECTS,
        2 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_VISUALLY_IMPAIRED,
        3 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_HEARING_IMPAIRED,
        4 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_DIALOGUE,
        5 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_COMMENTARY,
        6 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_EMERGENCY,
        7 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_VOICE_OVER,
        8 => AVAudioServiceType::AV_AUDIO_SERVICE_TYPE_KARAOKE,
        _ => return None,
    })
}

fn native_overrides(overrides: &[RcOverride]) -> Vec<ffi::RcOverride> {
    overrides
        .iter()
        .map(|o| ffi::RcOverride {
            start_frame: o.start_frame,
            end_frame: o.end_frame,
            qscale: o.qscale,
            quality_factor: o.quality_factor,
        })
        .collect()
}

impl NativeContext for FfmpegContext {
    fn load_record(&self) -> CodecContext {
        // SAFETY: ptr is a live context allocated by avcodec_alloc_context3.
        let c = unsafe { &*self.ptr };
        let mut r = CodecContext::new(c.codec_id as i32, MediaType::from_value(c.codec_type as i32));
        if !c.codec.is_null() {
            // SAFETY: an allocated context points at its registered codec.
            let codec = unsafe { &*c.codec };
            r.codec_name = owned(codec.name);
            r.codec_long_name = owned(codec.long_name);
        }

        copy_fields!(r, c;
            codec_tag, bit_rate, bit_rate_tolerance, global_quality, compression_level,
            flags, flags2, delay, width, height, coded_width, coded_height, gop_size,
            max_b_frames, b_quant_factor, b_quant_offset, has_b_frames, i_quant_factor,
            i_quant_offset, lumi_masking, temporal_cplx_masking, spatial_cplx_masking,
            p_masking, dark_masking, me_cmp, me_sub_cmp, mb_cmp, ildct_cmp, dia_size,
            last_predictor_count, me_pre_cmp, pre_dia_size, me_subpel_quality, me_range,
            slice_flags, mb_decision, intra_dc_precision, skip_top, skip_bottom, mb_lmin,
            mb_lmax, bidir_refine, keyint_min, refs, slices, sample_rate, frame_size,
            block_align, cutoff, qcompress, qblur, qmin, qmax, max_qdiff, rc_buffer_size,
            rc_max_rate, rc_min_rate, rc_max_available_vbv_use, rc_min_vbv_overflow_use,
            rc_initial_buffer_occupancy,
        );
        r.time_base = rational(c.time_base);
        r.sample_aspect_ratio = rational(c.sample_aspect_ratio);
        r.pix_fmt = c.pix_fmt as i32;
        r.sample_fmt = c.sample_fmt as i32;
        r.request_sample_fmt = c.request_sample_fmt as i32;
        r.color_primaries = c.color_primaries as i32;
        r.color_trc = c.color_trc as i32;
        r.colorspace = c.colorspace as i32;
        r.color_range = c.color_range as i32;
        r.chroma_sample_location = c.chroma_sample_location as i32;
        r.field_order = c.field_order as i32;
        r.audio_service_type = c.audio_service_type as i32;
        r.frame_number = i32::try_from(c.frame_num).unwrap_or(i32::MAX);

        r.ticks_per_frame = self.detached.ticks_per_frame;
        r.mv0_threshold = self.detached.mv0_threshold;
        r.request_channel_layout = self.detached.request_channel_layout;

        r.channels = c.ch_layout.nb_channels;
        r.channel_layout = native_mask(&c.ch_layout);

        r.intra_matrix = read_matrix(c.intra_matrix);
        r.inter_matrix = read_matrix(c.inter_matrix);

        if !c.slice_offset.is_null() && c.slice_count > 0 {
            // SAFETY: slice_offset holds slice_count entries.
            let offsets = unsafe { std::slice::from_raw_parts(c.slice_offset, c.slice_count as usize) };
            r.slice_offset = offsets.to_vec();
        }
        if !c.rc_override.is_null() && c.rc_override_count > 0 {
            // SAFETY: rc_override holds rc_override_count entries.
            let overrides = unsafe { std::slice::from_raw_parts(c.rc_override, c.rc_override_count as usize) };
            r.rc_override = overrides
                .iter()
                .map(|o| RcOverride {
                    start_frame: o.start_frame,
                    end_frame: o.end_frame,
                    qscale: o.qscale,
                    quality_factor: o.quality_factor,
                })
                .collect();
        }
        r
    }

    fn store_record(&mut self, r: &CodecContext) -> Result<()> {
        let current = self.load_record();
        // SAFETY: ptr is a live context exclusively owned by self.
        let c = unsafe { &mut *self.ptr };

        copy_fields!(c, r;
            bit_rate, bit_rate_tolerance, global_quality, compression_level, flags, flags2,
            width, height, coded_width, coded_height, gop_size, max_b_frames, b_quant_factor,
            b_quant_offset, i_quant_factor, i_quant_offset, lumi_masking,
            temporal_cplx_masking, spatial_cplx_masking, p_masking, dark_masking, me_cmp,
            me_sub_cmp, mb_cmp, ildct_cmp, dia_size, last_predictor_count, me_pre_cmp,
            pre_dia_size, me_subpel_quality, me_range, slice_flags, mb_decision,
            intra_dc_precision, skip_top, skip_bottom, mb_lmin, mb_lmax, bidir_refine,
            keyint_min, refs, slices, sample_rate, block_align, cutoff, qcompress, qblur,
            qmin, qmax, max_qdiff, rc_buffer_size, rc_max_rate, rc_min_rate,
            rc_max_available_vbv_use, rc_min_vbv_overflow_use, rc_initial_buffer_occupancy,
        );
        c.time_base = av_rational(r.time_base);
        c.sample_aspect_ratio = av_rational(r.sample_aspect_ratio);
        self.detached = Detached::from_record(r);

        if r.pix_fmt == -1 {
            c.pix_fmt = ffi::AVPixelFormat::AV_PIX_FMT_NONE;
        } else if let Some(name) = native_cname(NameFamily::PixelFormat, r.pix_fmt) {
            c.pix_fmt = unsafe { ffi::av_get_pix_fmt(name.as_ptr()) };
        }
        let sample_formats = [
            (&mut c.sample_fmt, r.sample_fmt),
            (&mut c.request_sample_fmt, r.request_sample_fmt),
        ];
        for (slot, value) in sample_formats {
            if value == -1 {
                *slot = ffi::AVSampleFormat::AV_SAMPLE_FMT_NONE;
            } else if let Some(name) = native_cname(NameFamily::SampleFormat, value) {
                *slot = unsafe { ffi::av_get_sample_fmt(name.as_ptr()) };
            }
        }
        store_named!(
            c.color_primaries,
            NameFamily::ColorPrimaries,
            r.color_primaries,
            ffi::AVColorPrimaries
        );
        store_named!(
            c.color_trc,
            NameFamily::ColorTransfer,
            r.color_trc,
            ffi::AVColorTransferCharacteristic
        );
        store_named!(
            c.colorspace,
            NameFamily::ColorSpace,
            r.colorspace,
            ffi::AVColorSpace
        );
        store_named!(
            c.color_range,
            NameFamily::ColorRange,
            r.color_range,
            ffi::AVColorRange
        );
        store_named!(
            c.chroma_sample_location,
            NameFamily::ChromaLocation,
            r.chroma_sample_location,
            ffi::AVChromaLocation
        );

        if let Some(order) = field_order(r.field_order) {
            c.field_order = order;
        }
        if let Some(service) = audio_service_type(r.audio_service_type) {
            c.audio_service_type = service;
        }

        if r.channels != c.ch_layout.nb_channels || r.channel_layout != native_mask(&c.ch_layout) {
            unsafe {
                ffi::av_channel_layout_uninit(&mut c.ch_layout);
                if r.channel_layout != 0 {
                    ffi::av_channel_layout_from_mask(&mut c.ch_layout, r.channel_layout);
                } else if r.channels > 0 {
                    ffi::av_channel_layout_default(&mut c.ch_layout, r.channels);
                }
            }
        }

        write_matrix(&mut c.intra_matrix, r.intra_matrix.as_deref())?;
        write_matrix(&mut c.inter_matrix, r.inter_matrix.as_deref())?;

        if r.rc_override != current.rc_override {
            let overrides = native_overrides(&r.rc_override);
            write_array(&mut c.rc_override, &mut c.rc_override_count, &overrides, "rc_override")?;
        }
        if r.slice_offset != current.slice_offset {
            if !self.owns_slice_offset && !c.slice_offset.is_null() {
                // Offsets allocated by libavcodec stay in its hands.
                tracing::debug!("slice offsets are owned by the codec, leaving them unchanged");
            } else {
                write_array(&mut c.slice_offset, &mut c.slice_count, &r.slice_offset, "slice_offset")?;
                self.owns_slice_offset = !c.slice_offset.is_null();
            }
        }
        Ok(())
    }

    fn names(&self) -> &dyn NativeNames {
        &FFMPEG_NAMES
    }

    fn is_open(&self) -> bool {
        unsafe { ffi::avcodec_is_open(self.ptr) > 0 }
    }
}

/**
    The FFmpeg codec library.
*/
#[derive(Clone, Copy, Debug)]
pub struct FfmpegLibrary {
    _private: (),
}

impl FfmpegLibrary {
    /**
        Initialize FFmpeg.
    */
    pub fn new() -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::runtime(format!("Problem initializing FFmpeg: {e}")))?;
        Ok(Self { _private: () })
    }

    fn find(&self, name: &str, encoder: bool) -> Option<FfmpegCodec> {
        let name = CString::new(name).ok()?;
        let codec = unsafe {
            if encoder {
                ffi::avcodec_find_encoder_by_name(name.as_ptr())
            } else {
                ffi::avcodec_find_decoder_by_name(name.as_ptr())
            }
        };
        (!codec.is_null()).then_some(FfmpegCodec(codec))
    }
}

impl CodecLibrary for FfmpegLibrary {
    type Codec = FfmpegCodec;
    type Context = FfmpegContext;

    fn codec_name(&self, id: i32) -> String {
        if id == 0 {
            return String::from("none");
        }
        let mut desc: *const ffi::AVCodecDescriptor = ptr::null();
        loop {
            desc = unsafe { ffi::avcodec_descriptor_next(desc) };
            if desc.is_null() {
                return String::from(UNKNOWN_CODEC_NAME);
            }
            // SAFETY: descriptors are static entries of libavcodec's table.
            let d = unsafe { &*desc };
            if d.id as i32 == id {
                return owned(d.name).unwrap_or_else(|| String::from(UNKNOWN_CODEC_NAME));
            }
        }
    }

    fn find_decoder(&self, name: &str) -> Option<FfmpegCodec> {
        self.find(name, false)
    }

    fn find_encoder(&self, name: &str) -> Option<FfmpegCodec> {
        self.find(name, true)
    }

    fn codec_info(&self, codec: &FfmpegCodec) -> CodecInfo {
        // SAFETY: FfmpegCodec only wraps non-null registry entries.
        let c = unsafe { &*codec.0 };
        CodecInfo {
            id: c.id as i32,
            name: owned(c.name).unwrap_or_default(),
            long_name: owned(c.long_name),
            media_type: MediaType::from_value(c.type_ as i32),
        }
    }

    fn alloc_context(&self, codec: &FfmpegCodec) -> Option<FfmpegContext> {
        let ptr = unsafe { ffi::avcodec_alloc_context3(codec.0) };
        (!ptr.is_null()).then(|| FfmpegContext {
            ptr,
            detached: Detached::from_record(&CodecContext::new(0, MediaType::Unknown)),
            owns_slice_offset: false,
        })
    }

    fn open(&self, context: &mut FfmpegContext, codec: &FfmpegCodec) -> std::result::Result<(), i32> {
        let ret = unsafe { ffi::avcodec_open2(context.ptr, codec.0, ptr::null_mut()) };
        if ret < 0 { Err(ret) } else { Ok(()) }
    }

    fn error_message(&self, base: &str, code: i32) -> String {
        let mut buf = [0 as c_char; ffi::AV_ERROR_MAX_STRING_SIZE as usize];
        let ret = unsafe { ffi::av_strerror(code, buf.as_mut_ptr(), buf.len()) };
        if ret < 0 {
            return beam_types::averror::native_error_message(base, code);
        }
        // SAFETY: av_strerror always NUL terminates within the buffer.
        let reason = unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy();
        format!("{base}{reason}")
    }

    fn muxers(&self) -> Vec<FormatDescriptor> {
        let mut formats = Vec::new();
        let mut opaque = ptr::null_mut();
        loop {
            let fmt = unsafe { ffi::av_muxer_iterate(&mut opaque) };
            if fmt.is_null() {
                return formats;
            }
            // SAFETY: muxers are static entries of libavformat's registry.
            let f = unsafe { &*fmt };
            let mut desc = FormatDescriptor::new(Direction::Output, owned(f.name).unwrap_or_default())
                .with_flags(f.flags as u32)
                .with_codecs(f.audio_codec as i32, f.video_codec as i32, f.subtitle_codec as i32);
            desc.long_name = owned(f.long_name);
            desc.mime_type = owned(f.mime_type);
            desc.extensions = owned(f.extensions);
            desc.priv_class = class_name(f.priv_class);
            formats.push(desc);
        }
    }

    fn demuxers(&self) -> Vec<FormatDescriptor> {
        let mut formats = Vec::new();
        let mut opaque = ptr::null_mut();
        loop {
            let fmt = unsafe { ffi::av_demuxer_iterate(&mut opaque) };
            if fmt.is_null() {
                return formats;
            }
            // SAFETY: demuxers are static entries of libavformat's registry.
            let f = unsafe { &*fmt };
            let mut desc =
                FormatDescriptor::new(Direction::Input, owned(f.name).unwrap_or_default()).with_flags(f.flags as u32);
            desc.long_name = owned(f.long_name);
            desc.mime_type = owned(f.mime_type);
            desc.extensions = owned(f.extensions);
            desc.priv_class = class_name(f.priv_class);
            formats.push(desc);
        }
    }
}

fn class_name(class: *const ffi::AVClass) -> Option<String> {
    if class.is_null() {
        None
    } else {
        // SAFETY: AVClass descriptors are static.
        owned(unsafe { (*class).class_name })
    }
}
