/*!
    A pure Rust codec library.

    Registers the codecs known to [`CodecId`] with the native numbering and
    names, allocates contexts with the native defaults and validates encoder
    configuration on open the way the native library does. It performs no
    media processing, which makes it suitable for configuration tooling and
    for exercising the bridge without system libraries.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use beam_props::{CodecContext, Direction, FormatDescriptor};
use beam_types::{CodecId, MediaType, Result, averror};

use crate::library::{CodecInfo, CodecLibrary, NativeContext};

/**
    A codec registered with the [`BuiltinLibrary`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinCodec {
    id: CodecId,
    encoder: bool,
}

impl BuiltinCodec {
    pub fn id(&self) -> CodecId {
        self.id
    }

    pub fn is_encoder(&self) -> bool {
        self.encoder
    }
}

/// Codecs with an encoder in the library. Every codec has a decoder.
const ENCODERS: &[CodecId] = &[
    CodecId::Mpeg1Video,
    CodecId::Mpeg2Video,
    CodecId::H263,
    CodecId::Mjpeg,
    CodecId::Mpeg4,
    CodecId::RawVideo,
    CodecId::Png,
    CodecId::PcmS16Le,
    CodecId::PcmS16Be,
    CodecId::Mp2,
    CodecId::Aac,
    CodecId::Ac3,
    CodecId::Flac,
    CodecId::Opus,
];

/// Samples per channel in one audio frame, for encoders with a fixed frame size.
fn encoder_frame_size(id: CodecId) -> i32 {
    match id {
        CodecId::Aac => 1024,
        CodecId::Mp2 => 1152,
        CodecId::Ac3 => 1536,
        CodecId::Flac => 4608,
        CodecId::Opus => 960,
        _ => 0,
    }
}

struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/**
    A context allocated by the [`BuiltinLibrary`].
*/
pub struct BuiltinContext {
    record: CodecContext,
    open: bool,
    _live: LiveGuard,
}

impl NativeContext for BuiltinContext {
    fn load_record(&self) -> CodecContext {
        self.record.clone()
    }

    fn store_record(&mut self, record: &CodecContext) -> Result<()> {
        self.record = record.clone();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for BuiltinContext {
    fn drop(&mut self) {
        tracing::trace!(codec = self.record.codec_id, open = self.open, "freeing codec context");
    }
}

/**
    The built-in codec library.

    Clones share the count of live contexts.
*/
#[derive(Clone, Debug, Default)]
pub struct BuiltinLibrary {
    live: Arc<AtomicUsize>,
}

impl BuiltinLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Number of contexts allocated and not yet freed.
    */
    pub fn live_contexts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn find(&self, name: &str, encoder: bool) -> Option<BuiltinCodec> {
        let id = CodecId::ALL.into_iter().find(|id| id.name() == name)?;
        if encoder && !ENCODERS.contains(&id) {
            return None;
        }
        Some(BuiltinCodec { id, encoder })
    }
}

/**
    Check that an encoder has the parameters it needs to open.
*/
fn validate_encoder(record: &CodecContext) -> std::result::Result<(), i32> {
    let ok = match record.media_type {
        MediaType::Video => {
            record.width > 0
                && record.height > 0
                && record.pix_fmt >= 0
                && record.time_base.num > 0
                && record.time_base.den > 0
        }
        MediaType::Audio => record.sample_rate > 0 && record.sample_fmt >= 0 && record.channels > 0,
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(averror::averror(averror::EINVAL))
    }
}

impl CodecLibrary for BuiltinLibrary {
    type Codec = BuiltinCodec;
    type Context = BuiltinContext;

    fn find_decoder(&self, name: &str) -> Option<BuiltinCodec> {
        self.find(name, false)
    }

    fn find_encoder(&self, name: &str) -> Option<BuiltinCodec> {
        self.find(name, true)
    }

    fn codec_info(&self, codec: &BuiltinCodec) -> CodecInfo {
        CodecInfo {
            id: codec.id.value(),
            name: codec.id.name().to_string(),
            long_name: Some(codec.id.long_name().to_string()),
            media_type: codec.id.media_type(),
        }
    }

    fn alloc_context(&self, codec: &BuiltinCodec) -> Option<BuiltinContext> {
        Some(BuiltinContext {
            record: CodecContext::for_codec(codec.id),
            open: false,
            _live: LiveGuard::new(&self.live),
        })
    }

    fn open(&self, context: &mut BuiltinContext, codec: &BuiltinCodec) -> std::result::Result<(), i32> {
        let record = &mut context.record;
        if codec.encoder {
            validate_encoder(record)?;
            if record.media_type.is_audio() {
                record.frame_size = encoder_frame_size(codec.id);
                if record.channel_layout == 0 {
                    record.channel_layout = beam_types::names::default_channel_layout(record.channels);
                }
            }
        }
        context.open = true;
        Ok(())
    }

    fn muxers(&self) -> Vec<FormatDescriptor> {
        let aac = CodecId::Aac.value();
        let h264 = CodecId::H264.value();
        vec![
            FormatDescriptor::new(Direction::Output, "adts")
                .with_long_name("ADTS AAC (Advanced Audio Coding)")
                .with_mime_type("audio/aac")
                .with_extensions("aac,adts")
                .with_flags(0x80)
                .with_codecs(aac, 0, 0),
            FormatDescriptor::new(Direction::Output, "hls")
                .with_long_name("Apple HTTP Live Streaming")
                .with_extensions("m3u8")
                .with_flags(0x1 | 0x4)
                .with_priv(0, "hls muxer")
                .with_codecs(aac, h264, 0),
            FormatDescriptor::new(Direction::Output, "matroska")
                .with_long_name("Matroska")
                .with_mime_type("video/x-matroska")
                .with_extensions("mkv")
                .with_flags(0x40 | 0x400 | 0x20000 | 0x40000)
                .with_priv(0, "matroska/webm muxer")
                .with_codecs(CodecId::Vorbis.value(), h264, 0x17000),
            FormatDescriptor::new(Direction::Output, "mp4")
                .with_long_name("MP4 (MPEG-4 Part 14)")
                .with_mime_type("video/mp4")
                .with_extensions("mp4")
                .with_flags(0x40 | 0x20000 | 0x40000)
                .with_priv(0, "mp4 muxer")
                .with_codecs(aac, h264, 0x17005),
            FormatDescriptor::new(Direction::Output, "mpegts")
                .with_long_name("MPEG-TS (MPEG-2 Transport Stream)")
                .with_mime_type("video/MP2T")
                .with_extensions("ts,m2t,m2ts,mts")
                .with_flags(0x400 | 0x20000)
                .with_priv(0, "MPEGTS muxer")
                .with_codecs(CodecId::Mp2.value(), CodecId::Mpeg2Video.value(), 0x17001),
            FormatDescriptor::new(Direction::Output, "null")
                .with_long_name("raw null video")
                .with_flags(0x1 | 0x80 | 0x400 | 0x800)
                .with_codecs(CodecId::PcmS16Le.value(), CodecId::RawVideo.value(), 0),
        ]
    }

    fn demuxers(&self) -> Vec<FormatDescriptor> {
        vec![
            FormatDescriptor::new(Direction::Input, "aac")
                .with_long_name("raw ADTS AAC (Advanced Audio Coding)")
                .with_extensions("aac")
                .with_flags(0x100 | 0x2000 | 0x4000)
                .with_raw_codec_id(CodecId::Aac.value()),
            FormatDescriptor::new(Direction::Input, "h264")
                .with_long_name("raw H.264 video")
                .with_extensions("h26l,h264,264,avc")
                .with_flags(0x100 | 0x2000 | 0x4000)
                .with_raw_codec_id(CodecId::H264.value()),
            FormatDescriptor::new(Direction::Input, "matroska,webm")
                .with_long_name("Matroska / WebM")
                .with_mime_type("audio/webm,audio/x-matroska,video/webm,video/x-matroska")
                .with_extensions("mkv,mk3d,mka,mks,webm"),
            FormatDescriptor::new(Direction::Input, "mov,mp4,m4a,3gp,3g2,mj2")
                .with_long_name("QuickTime / MOV")
                .with_extensions("mov,mp4,m4a,3gp,3g2,mj2,psp,m4b,ism,ismv,isma,f4v,avif,heic,heif")
                .with_flags(0x8000 | 0x4000000)
                .with_priv(0, "mov,mp4,m4a,3gp,3g2,mj2"),
            FormatDescriptor::new(Direction::Input, "mpegts")
                .with_long_name("MPEG-TS (MPEG-2 Transport Stream)")
                .with_flags(0x8)
                .with_priv(0, "mpegts demuxer"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use beam_types::Rational;

    use super::*;

    #[test]
    fn every_codec_decodes() {
        let lib = BuiltinLibrary::new();
        for id in CodecId::ALL {
            let codec = lib.find_decoder(id.name()).unwrap();
            assert_eq!(codec.id(), id);
            assert!(!codec.is_encoder());
        }
        assert!(lib.find_decoder("unknown_codec").is_none());
    }

    #[test]
    fn only_some_codecs_encode() {
        let lib = BuiltinLibrary::new();
        assert!(lib.find_encoder("aac").is_some());
        assert!(lib.find_encoder("h264").is_none());
    }

    #[test]
    fn contexts_are_counted() {
        let lib = BuiltinLibrary::new();
        let codec = lib.find_decoder("h264").unwrap();
        let a = lib.alloc_context(&codec).unwrap();
        let b = lib.alloc_context(&codec).unwrap();
        assert_eq!(lib.live_contexts(), 2);
        drop(a);
        assert_eq!(lib.clone().live_contexts(), 1);
        drop(b);
        assert_eq!(lib.live_contexts(), 0);
    }

    #[test]
    fn decoders_open_without_parameters() {
        let lib = BuiltinLibrary::new();
        let codec = lib.find_decoder("h264").unwrap();
        let mut ctx = lib.alloc_context(&codec).unwrap();
        assert!(!ctx.is_open());
        lib.open(&mut ctx, &codec).unwrap();
        assert!(ctx.is_open());
    }

    #[test]
    fn encoders_need_parameters() {
        let lib = BuiltinLibrary::new();
        let codec = lib.find_encoder("mpeg4").unwrap();
        let mut ctx = lib.alloc_context(&codec).unwrap();
        assert_eq!(lib.open(&mut ctx, &codec), Err(-22));
        assert_eq!(
            lib.error_message("Problem opening encoder: ", -22),
            "Problem opening encoder: Invalid argument"
        );

        let mut record = ctx.load_record();
        record.width = 640;
        record.height = 480;
        record.pix_fmt = 0;
        record.time_base = Rational::new(1, 25);
        ctx.store_record(&record).unwrap();
        assert_eq!(lib.open(&mut ctx, &codec), Ok(()));
    }

    #[test]
    fn audio_encoders_report_frame_size() {
        let lib = BuiltinLibrary::new();
        let codec = lib.find_encoder("aac").unwrap();
        let mut ctx = lib.alloc_context(&codec).unwrap();
        let mut record = ctx.load_record();
        record.sample_rate = 48000;
        record.sample_fmt = 8;
        record.channels = 2;
        ctx.store_record(&record).unwrap();
        lib.open(&mut ctx, &codec).unwrap();
        let record = ctx.load_record();
        assert_eq!(record.frame_size, 1024);
        assert_eq!(record.channel_layout, 0x3);
    }

    #[test]
    fn format_lists() {
        let lib = BuiltinLibrary::new();
        assert!(lib.muxers().iter().all(|f| f.direction == Direction::Output));
        assert!(lib.demuxers().iter().all(|f| f.direction == Direction::Input));
        assert!(lib.muxers().iter().any(|f| f.name == "mp4"));
    }
}
