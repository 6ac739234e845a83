/*!
    Codec identification.
*/

use crate::MediaType;

/**
    Codec identifiers, numbered as the native library numbers them.

    This is a subset of codecs commonly used in media pipelines.
    Not all FFmpeg codecs are represented.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    // Video codecs
    /// MPEG-1 Video
    Mpeg1Video,
    /// MPEG-2 Video
    Mpeg2Video,
    /// H.263
    H263,
    /// Motion JPEG
    Mjpeg,
    /// MPEG-4 Part 2
    Mpeg4,
    /// Uncompressed video
    RawVideo,
    /// H.264 / AVC
    H264,
    /// Theora
    Theora,
    /// PNG image
    Png,
    /// VP8
    Vp8,
    /// VP9
    Vp9,
    /// H.265 / HEVC
    Hevc,
    /// AV1
    Av1,

    // Audio codecs
    /// PCM signed 16-bit little-endian
    PcmS16Le,
    /// PCM signed 16-bit big-endian
    PcmS16Be,
    /// MP2 (MPEG Audio Layer 2)
    Mp2,
    /// MP3 (MPEG Audio Layer 3)
    Mp3,
    /// AAC (Advanced Audio Coding)
    Aac,
    /// AC-3 (Dolby Digital)
    Ac3,
    /// Vorbis
    Vorbis,
    /// FLAC (Free Lossless Audio Codec)
    Flac,
    /// Opus
    Opus,
}

/// Name the native library reports for ids it does not know.
pub const UNKNOWN_CODEC_NAME: &str = "unknown_codec";

impl CodecId {
    pub const ALL: [Self; 22] = [
        Self::Mpeg1Video,
        Self::Mpeg2Video,
        Self::H263,
        Self::Mjpeg,
        Self::Mpeg4,
        Self::RawVideo,
        Self::H264,
        Self::Theora,
        Self::Png,
        Self::Vp8,
        Self::Vp9,
        Self::Hevc,
        Self::Av1,
        Self::PcmS16Le,
        Self::PcmS16Be,
        Self::Mp2,
        Self::Mp3,
        Self::Aac,
        Self::Ac3,
        Self::Vorbis,
        Self::Flac,
        Self::Opus,
    ];

    /**
        The native numeric id.
    */
    pub const fn value(self) -> i32 {
        match self {
            Self::Mpeg1Video => 1,
            Self::Mpeg2Video => 2,
            Self::H263 => 4,
            Self::Mjpeg => 7,
            Self::Mpeg4 => 12,
            Self::RawVideo => 13,
            Self::H264 => 27,
            Self::Theora => 30,
            Self::Png => 61,
            Self::Vp8 => 139,
            Self::Vp9 => 167,
            Self::Hevc => 173,
            Self::Av1 => 226,
            Self::PcmS16Le => 0x10000,
            Self::PcmS16Be => 0x10001,
            Self::Mp2 => 0x15000,
            Self::Mp3 => 0x15001,
            Self::Aac => 0x15002,
            Self::Ac3 => 0x15003,
            Self::Vorbis => 0x15005,
            Self::Flac => 0x1500c,
            Self::Opus => 0x1503c,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.value() == value)
    }

    /**
        The canonical short name, as used for codec lookup by name.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mpeg1Video => "mpeg1video",
            Self::Mpeg2Video => "mpeg2video",
            Self::H263 => "h263",
            Self::Mjpeg => "mjpeg",
            Self::Mpeg4 => "mpeg4",
            Self::RawVideo => "rawvideo",
            Self::H264 => "h264",
            Self::Theora => "theora",
            Self::Png => "png",
            Self::Vp8 => "vp8",
            Self::Vp9 => "vp9",
            Self::Hevc => "hevc",
            Self::Av1 => "av1",
            Self::PcmS16Le => "pcm_s16le",
            Self::PcmS16Be => "pcm_s16be",
            Self::Mp2 => "mp2",
            Self::Mp3 => "mp3",
            Self::Aac => "aac",
            Self::Ac3 => "ac3",
            Self::Vorbis => "vorbis",
            Self::Flac => "flac",
            Self::Opus => "opus",
        }
    }

    pub const fn long_name(self) -> &'static str {
        match self {
            Self::Mpeg1Video => "MPEG-1 video",
            Self::Mpeg2Video => "MPEG-2 video",
            Self::H263 => "H.263 / H.263-1996, H.263+ / H.263-1998 / H.263 version 2",
            Self::Mjpeg => "Motion JPEG",
            Self::Mpeg4 => "MPEG-4 part 2",
            Self::RawVideo => "raw video",
            Self::H264 => "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
            Self::Theora => "Theora",
            Self::Png => "PNG (Portable Network Graphics) image",
            Self::Vp8 => "On2 VP8",
            Self::Vp9 => "Google VP9",
            Self::Hevc => "H.265 / HEVC (High Efficiency Video Coding)",
            Self::Av1 => "Alliance for Open Media AV1",
            Self::PcmS16Le => "PCM signed 16-bit little-endian",
            Self::PcmS16Be => "PCM signed 16-bit big-endian",
            Self::Mp2 => "MP2 (MPEG audio layer 2)",
            Self::Mp3 => "MP3 (MPEG audio layer 3)",
            Self::Aac => "AAC (Advanced Audio Coding)",
            Self::Ac3 => "ATSC A/52A (AC-3)",
            Self::Vorbis => "Vorbis",
            Self::Flac => "FLAC (Free Lossless Audio Codec)",
            Self::Opus => "Opus (Opus Interactive Audio Codec)",
        }
    }

    pub const fn media_type(self) -> MediaType {
        if self.is_video() {
            MediaType::Video
        } else {
            MediaType::Audio
        }
    }

    /**
        Returns true if this is a video codec.
    */
    pub const fn is_video(self) -> bool {
        matches!(
            self,
            Self::Mpeg1Video
                | Self::Mpeg2Video
                | Self::H263
                | Self::Mjpeg
                | Self::Mpeg4
                | Self::RawVideo
                | Self::H264
                | Self::Theora
                | Self::Png
                | Self::Vp8
                | Self::Vp9
                | Self::Hevc
                | Self::Av1
        )
    }

    /**
        Returns true if this is an audio codec.
    */
    pub const fn is_audio(self) -> bool {
        !self.is_video()
    }

    /**
        Returns true if this is a lossless codec.
    */
    pub const fn is_lossless(self) -> bool {
        matches!(
            self,
            Self::Flac | Self::PcmS16Le | Self::PcmS16Be | Self::RawVideo | Self::Png
        )
    }
}

/**
    Name for a native codec id, mirroring the native lookup: id `0` is
    `"none"` and ids outside the table are [`UNKNOWN_CODEC_NAME`].
*/
pub fn codec_name(id: i32) -> &'static str {
    if id == 0 {
        return "none";
    }
    CodecId::from_value(id)
        .map(CodecId::name)
        .unwrap_or(UNKNOWN_CODEC_NAME)
}
