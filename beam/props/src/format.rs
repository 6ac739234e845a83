/*!
    Container format descriptors.

    Muxers (output formats) and demuxers (input formats) are projected to
    read-only property bags. The visible format flags depend on the
    direction, since most flags only mean something to one side.
*/

use beam_types::codec_name;

use crate::flags;
use crate::value::{PropertyBag, Value};

/**
    Whether a container format reads (demuxer) or writes (muxer) media.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Input => "InputFormat",
            Self::Output => "OutputFormat",
        }
    }
}

/**
    One named container format flag and the directions it applies to.
*/
#[derive(Clone, Copy, Debug)]
pub struct FormatFlag {
    pub name: &'static str,
    pub mask: u32,
    pub input: bool,
    pub output: bool,
}

impl FormatFlag {
    const fn both(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            input: true,
            output: true,
        }
    }

    const fn input(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            input: true,
            output: false,
        }
    }

    const fn output(name: &'static str, mask: u32) -> Self {
        Self {
            name,
            mask,
            input: false,
            output: true,
        }
    }

    pub const fn applies_to(&self, direction: Direction) -> bool {
        match direction {
            Direction::Input => self.input,
            Direction::Output => self.output,
        }
    }
}

pub const FORMAT_FLAGS: &[FormatFlag] = &[
    FormatFlag::both("NOFILE", 0x0001),
    FormatFlag::both("NEEDNUMBER", 0x0002),
    FormatFlag::input("SHOW_IDS", 0x0008),
    FormatFlag::output("GLOBALHEADER", 0x0040),
    FormatFlag::output("NOTIMESTAMPS", 0x0080),
    FormatFlag::input("GENERIC_INDEX", 0x0100),
    FormatFlag::input("TS_DISCONT", 0x0200),
    FormatFlag::output("VARIABLE_FPS", 0x0400),
    FormatFlag::output("NODIMENSIONS", 0x0800),
    FormatFlag::output("NOSTREAMS", 0x1000),
    FormatFlag::input("NOBINSEARCH", 0x2000),
    FormatFlag::input("NOGENSEARCH", 0x4000),
    FormatFlag::input("NO_BYTE_SEEK", 0x8000),
    FormatFlag::output("ALLOW_FLUSH", 0x10000),
    FormatFlag::output("TS_NONSTRICT", 0x20000),
    FormatFlag::output("TS_NEGATIVE", 0x40000),
    FormatFlag::input("SEEK_TO_PTS", 0x4000000),
];

/**
    A muxer or demuxer as registered with the codec library.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub direction: Direction,
    pub name: String,
    pub long_name: Option<String>,
    pub mime_type: Option<String>,
    /// Comma separated file extensions.
    pub extensions: Option<String>,
    pub flags: u32,
    pub priv_data_size: i32,
    pub priv_class: Option<String>,
    /// Demuxers only.
    pub raw_codec_id: i32,
    /// Muxers only: default codec ids per media type.
    pub audio_codec: i32,
    pub video_codec: i32,
    pub subtitle_codec: i32,
}

impl FormatDescriptor {
    pub fn new(direction: Direction, name: impl Into<String>) -> Self {
        Self {
            direction,
            name: name.into(),
            long_name: None,
            mime_type: None,
            extensions: None,
            flags: 0,
            priv_data_size: 0,
            priv_class: None,
            raw_codec_id: 0,
            audio_codec: 0,
            video_codec: 0,
            subtitle_codec: 0,
        }
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_extensions(mut self, extensions: impl Into<String>) -> Self {
        self.extensions = Some(extensions.into());
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_priv(mut self, size: i32, class: impl Into<String>) -> Self {
        self.priv_data_size = size;
        self.priv_class = Some(class.into());
        self
    }

    /**
        Default codecs of a muxer, as native codec ids.
    */
    pub fn with_codecs(mut self, audio: i32, video: i32, subtitle: i32) -> Self {
        self.audio_codec = audio;
        self.video_codec = video;
        self.subtitle_codec = subtitle;
        self
    }

    pub fn with_raw_codec_id(mut self, id: i32) -> Self {
        self.raw_codec_id = id;
        self
    }

    /**
        Project this format to a property bag.
    */
    pub fn to_bag(&self) -> PropertyBag {
        let text = |s: &Option<String>| Value::String(s.clone().unwrap_or_default());

        let mut bag = PropertyBag::new();
        bag.insert("type".into(), self.direction.type_name().into());
        bag.insert("name".into(), self.name.clone().into());
        bag.insert("long_name".into(), text(&self.long_name));
        bag.insert("mime_type".into(), text(&self.mime_type));
        bag.insert("extensions".into(), text(&self.extensions));
        bag.insert(
            "flags".into(),
            Value::Object(format_flags_to_bag(self.flags, self.direction)),
        );
        match self.direction {
            Direction::Input => {
                bag.insert("raw_codec_id".into(), self.raw_codec_id.into());
                bag.insert("priv_data_size".into(), self.priv_data_size.into());
                bag.insert("priv_class".into(), text(&self.priv_class));
            }
            Direction::Output => {
                bag.insert("priv_data_size".into(), self.priv_data_size.into());
                bag.insert("priv_class".into(), text(&self.priv_class));
                bag.insert("audio_codec".into(), codec_name(self.audio_codec).into());
                bag.insert("video_codec".into(), codec_name(self.video_codec).into());
                bag.insert(
                    "subtitle_codec".into(),
                    codec_name(self.subtitle_codec).into(),
                );
            }
        }
        bag
    }
}

/**
    The format flags that apply to `direction`, one boolean key each.
*/
pub fn format_flags_to_bag(word: u32, direction: Direction) -> PropertyBag {
    FORMAT_FLAGS
        .iter()
        .filter(|f| f.applies_to(direction))
        .map(|f| (f.name.to_string(), Value::Bool(flags::test(word, f.mask))))
        .collect()
}

/**
    Project a list of formats to a bag keyed by format name.
*/
pub fn formats_to_bag<'a>(formats: impl IntoIterator<Item = &'a FormatDescriptor>) -> PropertyBag {
    formats
        .into_iter()
        .map(|f| (f.name.clone(), Value::Object(f.to_bag())))
        .collect()
}
