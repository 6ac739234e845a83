/*!
    Codec mode and media type.
*/

/**
    Whether a codec context is being configured for encoding or decoding.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Encoding,
    Decoding,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Encoding, Self::Decoding];

    pub const fn is_encoding(self) -> bool {
        matches!(self, Self::Encoding)
    }

    /**
        The result type tag for contexts opened in this mode.
    */
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Encoding => "encoder",
            Self::Decoding => "decoder",
        }
    }
}

/**
    Media type of a codec, numbered as the native library numbers them.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaType {
    Unknown,
    Video,
    Audio,
    Data,
    Subtitle,
    Attachment,
}

impl MediaType {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Video,
        Self::Audio,
        Self::Data,
        Self::Subtitle,
        Self::Attachment,
    ];

    pub const fn value(self) -> i32 {
        match self {
            Self::Unknown => -1,
            Self::Video => 0,
            Self::Audio => 1,
            Self::Data => 2,
            Self::Subtitle => 3,
            Self::Attachment => 4,
        }
    }

    pub const fn from_value(value: i32) -> Self {
        match value {
            0 => Self::Video,
            1 => Self::Audio,
            2 => Self::Data,
            3 => Self::Subtitle,
            4 => Self::Attachment,
            _ => Self::Unknown,
        }
    }

    /**
        The native media type string, `None` for unknown media.
    */
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Video => Some("video"),
            Self::Audio => Some("audio"),
            Self::Data => Some("data"),
            Self::Subtitle => Some("subtitle"),
            Self::Attachment => Some("attachment"),
        }
    }

    pub const fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }

    pub const fn is_audio(self) -> bool {
        matches!(self, Self::Audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_values_round_trip() {
        for media in MediaType::ALL {
            assert_eq!(MediaType::from_value(media.value()), media);
        }
        assert_eq!(MediaType::from_value(77), MediaType::Unknown);
    }

    #[test]
    fn media_type_names() {
        assert_eq!(MediaType::Video.name(), Some("video"));
        assert_eq!(MediaType::Unknown.name(), None);
    }

    #[test]
    fn mode_type_names() {
        assert_eq!(Mode::Encoding.type_name(), "encoder");
        assert_eq!(Mode::Decoding.type_name(), "decoder");
        assert!(Mode::Encoding.is_encoding());
    }
}
