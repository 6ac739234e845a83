/*!
    Native library error codes and their messages.

    Codes follow libavutil: negated errno values, plus four-character tags
    for library specific conditions.
*/

const fn tag(a: u8, b: u8, c: u8, d: u8) -> i32 {
    -((a as i32) | ((b as i32) << 8) | ((c as i32) << 16) | ((d as i32) << 24))
}

/**
    Convert a positive errno value into a native error code.
*/
pub const fn averror(errno: i32) -> i32 {
    -errno
}

pub const EPERM: i32 = 1;
pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const EAGAIN: i32 = 11;
pub const ENOMEM: i32 = 12;
pub const EINVAL: i32 = 22;
pub const ENOSYS: i32 = 38;

pub const AVERROR_BSF_NOT_FOUND: i32 = tag(0xF8, b'B', b'S', b'F');
pub const AVERROR_BUG: i32 = tag(b'B', b'U', b'G', b'!');
pub const AVERROR_DECODER_NOT_FOUND: i32 = tag(0xF8, b'D', b'E', b'C');
pub const AVERROR_ENCODER_NOT_FOUND: i32 = tag(0xF8, b'E', b'N', b'C');
pub const AVERROR_EOF: i32 = tag(b'E', b'O', b'F', b' ');
pub const AVERROR_INVALIDDATA: i32 = tag(b'I', b'N', b'D', b'A');
pub const AVERROR_PATCHWELCOME: i32 = tag(b'P', b'A', b'W', b'E');
pub const AVERROR_UNKNOWN: i32 = tag(b'U', b'N', b'K', b'N');
pub const AVERROR_EXPERIMENTAL: i32 = -0x2bb2afa8;

const MESSAGES: &[(i32, &str)] = &[
    (AVERROR_BSF_NOT_FOUND, "Bitstream filter not found"),
    (AVERROR_BUG, "Internal bug, should not have happened"),
    (AVERROR_DECODER_NOT_FOUND, "Decoder not found"),
    (AVERROR_ENCODER_NOT_FOUND, "Encoder not found"),
    (AVERROR_EOF, "End of file"),
    (AVERROR_EXPERIMENTAL, "Experimental feature"),
    (AVERROR_INVALIDDATA, "Invalid data found when processing input"),
    (AVERROR_PATCHWELCOME, "Not yet implemented in FFmpeg, patches welcome"),
    (AVERROR_UNKNOWN, "Unknown error occurred"),
    (averror(EPERM), "Operation not permitted"),
    (averror(ENOENT), "No such file or directory"),
    (averror(EIO), "Input/output error"),
    (averror(EAGAIN), "Resource temporarily unavailable"),
    (averror(ENOMEM), "Cannot allocate memory"),
    (averror(EINVAL), "Invalid argument"),
    (averror(ENOSYS), "Function not implemented"),
];

/**
    Describe a native error code.

    Unknown codes are described generically, never rejected.
*/
pub fn error_string(code: i32) -> String {
    MESSAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, m)| (*m).to_string())
        .unwrap_or_else(|| format!("Error number {code} occurred"))
}

/**
    Prefix a native error description with a message, e.g.
    `"Problem opening encoder: Invalid argument"`.
*/
pub fn native_error_message(base: &str, code: i32) -> String {
    format!("{base}{}", error_string(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_native_values() {
        assert_eq!(AVERROR_EOF, -0x2046_4f45);
        assert_eq!(AVERROR_INVALIDDATA, -0x4144_4e49);
        assert_eq!(averror(EINVAL), -22);
    }

    #[test]
    fn known_codes_are_described() {
        assert_eq!(error_string(averror(EINVAL)), "Invalid argument");
        assert_eq!(error_string(AVERROR_ENCODER_NOT_FOUND), "Encoder not found");
    }

    #[test]
    fn unknown_codes_are_described_generically() {
        assert_eq!(error_string(-123456), "Error number -123456 occurred");
    }

    #[test]
    fn message_is_prefixed() {
        assert_eq!(
            native_error_message("Problem opening encoder: ", averror(ENOMEM)),
            "Problem opening encoder: Cannot allocate memory"
        );
    }
}
