/*!
    Native name tables for pixel formats, sample formats, color metadata
    and channel layouts.

    These mirror the native library's own stringifier/parser pairs: the
    stringifier returns `None` for values it does not know, and the parser
    returns the library's invalid value for names it does not know. Neither
    side validates the other; callers decide what an invalid value means.
*/

/**
    A family of native integer constants with a stringifier/parser pair.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameFamily {
    PixelFormat,
    SampleFormat,
    ColorPrimaries,
    ColorTransfer,
    ColorSpace,
    ColorRange,
    ChromaLocation,
}

/**
    A native name table: a stringifier/parser pair over a family of
    integer constants.
*/
#[derive(Debug)]
pub struct NameTable {
    family: NameFamily,
    kind: &'static str,
    entries: &'static [(i32, &'static str)],
    invalid: i32,
}

impl NameTable {
    const fn new(
        family: NameFamily,
        kind: &'static str,
        entries: &'static [(i32, &'static str)],
        invalid: i32,
    ) -> Self {
        Self {
            family,
            kind,
            entries,
            invalid,
        }
    }

    pub fn family(&self) -> NameFamily {
        self.family
    }

    /**
        What this table names, e.g. `"pixel format"`.
    */
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /**
        The value the parser returns for unknown names.
    */
    pub fn invalid(&self) -> i32 {
        self.invalid
    }

    /**
        Name for a native value, `None` if the value is unknown.
    */
    pub fn name(&self, value: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    /**
        Native value for a name, [`NameTable::invalid`] if the name is unknown.
        The first entry wins when several values share a name.
    */
    pub fn parse(&self, name: &str) -> i32 {
        self.entries
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(value, _)| *value)
            .unwrap_or(self.invalid)
    }

    pub fn entries(&self) -> &'static [(i32, &'static str)] {
        self.entries
    }
}

const EINVAL: i32 = -22;

pub static PIXEL_FORMATS: NameTable = NameTable::new(
    NameFamily::PixelFormat,
    "pixel format",
    &[
        (0, "yuv420p"),
        (1, "yuyv422"),
        (2, "rgb24"),
        (3, "bgr24"),
        (4, "yuv422p"),
        (5, "yuv444p"),
        (6, "yuv410p"),
        (7, "yuv411p"),
        (8, "gray"),
        (9, "monow"),
        (10, "monob"),
        (11, "pal8"),
        (12, "yuvj420p"),
        (13, "yuvj422p"),
        (14, "yuvj444p"),
        (15, "uyvy422"),
        (16, "uyyvyy411"),
        (17, "bgr8"),
        (18, "bgr4"),
        (19, "bgr4_byte"),
        (20, "rgb8"),
        (21, "rgb4"),
        (22, "rgb4_byte"),
        (23, "nv12"),
        (24, "nv21"),
        (25, "argb"),
        (26, "rgba"),
        (27, "abgr"),
        (28, "bgra"),
    ],
    -1,
);

pub static SAMPLE_FORMATS: NameTable = NameTable::new(
    NameFamily::SampleFormat,
    "sample format",
    &[
        (0, "u8"),
        (1, "s16"),
        (2, "s32"),
        (3, "flt"),
        (4, "dbl"),
        (5, "u8p"),
        (6, "s16p"),
        (7, "s32p"),
        (8, "fltp"),
        (9, "dblp"),
        (10, "s64"),
        (11, "s64p"),
    ],
    -1,
);

pub static COLOR_PRIMARIES: NameTable = NameTable::new(
    NameFamily::ColorPrimaries,
    "color primaries",
    &[
        (0, "reserved"),
        (1, "bt709"),
        (2, "unknown"),
        (3, "reserved"),
        (4, "bt470m"),
        (5, "bt470bg"),
        (6, "smpte170m"),
        (7, "smpte240m"),
        (8, "film"),
        (9, "bt2020"),
        (10, "smpte428"),
        (11, "smpte431"),
        (12, "smpte432"),
        (22, "ebu3213"),
    ],
    EINVAL,
);

pub static COLOR_TRANSFER: NameTable = NameTable::new(
    NameFamily::ColorTransfer,
    "color transfer characteristic",
    &[
        (0, "reserved"),
        (1, "bt709"),
        (2, "unknown"),
        (3, "reserved"),
        (4, "bt470m"),
        (5, "bt470bg"),
        (6, "smpte170m"),
        (7, "smpte240m"),
        (8, "linear"),
        (9, "log100"),
        (10, "log316"),
        (11, "iec61966-2-4"),
        (12, "bt1361e"),
        (13, "iec61966-2-1"),
        (14, "bt2020-10"),
        (15, "bt2020-12"),
        (16, "smpte2084"),
        (17, "smpte428"),
        (18, "arib-std-b67"),
    ],
    EINVAL,
);

pub static COLOR_SPACES: NameTable = NameTable::new(
    NameFamily::ColorSpace,
    "color space",
    &[
        (0, "gbr"),
        (1, "bt709"),
        (2, "unknown"),
        (3, "reserved"),
        (4, "fcc"),
        (5, "bt470bg"),
        (6, "smpte170m"),
        (7, "smpte240m"),
        (8, "ycgco"),
        (9, "bt2020nc"),
        (10, "bt2020c"),
        (11, "smpte2085"),
        (12, "chroma-derived-nc"),
        (13, "chroma-derived-c"),
        (14, "ictcp"),
    ],
    EINVAL,
);

pub static COLOR_RANGES: NameTable = NameTable::new(
    NameFamily::ColorRange,
    "color range",
    &[(0, "unknown"), (1, "tv"), (2, "pc")],
    EINVAL,
);

pub static CHROMA_LOCATIONS: NameTable = NameTable::new(
    NameFamily::ChromaLocation,
    "chroma location",
    &[
        (0, "unspecified"),
        (1, "left"),
        (2, "center"),
        (3, "topleft"),
        (4, "top"),
        (5, "bottomleft"),
        (6, "bottom"),
    ],
    EINVAL,
);

const CHANNEL_NAMES: &[(u64, &str)] = &[
    (0x1, "FL"),
    (0x2, "FR"),
    (0x4, "FC"),
    (0x8, "LFE"),
    (0x10, "BL"),
    (0x20, "BR"),
    (0x40, "FLC"),
    (0x80, "FRC"),
    (0x100, "BC"),
    (0x200, "SL"),
    (0x400, "SR"),
];

const CHANNEL_LAYOUTS: &[(&str, u64)] = &[
    ("mono", 0x4),
    ("stereo", 0x3),
    ("2.1", 0xb),
    ("3.0", 0x7),
    ("3.0(back)", 0x103),
    ("4.0", 0x107),
    ("quad", 0x33),
    ("quad(side)", 0x603),
    ("3.1", 0xf),
    ("5.0", 0x37),
    ("5.0(side)", 0x607),
    ("4.1", 0x10f),
    ("5.1", 0x3f),
    ("5.1(side)", 0x60f),
    ("6.0", 0x707),
    ("7.0", 0x637),
    ("7.1", 0x63f),
];

/**
    Default layout for a channel count, `0` if there is none.
*/
pub fn default_channel_layout(channels: i32) -> u64 {
    match channels {
        1 => 0x4,
        2 => 0x3,
        3 => 0xb,
        4 => 0x107,
        5 => 0x37,
        6 => 0x3f,
        7 => 0x707,
        8 => 0x63f,
        _ => 0,
    }
}

/**
    Describe a channel layout the way the native stringifier does: the
    layout's name when it is a known layout, otherwise the channel count
    followed by the individual channel names.
*/
pub fn channel_layout_name(channels: i32, layout: u64) -> String {
    let count = if layout == 0 {
        channels
    } else {
        layout.count_ones() as i32
    };

    if layout != 0 && (channels <= 0 || channels == count) {
        if let Some((name, _)) = CHANNEL_LAYOUTS.iter().find(|(_, mask)| *mask == layout) {
            return (*name).to_string();
        }
    }

    let mut out = format!("{count} channels");
    if layout != 0 {
        let parts = CHANNEL_NAMES
            .iter()
            .filter(|(mask, _)| layout & mask != 0)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();
        if !parts.is_empty() {
            out.push_str(&format!(" ({})", parts.join("+")));
        }
    }
    out
}

/**
    Parse a channel layout description, returning `0` when it is not
    understood. Accepts layout names, channel counts (`"2"` or `"2c"`),
    hexadecimal masks (`"0x3"`) and `+`-joined channel names (`"FL+FR"`).
*/
pub fn parse_channel_layout(name: &str) -> u64 {
    let name = name.trim();
    if let Some((_, mask)) = CHANNEL_LAYOUTS.iter().find(|(n, _)| *n == name) {
        return *mask;
    }
    if let Some(hex) = name.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).unwrap_or(0);
    }
    let count = name.strip_suffix('c').unwrap_or(name);
    if let Ok(count) = count.parse::<i32>() {
        return default_channel_layout(count);
    }
    name.split('+').try_fold(0u64, |acc, part| {
        CHANNEL_NAMES
            .iter()
            .find(|(_, n)| *n == part)
            .map(|(mask, _)| acc | mask)
    })
    .unwrap_or(0)
}

/**
    Stringifier/parser hooks used by the marshalling engine for named
    constants and channel layouts.

    The defaults use the static tables of this module. A native library
    overrides them with its own lookups so that every value it knows can
    be named, including ones the tables do not list.
*/
pub trait NativeNames: Send + Sync {
    fn name(&self, table: &NameTable, value: i32) -> Option<String> {
        table.name(value).map(str::to_string)
    }

    fn parse(&self, table: &NameTable, name: &str) -> i32 {
        table.parse(name)
    }

    fn layout_name(&self, channels: i32, layout: u64) -> String {
        channel_layout_name(channels, layout)
    }

    fn parse_layout(&self, name: &str) -> u64 {
        parse_channel_layout(name)
    }
}

/**
    The static name tables.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct TableNames;

impl NativeNames for TableNames {}

pub static TABLE_NAMES: TableNames = TableNames;
