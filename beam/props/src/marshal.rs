/*!
    Conversion between codec configuration records and property bags.

    Both directions are a single loop over [`FIELDS`](crate::fields::FIELDS),
    skipping every field that is not visible under the requested mode and
    media type. Reads never fail. Writes stop at the first field that fails
    to convert and leave the record untouched.

    Named constants and channel layouts are converted through a
    [`NativeNames`] implementation. The plain functions use the static
    tables; the `_with` variants take the native library's own lookups.
*/

use beam_types::{Error, MediaType, Mode, NativeNames, Result, TABLE_NAMES};

use crate::enums::{ENUM_UNKNOWN, EnumDescriptor};
use crate::fields::{FIELDS, Field, Kind, visible_fields};
use crate::record::{CodecContext, MATRIX_LEN, Matrix, RcOverride};
use crate::value::{
    ArrayInput, PropertyBag, Value, get_array, get_bool, get_f64, get_i32, get_i64, get_rational,
    get_str, kind_name, value_to_i32, value_to_i64,
};

/// Type tag carried by every marshalled rate control override.
pub const RC_OVERRIDE_TYPE: &str = "RcOverride";

/**
    Read every visible field of `record` into a new property bag.
*/
pub fn record_to_bag(record: &CodecContext, mode: Mode, media: MediaType) -> PropertyBag {
    record_to_bag_with(record, mode, media, &TABLE_NAMES)
}

pub fn record_to_bag_with(
    record: &CodecContext,
    mode: Mode,
    media: MediaType,
    names: &dyn NativeNames,
) -> PropertyBag {
    let mut bag = PropertyBag::new();
    for field in visible_fields(mode, media) {
        if let Some(value) = read_field(field, record, names) {
            bag.insert(field.name.to_string(), value);
        }
    }
    bag
}

/**
    Write the supplied keys of `bag` into `record`.

    Only fields that are visible under `(mode, media)` and writable in
    `mode` are considered. Keys that are absent or `null` leave the record
    unchanged, as do keys the table does not know. On error the record is
    left exactly as it was.
*/
pub fn bag_to_record(
    bag: &PropertyBag,
    mode: Mode,
    media: MediaType,
    record: &mut CodecContext,
) -> Result<()> {
    bag_to_record_with(bag, mode, media, record, &TABLE_NAMES)
}

pub fn bag_to_record_with(
    bag: &PropertyBag,
    mode: Mode,
    media: MediaType,
    record: &mut CodecContext,
    names: &dyn NativeNames,
) -> Result<()> {
    let mut staged = record.clone();
    for field in FIELDS.iter().filter(|f| f.is_writable(mode, media)) {
        write_field(field, bag, &mut staged, names)?;
    }
    *record = staged;
    Ok(())
}

impl CodecContext {
    /**
        Read this record as a property bag, using its own media type.
    */
    pub fn to_bag(&self, mode: Mode) -> PropertyBag {
        record_to_bag(self, mode, self.media_type)
    }

    /**
        Apply a property bag to this record, using its own media type.
    */
    pub fn apply_bag(&mut self, bag: &PropertyBag, mode: Mode) -> Result<()> {
        self.apply_bag_with(bag, mode, &TABLE_NAMES)
    }

    pub fn to_bag_with(&self, mode: Mode, names: &dyn NativeNames) -> PropertyBag {
        record_to_bag_with(self, mode, self.media_type, names)
    }

    pub fn apply_bag_with(
        &mut self,
        bag: &PropertyBag,
        mode: Mode,
        names: &dyn NativeNames,
    ) -> Result<()> {
        let media = self.media_type;
        bag_to_record_with(bag, mode, media, self, names)
    }
}

fn read_field(field: &Field, record: &CodecContext, names: &dyn NativeNames) -> Option<Value> {
    let value = match field.kind {
        Kind::Int32 { get, .. } => Value::from(get(record)),
        Kind::Int64 { get, .. } => Value::from(get(record)),
        Kind::Float { get, .. } => Value::from(f64::from(get(record))),
        Kind::Rational { get, .. } => {
            let [num, den] = get(record).to_pair();
            Value::Array(vec![num.into(), den.into()])
        }
        Kind::Text { get } => get(record).map_or(Value::Null, Value::String),
        Kind::Flag(spec) => Value::Bool(spec.test(record.flag_word(spec.word))),
        Kind::Enum { desc, get, .. } => Value::String(desc.to_name(get(record)).to_string()),
        Kind::Named { table, get, .. } => {
            names.name(table, get(record)).map_or(Value::Null, Value::String)
        }
        Kind::Layout { get, .. } => Value::String(names.layout_name(record.channels, get(record))),
        Kind::Matrix { get, .. } => {
            let matrix = get(record)?;
            Value::Array(matrix.iter().map(|&v| Value::from(v)).collect())
        }
        Kind::IntList { get, .. } => Value::Array(get(record).into_iter().map(Value::from).collect()),
        Kind::RcOverrides => Value::Array(
            record
                .rc_override
                .iter()
                .map(|o| Value::Object(rc_override_to_bag(o)))
                .collect(),
        ),
    };
    Some(value)
}

fn rc_override_to_bag(o: &RcOverride) -> PropertyBag {
    let mut bag = PropertyBag::new();
    bag.insert("type".into(), RC_OVERRIDE_TYPE.into());
    bag.insert("start_frame".into(), o.start_frame.into());
    bag.insert("end_frame".into(), o.end_frame.into());
    bag.insert("qscale".into(), o.qscale.into());
    bag.insert("quality_factor".into(), f64::from(o.quality_factor).into());
    bag
}

fn write_field(
    field: &Field,
    bag: &PropertyBag,
    record: &mut CodecContext,
    names: &dyn NativeNames,
) -> Result<()> {
    let name = field.name;
    match field.kind {
        Kind::Int32 { set, .. } => {
            if let Some(v) = get_i32(bag, name)? {
                set(record, v);
            }
        }
        Kind::Int64 { set, .. } => {
            if let Some(v) = get_i64(bag, name)? {
                set(record, v);
            }
        }
        Kind::Float { set, .. } => {
            if let Some(v) = get_f64(bag, name)? {
                set(record, v as f32);
            }
        }
        Kind::Rational { set, .. } => {
            if let Some(v) = get_rational(bag, name)? {
                set(record, v);
            }
        }
        Kind::Text { .. } => {}
        Kind::Flag(spec) => {
            if let Some(on) = get_bool(bag, name)? {
                let word = record.flag_word_mut(spec.word);
                *word = spec.apply(*word, on);
            }
        }
        Kind::Enum { desc, set, .. } => {
            if let Some(v) = enum_value(desc, bag, name)? {
                set(record, v);
            }
        }
        Kind::Named { table, set, .. } => {
            // The native parser's invalid value is stored as is.
            if let Some(s) = get_str(bag, name)? {
                set(record, names.parse(table, s));
            }
        }
        Kind::Layout { set, .. } => {
            if let Some(s) = get_str(bag, name)? {
                set(record, names.parse_layout(s));
            }
        }
        Kind::Matrix { set, .. } => match get_array(bag, name) {
            ArrayInput::Absent => {}
            ArrayInput::Cleared => set(record, None),
            ArrayInput::Items(items) => set(record, Some(matrix_from(name, items)?)),
        },
        Kind::IntList { set, .. } => match get_array(bag, name) {
            ArrayInput::Absent => {}
            ArrayInput::Cleared => set(record, Vec::new()),
            ArrayInput::Items(items) => {
                let list = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| value_to_i32(&format!("{name}[{i}]"), v))
                    .collect::<Result<Vec<_>>>()?;
                set(record, list);
            }
        },
        Kind::RcOverrides => match get_array(bag, name) {
            ArrayInput::Absent => {}
            ArrayInput::Cleared => record.rc_override.clear(),
            ArrayInput::Items(items) => write_rc_overrides(name, items, &mut record.rc_override)?,
        },
    }
    Ok(())
}

/**
    Resolve an enum key given as a canonical name or a native integer.
    Unrecognized input leaves the field unchanged.
*/
fn enum_value(desc: &EnumDescriptor, bag: &PropertyBag, name: &str) -> Result<Option<i32>> {
    let value = match bag.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => desc.to_value(s),
        Some(v @ Value::Number(_)) => {
            let v = value_to_i32(name, v)?;
            if desc.contains(v) { v } else { ENUM_UNKNOWN }
        }
        Some(v) => return Err(Error::marshal(name, "string or number", kind_name(v))),
    };
    if value == ENUM_UNKNOWN {
        let shown = bag.get(name).unwrap_or(&Value::Null);
        tracing::warn!(
            field = name,
            family = desc.family(),
            value = %shown,
            "unrecognized enum value, leaving field unchanged"
        );
        return Ok(None);
    }
    Ok(Some(value))
}

fn matrix_from(name: &str, items: &[Value]) -> Result<Box<Matrix>> {
    if items.len() > MATRIX_LEN {
        return Err(Error::marshal_size(name, MATRIX_LEN, items.len()));
    }
    let mut matrix = Box::new([0u16; MATRIX_LEN]);
    for (i, (slot, item)) in matrix.iter_mut().zip(items).enumerate() {
        if item.is_number() {
            let v = value_to_i64(name, item)?;
            *slot = u16::try_from(v).map_err(|_| {
                Error::marshal(&format!("{name}[{i}]"), "integer in 0..=65535", &v.to_string())
            })?;
        }
    }
    Ok(matrix)
}

fn write_rc_overrides(name: &str, items: &[Value], overrides: &mut Vec<RcOverride>) -> Result<()> {
    overrides.resize(items.len(), RcOverride::default());
    for (i, (item, entry)) in items.iter().zip(overrides.iter_mut()).enumerate() {
        let Value::Object(element) = item else {
            return Err(Error::marshal(&format!("{name}[{i}]"), "object", kind_name(item)));
        };
        if let Some(v) = get_i32(element, "start_frame")? {
            entry.start_frame = v;
        }
        if let Some(v) = get_i32(element, "end_frame")? {
            entry.end_frame = v;
        }
        if let Some(v) = get_i32(element, "qscale")? {
            entry.qscale = v;
        }
        if let Some(v) = get_f64(element, "quality_factor")? {
            entry.quality_factor = v as f32;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use beam_types::{CodecId, ErrorKind, NameTable, Rational};
    use serde_json::json;

    use super::*;
    use crate::fields::Access;

    fn bag(value: Value) -> PropertyBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn h264() -> CodecContext {
        CodecContext::for_codec(CodecId::H264)
    }

    fn aac() -> CodecContext {
        CodecContext::for_codec(CodecId::Aac)
    }

    #[test]
    fn decoder_bag_starts_with_identity() {
        let props = record_to_bag(&h264(), Mode::Decoding, MediaType::Video);
        let keys = props.keys().take(5).map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, ["codec_id", "name", "long_name", "codec_type", "codec_tag"]);
        assert_eq!(props["codec_id"], json!(27));
        assert_eq!(props["name"], json!("h264"));
        assert_eq!(props["codec_type"], json!("video"));
    }

    #[test]
    fn scalar_round_trip() {
        let mut ctx = h264();
        let input = bag(json!({
            "bit_rate": 4_000_000,
            "width": 1920,
            "height": 1080,
            "gop_size": 50,
            "b_quant_factor": 1.5,
            "time_base": [1, 25],
            "pix_fmt": "yuv420p",
            "me_cmp": "satd",
            "field_order": "progressive",
            "qcompress": 0.75,
        }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        for (key, value) in &input {
            assert_eq!(&out[key], value, "{key}");
        }
        assert_eq!(ctx.time_base, Rational::new(1, 25));
        assert_eq!(ctx.pix_fmt, 0);
        assert_eq!(ctx.me_cmp, 2);
    }

    #[test]
    fn audio_round_trip() {
        let mut ctx = aac();
        let input = bag(json!({
            "sample_rate": 48000,
            "channels": 2,
            "sample_fmt": "fltp",
            "channel_layout": "stereo",
            "audio_service_type": "dialogue",
            "cutoff": 18000,
        }));
        bag_to_record(&input, Mode::Encoding, MediaType::Audio, &mut ctx).unwrap();
        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Audio);
        for (key, value) in &input {
            assert_eq!(&out[key], value, "{key}");
        }
        assert_eq!(ctx.channel_layout, 0x3);
    }

    #[test]
    fn decoding_never_touches_encode_only_fields() {
        let mut ctx = h264();
        let before = ctx.clone();
        let input = bag(json!({
            "gop_size": 99,
            "qmin": 10,
            "me_cmp": "rd",
            "time_base": [1, 30],
            "rc_override": [{ "start_frame": 1 }],
            "refs": 4,
        }));
        bag_to_record(&input, Mode::Decoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx, before);

        let out = record_to_bag(&ctx, Mode::Decoding, MediaType::Video);
        for key in ["gop_size", "qmin", "me_cmp", "time_base", "rc_override"] {
            assert!(!out.contains_key(key), "{key}");
        }
        // Visible but owned by the library while decoding
        assert_eq!(out["refs"], json!(1));
    }

    #[test]
    fn media_type_gates_both_paths() {
        let mut ctx = aac();
        let before = ctx.clone();
        let input = bag(json!({ "width": 640, "pix_fmt": "rgb24", "GRAY": true }));
        bag_to_record(&input, Mode::Encoding, MediaType::Audio, &mut ctx).unwrap();
        assert_eq!(ctx.width, before.width);
        assert_eq!(ctx.pix_fmt, before.pix_fmt);
        assert!(ctx.flags & (1 << 13) != 0);

        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Audio);
        assert!(!out.contains_key("width"));
        assert!(!out.contains_key("delay"));
        assert!(out.contains_key("sample_rate"));

        let out = record_to_bag(&h264(), Mode::Decoding, MediaType::Video);
        assert!(!out.contains_key("sample_rate"));
    }

    #[test]
    fn visible_keys_are_exactly_the_visible_fields() {
        for mode in Mode::ALL {
            for media in [MediaType::Video, MediaType::Audio, MediaType::Data] {
                let mut ctx = CodecContext::new(27, media);
                ctx.intra_matrix = Some(Box::new([1; MATRIX_LEN]));
                ctx.inter_matrix = Some(Box::new([1; MATRIX_LEN]));
                let out = record_to_bag(&ctx, mode, media);
                let expected = visible_fields(mode, media).map(|f| f.name).collect::<Vec<_>>();
                let actual = out.keys().map(String::as_str).collect::<Vec<_>>();
                assert_eq!(actual, expected, "{mode:?} {media:?}");
            }
        }
    }

    #[test]
    fn omitted_flags_are_preserved() {
        let mut ctx = h264();
        ctx.flags = (1 << 22) | (1 << 13) | (1 << 31);
        ctx.flags2 = 1;
        let input = bag(json!({ "GRAY": false }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.flags, (1 << 22) | (1 << 31));
        assert_eq!(ctx.flags2, 1);

        let input = bag(json!({ "CLOSED_GOP": false, "SHOW_ALL": true }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.flags, 1 << 22);
        assert_eq!(ctx.flags2, 1 | (1 << 22));
    }

    #[test]
    fn flags_read_as_booleans() {
        let mut ctx = h264();
        ctx.flags = 1 << 22;
        ctx.slice_flags = 0x2;
        let out = record_to_bag(&ctx, Mode::Decoding, MediaType::Video);
        assert_eq!(out["GLOBAL_HEADER"], json!(true));
        assert_eq!(out["BITEXACT"], json!(false));
        assert_eq!(out["SLICE_FLAG_ALLOW_FIELD"], json!(true));
        assert_eq!(out["SLICE_FLAG_CODED_ORDER"], json!(false));
    }

    #[test]
    fn omitted_floats_are_unchanged() {
        let mut ctx = h264();
        ctx.lumi_masking = 0.25;
        let input = bag(json!({ "p_masking": 0.5, "lumi_masking": null }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.lumi_masking, 0.25);
        assert_eq!(ctx.p_masking, 0.5);
    }

    #[test]
    fn float_fields_are_independent() {
        let mut ctx = h264();
        let input = bag(json!({ "dark_masking": 0.125 }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.dark_masking, 0.125);
        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        assert_eq!(out["dark_masking"], json!(0.125));
    }

    #[test]
    fn rc_override_round_trip() {
        let mut ctx = h264();
        let input = bag(json!({
            "rc_override": [
                { "start_frame": 0, "end_frame": 10, "qscale": 2, "quality_factor": 1.0 },
                { "start_frame": 11, "end_frame": 20, "qscale": 0, "quality_factor": 0.5 },
                { "start_frame": 21, "end_frame": 30, "qscale": 5, "quality_factor": 1.25 },
            ]
        }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.rc_override.len(), 3);

        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        let Value::Array(entries) = &out["rc_override"] else {
            panic!("rc_override is an array");
        };
        assert_eq!(entries.len(), 3);
        for (entry, original) in entries.iter().zip(input["rc_override"].as_array().unwrap()) {
            assert_eq!(entry["type"], json!("RcOverride"));
            for key in ["start_frame", "end_frame", "qscale", "quality_factor"] {
                assert_eq!(entry[key], original[key], "{key}");
            }
        }
    }

    #[test]
    fn rc_override_resizes_and_keeps_unsupplied_fields() {
        let mut ctx = h264();
        ctx.rc_override = vec![
            RcOverride {
                start_frame: 1,
                end_frame: 2,
                qscale: 3,
                quality_factor: 0.5,
            };
            4
        ];
        let input = bag(json!({ "rc_override": [{ "qscale": 9 }] }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(
            ctx.rc_override,
            vec![RcOverride {
                start_frame: 1,
                end_frame: 2,
                qscale: 9,
                quality_factor: 0.5,
            }]
        );
    }

    #[test]
    fn rc_override_rejects_non_objects() {
        let mut ctx = h264();
        let input = bag(json!({ "rc_override": [{ "qscale": 1 }, 7] }));
        let err = bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
        assert!(err.message().contains("rc_override[1]"));
        assert!(ctx.rc_override.is_empty());
    }

    #[test]
    fn matrices_pad_clear_and_reject_oversize() {
        let mut ctx = h264();
        let input = bag(json!({ "intra_matrix": [8, 16, "x", 19] }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        let matrix = ctx.intra_matrix.as_deref().unwrap();
        assert_eq!(&matrix[..5], &[8, 16, 0, 19, 0]);

        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        assert_eq!(out["intra_matrix"].as_array().unwrap().len(), MATRIX_LEN);
        assert!(!out.contains_key("inter_matrix"));

        let input = bag(json!({ "intra_matrix": null }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert!(ctx.intra_matrix.is_none());

        let input = bag(json!({ "inter_matrix": vec![1; 65] }));
        let err = bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap_err();
        assert!(err.message().contains("inter_matrix"));
    }

    #[test]
    fn matrix_entries_outside_u16_are_rejected() {
        let mut ctx = h264();
        let before = ctx.clone();
        let input = bag(json!({ "intra_matrix": [70000, -1] }));
        let err = bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
        assert!(err.message().contains("intra_matrix[0]"));
        assert_eq!(ctx, before);

        let input = bag(json!({ "inter_matrix": [16, -1] }));
        let err = bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap_err();
        assert!(err.message().contains("inter_matrix[1]"));
        assert_eq!(ctx, before);

        let input = bag(json!({ "inter_matrix": [0, 65535] }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(&ctx.inter_matrix.as_deref().unwrap()[..2], &[0, 65535]);
    }

    #[test]
    fn slice_offsets_written_by_decoders() {
        let mut ctx = h264();
        let input = bag(json!({ "slice_offset": [0, 128, 256] }));
        bag_to_record(&input, Mode::Decoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.slice_offset, [0, 128, 256]);

        let input = bag(json!({ "slice_offset": false }));
        bag_to_record(&input, Mode::Decoding, MediaType::Video, &mut ctx).unwrap();
        assert!(ctx.slice_offset.is_empty());
    }

    #[test]
    fn enums_accept_names_and_integers() {
        let mut ctx = h264();
        let input = bag(json!({ "mb_decision": 2, "mb_cmp": "chroma" }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.mb_decision, 2);
        assert_eq!(ctx.mb_cmp, 256);
    }

    #[test]
    fn unknown_enum_names_leave_field_unchanged() {
        let mut ctx = h264();
        ctx.me_cmp = 1;
        let input = bag(json!({ "me_cmp": "quantum", "me_sub_cmp": 77, "dia_size": 2 }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.me_cmp, 1);
        assert_eq!(ctx.me_sub_cmp, 0);
        assert_eq!(ctx.dia_size, 2);
    }

    #[test]
    fn unknown_enum_values_read_as_unknown() {
        let mut ctx = h264();
        ctx.me_cmp = 1234;
        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        assert_eq!(out["me_cmp"], json!("unknown"));
    }

    #[test]
    fn unparseable_native_names_store_sentinel() {
        let mut ctx = h264();
        let input = bag(json!({ "pix_fmt": "nonsense", "color_primaries": "nonsense" }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.pix_fmt, -1);
        assert_eq!(ctx.color_primaries, -22);

        let out = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
        assert_eq!(out["pix_fmt"], Value::Null);
        assert_eq!(out["color_primaries"], Value::Null);
    }

    struct TaggedNames;

    impl NativeNames for TaggedNames {
        fn name(&self, table: &NameTable, value: i32) -> Option<String> {
            Some(format!("{}#{value}", table.kind()))
        }

        fn parse(&self, _table: &NameTable, name: &str) -> i32 {
            name.len() as i32
        }

        fn layout_name(&self, channels: i32, _layout: u64) -> String {
            format!("{channels}ch")
        }

        fn parse_layout(&self, name: &str) -> u64 {
            name.len() as u64
        }
    }

    #[test]
    fn native_names_replace_the_tables() {
        let mut ctx = h264();
        ctx.pix_fmt = 300;
        let out = record_to_bag_with(&ctx, Mode::Encoding, MediaType::Video, &TaggedNames);
        assert_eq!(out["pix_fmt"], json!("pixel format#300"));

        let input = bag(json!({ "pix_fmt": "abcd", "color_range": "ab" }));
        ctx.apply_bag_with(&input, Mode::Encoding, &TaggedNames).unwrap();
        assert_eq!(ctx.pix_fmt, 4);
        assert_eq!(ctx.color_range, 2);

        let mut audio = aac();
        let input = bag(json!({ "channel_layout": "abc" }));
        audio.apply_bag_with(&input, Mode::Encoding, &TaggedNames).unwrap();
        assert_eq!(audio.channel_layout, 3);
        let out = audio.to_bag_with(Mode::Encoding, &TaggedNames);
        assert_eq!(out["channel_layout"], json!(format!("{}ch", audio.channels)));
    }

    #[test]
    fn color_trc_uses_its_own_key() {
        let mut ctx = h264();
        let input = bag(json!({ "color_trc": "smpte2084", "colorspace": "bt2020nc" }));
        bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap();
        assert_eq!(ctx.color_trc, 16);
        assert_eq!(ctx.colorspace, 9);
    }

    #[test]
    fn failure_leaves_record_untouched() {
        let mut ctx = h264();
        let before = ctx.clone();
        let input = bag(json!({ "bit_rate": 1, "width": 640, "qmax": "high" }));
        let err = bag_to_record(&input, Mode::Encoding, MediaType::Video, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
        assert_eq!(err.message(), "property 'qmax' expected number but got string");
        assert_eq!(ctx, before);
    }

    #[test]
    fn read_only_fields_ignore_writes() {
        let mut ctx = aac();
        let before = ctx.clone();
        let input = bag(json!({ "codec_id": 1, "name": "mp3", "frame_size": 1024 }));
        bag_to_record(&input, Mode::Encoding, MediaType::Audio, &mut ctx).unwrap();
        assert_eq!(ctx, before);
    }

    #[test]
    fn read_only_fields_are_not_written_in_any_mode() {
        for field in FIELDS.iter().filter(|f| f.access == Access::ReadOnly) {
            for mode in Mode::ALL {
                assert!(!field.access.is_writable(mode), "{}", field.name);
            }
        }
    }

    #[test]
    fn context_helpers_use_own_media_type() {
        let mut ctx = aac();
        ctx.apply_bag(&bag(json!({ "sample_rate": 44100 })), Mode::Decoding)
            .unwrap();
        assert_eq!(ctx.sample_rate, 44100);
        assert_eq!(ctx.to_bag(Mode::Decoding)["sample_rate"], json!(44100));
    }
}
