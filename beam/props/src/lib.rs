/*!
    Property marshalling for the beam codec bridge.

    Converts between a [`CodecContext`], the typed mirror of a native codec
    configuration record, and a [`PropertyBag`], the loosely typed key/value
    form handed to callers.

    # Overview

    - [`value`] - Property bag values and typed key accessors
    - [`enums`] - Name tables for enumerated native constants
    - [`flags`] - Flag words exposed as independent boolean keys
    - [`fields`] - The declarative field table with visibility predicates
    - [`record_to_bag`] and [`bag_to_record`] - The marshalling engine
    - [`format`] - Container format descriptors

    # Example

    ```
    use beam_props::{CodecContext, bag_of, bag_to_record, record_to_bag};
    use beam_types::{CodecId, MediaType, Mode};

    let mut ctx = CodecContext::for_codec(CodecId::H264);
    bag_to_record(&bag_of("width", 1280), Mode::Encoding, MediaType::Video, &mut ctx).unwrap();

    let props = record_to_bag(&ctx, Mode::Encoding, MediaType::Video);
    assert_eq!(props["width"], 1280);
    ```
*/

pub mod enums;
pub mod fields;
pub mod flags;
pub mod format;
mod marshal;
mod record;
pub mod value;

pub use enums::{ENUM_UNKNOWN, EnumDescriptor};
pub use fields::{Access, FIELDS, Field, Kind};
pub use format::{Direction, FormatDescriptor, formats_to_bag};
pub use marshal::{RC_OVERRIDE_TYPE, bag_to_record, bag_to_record_with, record_to_bag, record_to_bag_with};
pub use record::{CodecContext, MATRIX_LEN, Matrix, RcOverride};
pub use value::{PropertyBag, Value, bag_of};
