/*!
    The seam between the bridge and a native codec library.
*/

use beam_props::{CodecContext, FormatDescriptor};
use beam_types::{MediaType, NativeNames, Result, TABLE_NAMES, averror, codec_name};

/**
    Static description of a registered codec.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecInfo {
    pub id: i32,
    pub name: String,
    pub long_name: Option<String>,
    pub media_type: MediaType,
}

/**
    An allocated native codec context.

    Dropping the context closes and frees it. Contexts are owned by exactly
    one carrier or handle at a time, so implementations only need to be
    [`Send`].
*/
pub trait NativeContext: Send + 'static {
    /**
        Snapshot the native configuration record.
    */
    fn load_record(&self) -> CodecContext;

    /**
        Copy a configuration record into the native context.
    */
    fn store_record(&mut self, record: &CodecContext) -> Result<()>;

    /**
        Stringifiers and parsers for the record's named constants and
        channel layouts.
    */
    fn names(&self) -> &dyn NativeNames {
        &TABLE_NAMES
    }

    fn is_open(&self) -> bool;
}

/**
    A native codec library.

    Lookups only read the library's global registries and may run
    concurrently from several background threads. Allocation, opening and
    freeing operate on a single context owned by the caller.
*/
pub trait CodecLibrary: Send + Sync + 'static {
    /// A registered codec, as returned by the lookup functions.
    type Codec: Send + 'static;
    type Context: NativeContext;

    /**
        Name for a native codec id, `"unknown_codec"` if the id is unknown.
    */
    fn codec_name(&self, id: i32) -> String {
        codec_name(id).to_string()
    }

    fn find_decoder(&self, name: &str) -> Option<Self::Codec>;

    fn find_encoder(&self, name: &str) -> Option<Self::Codec>;

    fn codec_info(&self, codec: &Self::Codec) -> CodecInfo;

    /**
        Allocate a context with the library's defaults for `codec`.
        Returns `None` when the library is out of memory.
    */
    fn alloc_context(&self, codec: &Self::Codec) -> Option<Self::Context>;

    /**
        Open an allocated context. Failures carry the native error code.
    */
    fn open(&self, context: &mut Self::Context, codec: &Self::Codec) -> std::result::Result<(), i32>;

    /**
        Describe a native error code, prefixed with `base`.
    */
    fn error_message(&self, base: &str, code: i32) -> String {
        averror::native_error_message(base, code)
    }

    fn muxers(&self) -> Vec<FormatDescriptor>;

    fn demuxers(&self) -> Vec<FormatDescriptor>;
}
