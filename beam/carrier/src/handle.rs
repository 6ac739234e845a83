/*!
    Handles to opened codec contexts.
*/

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use beam_props::{PropertyBag, Value};
use beam_types::{Mode, Result};

use crate::library::{CodecInfo, NativeContext};

/**
    A shared reference to an opened native codec context.

    The context is closed and freed when the last clone is dropped.
    Property access is serialized by a mutex, so two clones may be
    configured from different threads without corrupting the record.
*/
pub struct CodecRef<C> {
    mode: Mode,
    context: Arc<Mutex<C>>,
}

impl<C> Clone for CodecRef<C> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            context: Arc::clone(&self.context),
        }
    }
}

impl<C> fmt::Debug for CodecRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRef")
            .field("mode", &self.mode)
            .field("refs", &Arc::strong_count(&self.context))
            .finish_non_exhaustive()
    }
}

impl<C: NativeContext> CodecRef<C> {
    pub(crate) fn new(mode: Mode, context: C) -> Self {
        Self {
            mode,
            context: Arc::new(Mutex::new(context)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /**
        Read the context's visible properties.
    */
    pub fn properties(&self) -> PropertyBag {
        let context = self.context.lock();
        context.load_record().to_bag_with(self.mode, context.names())
    }

    /**
        Apply a property bag to the context.

        Fails without changing the context if any supplied property does
        not convert.
    */
    pub fn set_properties(&self, bag: &PropertyBag) -> Result<()> {
        let mut context = self.context.lock();
        let mut record = context.load_record();
        record.apply_bag_with(bag, self.mode, context.names())?;
        context.store_record(&record)
    }

    pub fn is_open(&self) -> bool {
        self.context.lock().is_open()
    }

    pub(crate) fn with_context<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut context = self.context.lock();
        f(&mut *context)
    }
}

/**
    The result of opening an encoder or decoder.
*/
pub struct Opened<C> {
    info: CodecInfo,
    codec: CodecRef<C>,
}

impl<C> fmt::Debug for Opened<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opened")
            .field("info", &self.info)
            .field("codec", &self.codec)
            .finish()
    }
}

impl<C: NativeContext> Opened<C> {
    pub(crate) fn new(info: CodecInfo, codec: CodecRef<C>) -> Self {
        Self { info, codec }
    }

    pub fn mode(&self) -> Mode {
        self.codec.mode
    }

    /**
        Result type tag, `"encoder"` or `"decoder"`.
    */
    pub fn type_name(&self) -> &'static str {
        self.mode().type_name()
    }

    /**
        Name of the field carrying the opaque reference, `"_encoder"` or
        `"_decoder"`.
    */
    pub fn reference_name(&self) -> &'static str {
        match self.mode() {
            Mode::Encoding => "_encoder",
            Mode::Decoding => "_decoder",
        }
    }

    pub fn info(&self) -> &CodecInfo {
        &self.info
    }

    pub fn codec(&self) -> &CodecRef<C> {
        &self.codec
    }

    pub fn into_codec(self) -> CodecRef<C> {
        self.codec
    }

    /**
        Describe the result: its type tag, the codec it opened, and the
        reference field holding a placeholder for the opaque handle.
    */
    pub fn summary(&self) -> PropertyBag {
        let mut bag = PropertyBag::new();
        bag.insert("type".into(), self.type_name().into());
        bag.insert("name".into(), self.info.name.clone().into());
        bag.insert("codec_id".into(), self.info.id.into());
        bag.insert(
            self.reference_name().into(),
            Value::String(format!("[{} {}]", self.type_name(), self.info.name)),
        );
        bag
    }
}

/**
    The result of a timing-only encode.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeTiming {
    /// Elapsed time in microseconds.
    pub total_time: i64,
}

impl EncodeTiming {
    pub fn to_bag(&self) -> PropertyBag {
        let mut bag = PropertyBag::new();
        bag.insert("totalTime".into(), self.total_time.into());
        bag
    }
}
