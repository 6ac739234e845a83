/*!
    The operations the bridge schedules.
*/

use std::sync::Arc;
use std::time::Instant;

use beam_props::PropertyBag;
use beam_types::{Error, ErrorKind, Mode, Result};

use crate::carrier::Operation;
use crate::handle::{CodecRef, EncodeTiming, Opened};
use crate::library::{CodecInfo, CodecLibrary, NativeContext};
use crate::request::CodecRequest;

/**
    Find a codec by name, allocate a context, apply the request's
    properties and open it.
*/
pub(crate) struct OpenCodec<L: CodecLibrary> {
    library: Arc<L>,
    mode: Mode,
    name: String,
    properties: PropertyBag,
    info: Option<CodecInfo>,
    context: Option<L::Context>,
}

impl<L: CodecLibrary> OpenCodec<L> {
    pub(crate) fn new(library: Arc<L>, request: CodecRequest) -> Self {
        let name = request.selector.resolve(library.as_ref());
        Self {
            library,
            mode: request.mode,
            name,
            properties: request.properties,
            info: None,
            context: None,
        }
    }

    fn noun(&self) -> &'static str {
        match self.mode {
            Mode::Encoding => "encoder",
            Mode::Decoding => "decoder",
        }
    }

    #[track_caller]
    fn failure(&self, message: String) -> Error {
        let kind = match self.mode {
            Mode::Encoding => ErrorKind::AllocEncoder,
            Mode::Decoding => ErrorKind::AllocDecoder,
        };
        Error::new(kind, message)
    }
}

impl<L: CodecLibrary> Operation for OpenCodec<L> {
    type Output = Opened<L::Context>;

    fn resource(&self) -> &'static str {
        crate::request::resource_name(self.mode)
    }

    fn execute(&mut self) -> Result<()> {
        let noun = self.noun();
        let codec = match self.mode {
            Mode::Encoding => self.library.find_encoder(&self.name),
            Mode::Decoding => self.library.find_decoder(&self.name),
        };
        let Some(codec) = codec else {
            let article = if self.mode.is_encoding() { "an" } else { "a" };
            return Err(self.failure(format!("Failed to find {article} {noun} from its name.")));
        };
        self.info = Some(self.library.codec_info(&codec));

        let Some(context) = self.library.alloc_context(&codec) else {
            return Err(self.failure(format!("Problem allocating {noun} context.")));
        };
        let context = self.context.insert(context);

        if !self.properties.is_empty() {
            let mut record = context.load_record();
            record.apply_bag_with(&self.properties, self.mode, context.names())?;
            context.store_record(&record)?;
        }

        if let Err(code) = self.library.open(context, &codec) {
            let message = self.library.error_message(&format!("Problem opening {noun}: "), code);
            return Err(self.failure(message));
        }
        Ok(())
    }

    fn complete(mut self) -> Result<Self::Output> {
        match (self.info.take(), self.context.take()) {
            (Some(info), Some(context)) => Ok(Opened::new(info, CodecRef::new(self.mode, context))),
            _ => Err(Error::runtime(format!("{} was not opened.", self.noun()))),
        }
    }
}

/**
    Time a pass over an opened encoder.
*/
pub(crate) struct Encode<C> {
    codec: CodecRef<C>,
    total_time: i64,
}

impl<C: NativeContext> Encode<C> {
    pub(crate) fn new(codec: CodecRef<C>) -> Self {
        Self { codec, total_time: 0 }
    }
}

impl<C: NativeContext> Operation for Encode<C> {
    type Output = EncodeTiming;

    fn resource(&self) -> &'static str {
        "Encode"
    }

    fn execute(&mut self) -> Result<()> {
        let start = Instant::now();
        if !self.codec.with_context(|context| context.is_open()) {
            return Err(Error::encode("Encoder context is not open."));
        }
        self.total_time = i64::try_from(start.elapsed().as_micros()).unwrap_or(i64::MAX);
        Ok(())
    }

    fn complete(self) -> Result<EncodeTiming> {
        Ok(EncodeTiming {
            total_time: self.total_time,
        })
    }
}
