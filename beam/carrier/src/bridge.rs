/*!
    The bridge: asynchronous codec operations over a [`CodecLibrary`].
*/

use std::sync::Arc;

use tokio::runtime::Handle;

use beam_props::{FormatDescriptor, Value};
use beam_types::{Error, Mode};

use crate::carrier::{BridgeStats, Counters, schedule};
use crate::handle::{EncodeTiming, Opened};
use crate::library::CodecLibrary;
use crate::ops::{Encode, OpenCodec};
use crate::pending::Pending;
use crate::request::CodecRequest;

/**
    Exposes codec operations as future handles.

    Every operation request returns immediately. Malformed requests are
    returned already rejected; everything else is scheduled on the bridge's
    runtime and settles once the native work completes.
*/
pub struct Bridge<L: CodecLibrary> {
    library: Arc<L>,
    handle: Handle,
    counters: Arc<Counters>,
}

impl<L: CodecLibrary> Clone for Bridge<L> {
    fn clone(&self) -> Self {
        Self {
            library: Arc::clone(&self.library),
            handle: self.handle.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<L: CodecLibrary> Bridge<L> {
    /**
        Create a bridge that schedules its work on `handle`.
    */
    pub fn new(library: L, handle: Handle) -> Self {
        Self {
            library: Arc::new(library),
            handle,
            counters: Arc::new(Counters::default()),
        }
    }

    /**
        Create a bridge on the runtime of the calling task.

        # Panics

        Panics if called outside of a tokio runtime.
    */
    pub fn from_current(library: L) -> Self {
        Self::new(library, Handle::current())
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    /**
        Open a decoder. The request is an object with either a `name` or a
        `codecID`; any other keys are applied as properties before opening.
    */
    pub fn decoder(&self, request: &Value) -> Pending<Opened<L::Context>> {
        self.open(Mode::Decoding, request)
    }

    /**
        Open an encoder. The request has the same shape as for [`Bridge::decoder`].
    */
    pub fn encoder(&self, request: &Value) -> Pending<Opened<L::Context>> {
        self.open(Mode::Encoding, request)
    }

    fn open(&self, mode: Mode, request: &Value) -> Pending<Opened<L::Context>> {
        match CodecRequest::parse(mode, request) {
            Ok(request) => {
                let op = OpenCodec::new(Arc::clone(&self.library), request);
                schedule(&self.handle, &self.counters, op)
            }
            Err(error) => {
                tracing::debug!(mode = mode.type_name(), "refused request: {}", error.message());
                Pending::rejected(error)
            }
        }
    }

    /**
        Time a pass over an opened encoder.
    */
    pub fn encode(&self, encoder: &Opened<L::Context>) -> Pending<EncodeTiming> {
        if !encoder.mode().is_encoding() {
            return Pending::rejected(Error::invalid_request("Encode requires an encoder, not a decoder."));
        }
        schedule(&self.handle, &self.counters, Encode::new(encoder.codec().clone()))
    }

    /**
        Output container formats known to the library.
    */
    pub fn muxers(&self) -> Vec<FormatDescriptor> {
        self.library.muxers()
    }

    /**
        Input container formats known to the library.
    */
    pub fn demuxers(&self) -> Vec<FormatDescriptor> {
        self.library.demuxers()
    }

    pub fn stats(&self) -> BridgeStats {
        self.counters.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use beam_props::bag_of;
    use beam_types::{ErrorKind, Status};

    use super::*;
    use crate::builtin::BuiltinLibrary;

    fn bridge() -> (Bridge<BuiltinLibrary>, BuiltinLibrary) {
        let library = BuiltinLibrary::new();
        (Bridge::from_current(library.clone()), library)
    }

    async fn quiesce<L: CodecLibrary>(bridge: &Bridge<L>) -> BridgeStats {
        for _ in 0..200 {
            let stats = bridge.stats();
            if stats.in_flight() == 0 {
                return stats;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        bridge.stats()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn opens_decoder_by_name() {
        let (bridge, library) = bridge();
        let opened = bridge.decoder(&json!({ "name": "h264" })).await.unwrap();
        assert_eq!(opened.type_name(), "decoder");
        assert_eq!(opened.reference_name(), "_decoder");
        assert_eq!(opened.info().name, "h264");
        assert!(opened.codec().is_open());

        let summary = opened.summary();
        assert_eq!(summary["type"], "decoder");
        assert!(summary.contains_key("_decoder"));

        assert_eq!(library.live_contexts(), 1);
        drop(opened);
        assert_eq!(library.live_contexts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn opens_decoder_by_id() {
        let (bridge, _) = bridge();
        let opened = bridge.decoder(&json!({ "codecID": 86018 })).await.unwrap();
        assert_eq!(opened.info().name, "aac");
        assert_eq!(opened.codec().properties()["codec_type"], "audio");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unknown_codec_id_fails_to_find() {
        let (bridge, library) = bridge();
        let err = bridge.decoder(&json!({ "codecID": 999_999 })).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocDecoder);
        assert_eq!(err.status(), Status::ALLOC_DECODER);
        assert!(err.message().contains("Failed to find"));
        assert!(err.to_string().starts_with("In file "));
        assert_eq!(library.live_contexts(), 0);

        let stats = quiesce(&bridge).await;
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.disposed, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_selector_rejects_without_scheduling() {
        let (bridge, _) = bridge();
        let pending = bridge.decoder(&json!({ "width": 640 }));
        assert!(pending.is_rejected_early());
        let err = pending.await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.status(), Status::INVALID_ARGS);
        assert_eq!(bridge.stats(), BridgeStats::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn encoder_open_failure_frees_context() {
        let (bridge, library) = bridge();
        let err = bridge.encoder(&json!({ "name": "mpeg4" })).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocEncoder);
        assert_eq!(err.message(), "Problem opening encoder: Invalid argument");
        assert_eq!(library.live_contexts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn encoder_without_encoder_support_fails_to_find() {
        let (bridge, _) = bridge();
        let err = bridge.encoder(&json!({ "name": "h264" })).await.unwrap_err();
        assert_eq!(err.message(), "Failed to find an encoder from its name.");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn request_properties_configure_the_encoder() {
        let (bridge, _) = bridge();
        let request = json!({
            "name": "mpeg4",
            "width": 640,
            "height": 480,
            "pix_fmt": "yuv420p",
            "time_base": [1, 25],
            "bit_rate": 800_000,
        });
        let opened = bridge.encoder(&request).await.unwrap();
        assert_eq!(opened.type_name(), "encoder");
        let props = opened.codec().properties();
        assert_eq!(props["width"], 640);
        assert_eq!(props["pix_fmt"], "yuv420p");
        assert_eq!(props["bit_rate"], 800_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bad_request_property_is_a_marshal_failure() {
        let (bridge, library) = bridge();
        let err = bridge
            .decoder(&json!({ "name": "h264", "width": "wide" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
        assert_eq!(library.live_contexts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn audio_encoder_and_encode_timing() {
        let (bridge, _) = bridge();
        let request = json!({
            "name": "aac",
            "sample_rate": 48000,
            "sample_fmt": "fltp",
            "channels": 2,
        });
        let opened = bridge.encoder(&request).await.unwrap();
        assert_eq!(opened.codec().properties()["frame_size"], 1024);

        let timing = bridge.encode(&opened).await.unwrap();
        assert!(timing.total_time >= 0);
        assert!(timing.to_bag().contains_key("totalTime"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn encode_on_decoder_is_invalid() {
        let (bridge, _) = bridge();
        let opened = bridge.decoder(&json!({ "name": "flac" })).await.unwrap();
        let pending = bridge.encode(&opened);
        assert!(pending.is_rejected_early());
        assert_eq!(pending.await.unwrap_err().kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn set_properties_round_trip() {
        let (bridge, _) = bridge();
        let opened = bridge.decoder(&json!({ "name": "h264" })).await.unwrap();
        let codec = opened.codec().clone();

        codec.set_properties(&bag_of("skip_top", 4)).unwrap();
        assert_eq!(codec.properties()["skip_top"], 4);

        let err = codec.set_properties(&bag_of("skip_top", "four")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
        assert_eq!(codec.properties()["skip_top"], 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn every_operation_settles_and_disposes_once() {
        let (bridge, library) = bridge();
        let requests = [
            json!({ "name": "h264" }),
            json!({ "codecID": 999_999 }),
            json!({ "name": "vp9" }),
            json!({ "name": "nope" }),
            json!({ "codecID": 86017 }),
            json!({ "name": "opus" }),
        ];
        let pending = requests
            .iter()
            .cycle()
            .take(24)
            .map(|request| bridge.decoder(request))
            .collect::<Vec<_>>();

        let mut ok = Vec::new();
        for p in pending {
            if let Ok(opened) = p.await {
                ok.push(opened);
            }
        }
        assert_eq!(ok.len(), 16);
        assert_eq!(library.live_contexts(), 16);
        drop(ok);
        assert_eq!(library.live_contexts(), 0);

        let stats = quiesce(&bridge).await;
        assert_eq!(stats.scheduled, 24);
        assert_eq!(stats.resolved + stats.rejected, stats.scheduled);
        assert_eq!(stats.disposed, stats.scheduled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn lists_container_formats() {
        let (bridge, _) = bridge();
        assert!(bridge.muxers().iter().any(|f| f.name == "mp4"));
        assert!(bridge.demuxers().iter().any(|f| f.name == "mpegts"));
    }
}
