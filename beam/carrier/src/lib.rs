/*!
    Asynchronous codec operations for the beam codec bridge.

    A [`Bridge`] turns blocking codec library calls into future handles.
    Each request returns a [`Pending`] immediately; the native lookup,
    allocation and open sequence runs on the runtime's blocking pool and the
    handle settles with an [`Opened`] codec or an error carrying a status
    code and the location the failure was detected.

    # Example

    ```
    use beam_carrier::{Bridge, BuiltinLibrary};
    use serde_json::json;

    # #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
    # async fn main() {
    let bridge = Bridge::from_current(BuiltinLibrary::new());
    let decoder = bridge.decoder(&json!({ "name": "h264" })).await.unwrap();
    assert_eq!(decoder.type_name(), "decoder");
    # }
    ```

    # Backends

    The [`BuiltinLibrary`] is always available. With the `ffmpeg` feature
    enabled, `FfmpegLibrary` uses the system FFmpeg libraries instead.
*/

mod bridge;
mod builtin;
mod carrier;
mod config;
#[cfg(feature = "ffmpeg")]
mod ffmpeg;
mod handle;
mod library;
mod ops;
mod pending;
mod request;

pub use bridge::Bridge;
pub use builtin::{BuiltinCodec, BuiltinContext, BuiltinLibrary};
pub use carrier::BridgeStats;
pub use config::BridgeConfig;
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::{FfmpegCodec, FfmpegContext, FfmpegLibrary, FfmpegNames};
pub use handle::{CodecRef, EncodeTiming, Opened};
pub use library::{CodecInfo, CodecLibrary, NativeContext};
pub use pending::{Deferred, Pending, deferred};
pub use request::{CodecRequest, CodecSelector};
