use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};

use beam_carrier::{Bridge, BridgeConfig, CodecLibrary};
use beam_props::{FIELDS, formats_to_bag};
use beam_types::{MediaType, Mode};

#[derive(Parser, Debug)]
#[command(name = "beamctl")]
#[command(about = "Open codecs and inspect their configuration")]
struct Cli {
    /// Runtime worker threads (default: one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Use the system FFmpeg libraries (requires the `ffmpeg` feature)
    #[arg(long, global = true)]
    ffmpeg: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a decoder and print its properties
    Decoder(CodecArgs),
    /// Open an encoder and print its properties
    Encoder {
        #[command(flatten)]
        codec: CodecArgs,
        /// Also time an encode pass
        #[arg(long)]
        encode: bool,
    },
    /// List output container formats
    Muxers,
    /// List input container formats
    Demuxers,
    /// List the configuration fields visible for a mode and media type
    Fields {
        #[arg(long, value_enum, default_value = "encoding")]
        mode: ModeArg,
        #[arg(long, value_enum, default_value = "video")]
        media: MediaArg,
    },
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Codec name, e.g. "h264"
    #[arg(long, conflicts_with = "codec_id")]
    name: Option<String>,

    /// Native codec id
    #[arg(long)]
    codec_id: Option<i32>,

    /// Properties to apply before opening, as a JSON object
    #[arg(long)]
    props: Option<String>,
}

impl CodecArgs {
    fn request(&self) -> Result<Value> {
        let mut request = match &self.props {
            Some(props) => serde_json::from_str::<Value>(props).context("--props is not valid JSON")?,
            None => json!({}),
        };
        let Some(object) = request.as_object_mut() else {
            bail!("--props must be a JSON object");
        };
        if let Some(name) = &self.name {
            object.insert("name".into(), name.clone().into());
        }
        if let Some(id) = self.codec_id {
            object.insert("codecID".into(), id.into());
        }
        Ok(request)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Encoding,
    Decoding,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Encoding => Mode::Encoding,
            ModeArg::Decoding => Mode::Decoding,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MediaArg {
    Video,
    Audio,
}

impl From<MediaArg> for MediaType {
    fn from(media: MediaArg) -> Self {
        match media {
            MediaArg::Video => MediaType::Video,
            MediaArg::Audio => MediaType::Audio,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = BridgeConfig::new().with_thread_name("beamctl");
    if let Some(threads) = cli.threads {
        config = config.with_worker_threads(threads);
    }
    let runtime = config.build_runtime().context("failed to start runtime")?;

    if cli.ffmpeg {
        return run_ffmpeg(&runtime, cli.command);
    }

    let bridge = Bridge::new(beam_carrier::BuiltinLibrary::new(), runtime.handle().clone());
    runtime.block_on(run(&bridge, cli.command))
}

#[cfg(feature = "ffmpeg")]
fn run_ffmpeg(runtime: &tokio::runtime::Runtime, command: Command) -> Result<()> {
    let library = beam_carrier::FfmpegLibrary::new()?;
    let bridge = Bridge::new(library, runtime.handle().clone());
    runtime.block_on(run(&bridge, command))
}

#[cfg(not(feature = "ffmpeg"))]
fn run_ffmpeg(_runtime: &tokio::runtime::Runtime, _command: Command) -> Result<()> {
    bail!("beamctl was built without the `ffmpeg` feature")
}

async fn run<L: CodecLibrary>(bridge: &Bridge<L>, command: Command) -> Result<()> {
    let output = match command {
        Command::Decoder(codec) => {
            let opened = bridge.decoder(&codec.request()?).await?;
            json!({
                "result": opened.summary(),
                "properties": opened.codec().properties(),
            })
        }
        Command::Encoder { codec, encode } => {
            let opened = bridge.encoder(&codec.request()?).await?;
            let mut output = json!({
                "result": opened.summary(),
                "properties": opened.codec().properties(),
            });
            if encode {
                let timing = bridge.encode(&opened).await?;
                output["encode"] = Value::Object(timing.to_bag());
            }
            output
        }
        Command::Muxers => Value::Object(formats_to_bag(&bridge.muxers())),
        Command::Demuxers => Value::Object(formats_to_bag(&bridge.demuxers())),
        Command::Fields { mode, media } => {
            let (mode, media) = (Mode::from(mode), MediaType::from(media));
            let fields = FIELDS
                .iter()
                .filter(|field| field.is_visible(mode, media))
                .map(|field| {
                    json!({
                        "name": field.name,
                        "kind": field.kind.name(),
                        "writable": field.is_writable(mode, media),
                    })
                })
                .collect::<Vec<_>>();
            Value::Array(fields)
        }
    };

    tracing::debug!(stats = ?bridge.stats(), "finished");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
