/*!
    Shared types for the beam codec bridge.

    This crate defines the vocabulary that crosses crate boundaries. It has
    no dependency on FFmpeg, so the marshalling engine and its tests can be
    built without native libraries.

    # Core Types

    - [`Rational`] - Rational numbers for time bases and aspect ratios
    - [`Mode`] and [`MediaType`] - The axes that gate field visibility
    - [`CodecId`] - Codec identifiers with native numbering

    # Native Name Tables

    - [`NameTable`] - Stringifier/parser pairs for native constant families
    - [`channel_layout_name`] and [`parse_channel_layout`] - Channel layouts

    # Error Handling

    - [`Error`], [`ErrorKind`], [`Status`] and [`Result`]
    - [`averror`] - Native error codes and their messages
*/

pub mod averror;
mod codec;
mod error;
mod media;
pub mod names;
mod rational;

pub use codec::{CodecId, UNKNOWN_CODEC_NAME, codec_name};
pub use error::{Error, ErrorKind, Result, Status};
pub use media::{MediaType, Mode};
pub use names::{NameFamily, NameTable, NativeNames, TABLE_NAMES, TableNames, channel_layout_name, parse_channel_layout};
pub use rational::Rational;
