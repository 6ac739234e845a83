/*!
    Parsing of codec operation requests.
*/

use beam_props::{PropertyBag, Value, value::kind_name};
use beam_types::{Error, Mode, Result};

use crate::library::CodecLibrary;

const NAME: &str = "name";
const CODEC_ID: &str = "codecID";

/**
    How a request identifies its codec.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecSelector {
    Name(String),
    Id(i32),
}

impl CodecSelector {
    /**
        The codec name to look up. Ids are converted to their canonical
        name first, so an unknown id looks up `"unknown_codec"`.
    */
    pub fn resolve<L: CodecLibrary>(&self, library: &L) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Id(id) => library.codec_name(*id),
        }
    }
}

/**
    A validated request to open an encoder or decoder.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct CodecRequest {
    pub mode: Mode,
    pub selector: CodecSelector,
    /// Every other key of the request, applied to the context before it opens.
    pub properties: PropertyBag,
}

impl CodecRequest {
    /**
        Validate a request object.

        Exactly one of `name` (a string) or `codecID` (an integer) must be
        present.
    */
    pub fn parse(mode: Mode, request: &Value) -> Result<Self> {
        let resource = resource_name(mode);
        let Some(object) = request.as_object() else {
            return Err(Error::invalid_request(format!(
                "{resource} must be configured with a single parameter, an options object."
            )));
        };

        let mut properties = object.clone();
        let name = properties.remove(NAME);
        let id = properties.remove(CODEC_ID);

        let selector = match (name, id) {
            (None, None) => {
                return Err(Error::invalid_request(format!(
                    "{resource} must be identified with a 'codecID' or a 'name'."
                )));
            }
            (Some(_), Some(_)) => {
                return Err(Error::invalid_request(format!(
                    "{resource} must be identified with a 'codecID' or a 'name', not both."
                )));
            }
            (Some(Value::String(name)), None) => CodecSelector::Name(name),
            (Some(other), None) => {
                tracing::debug!(kind = kind_name(&other), "rejected codec name");
                return Err(Error::invalid_request(format!("{resource} 'name' must be a string.")));
            }
            (None, Some(id)) => match id.as_i64().and_then(|id| i32::try_from(id).ok()) {
                Some(id) => CodecSelector::Id(id),
                None => {
                    return Err(Error::invalid_request(format!(
                        "{resource} 'codecID' must be an integer."
                    )));
                }
            },
        };

        Ok(Self {
            mode,
            selector,
            properties,
        })
    }
}

pub(crate) fn resource_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Encoding => "Encoder",
        Mode::Decoding => "Decoder",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use beam_types::ErrorKind;

    use super::*;
    use crate::builtin::BuiltinLibrary;

    fn invalid(mode: Mode, request: Value) -> String {
        let err = CodecRequest::parse(mode, &request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        err.message().to_string()
    }

    #[test]
    fn by_name() {
        let req = CodecRequest::parse(Mode::Decoding, &json!({ "name": "h264" })).unwrap();
        assert_eq!(req.selector, CodecSelector::Name("h264".into()));
        assert!(req.properties.is_empty());
    }

    #[test]
    fn by_id_keeps_other_properties() {
        let req = CodecRequest::parse(
            Mode::Encoding,
            &json!({ "codecID": 27, "width": 640, "height": 480 }),
        )
        .unwrap();
        assert_eq!(req.selector, CodecSelector::Id(27));
        assert_eq!(req.properties.len(), 2);
        assert_eq!(req.selector.resolve(&BuiltinLibrary::new()), "h264");
    }

    #[test]
    fn unknown_ids_resolve_to_placeholder_name() {
        let selector = CodecSelector::Id(999_999);
        assert_eq!(selector.resolve(&BuiltinLibrary::new()), "unknown_codec");
    }

    #[test]
    fn malformed_requests() {
        assert_eq!(
            invalid(Mode::Encoding, json!("h264")),
            "Encoder must be configured with a single parameter, an options object."
        );
        assert_eq!(
            invalid(Mode::Decoding, json!([1, 2])),
            "Decoder must be configured with a single parameter, an options object."
        );
        assert_eq!(
            invalid(Mode::Decoding, json!({ "width": 2 })),
            "Decoder must be identified with a 'codecID' or a 'name'."
        );
        assert!(invalid(Mode::Decoding, json!({ "name": "h264", "codecID": 27 })).ends_with("not both."));
        assert_eq!(
            invalid(Mode::Encoding, json!({ "name": 27 })),
            "Encoder 'name' must be a string."
        );
        assert_eq!(
            invalid(Mode::Encoding, json!({ "codecID": "h264" })),
            "Encoder 'codecID' must be an integer."
        );
        assert_eq!(
            invalid(Mode::Encoding, json!({ "codecID": 1.5 })),
            "Encoder 'codecID' must be an integer."
        );
    }
}
