//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod messages;

pub use messages::{decode_api_error, decode_message_json_response, encode_create_message_form};
