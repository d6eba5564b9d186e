//! Response envelope decoding.
//!
//! Every LetsCloud response body is wrapped in `{success, message, data}`.
//! Decoding happens in two steps: the envelope is parsed with `data` kept as
//! raw JSON, then the success flag is checked, and only then is `data`
//! converted to the caller's type. Data of a failed envelope is never decoded.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform `{success, message, data}` wrapper of every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the provider processed the request.
    #[serde(default)]
    pub success: bool,
    /// Human-readable status or failure reason.
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific payload; absent for action endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope {
    /// Parses raw response bytes into an envelope with untyped data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodingResponse`] for malformed JSON or a body that is
    /// not an envelope object.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|err| {
            Error::DecodingResponse(format!(
                "{err} (body: {})",
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }

    /// Converts the data into `T` after checking the success flag.
    ///
    /// Missing or `null` data yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with the provider message when `success` is false
    /// and [`Error::DecodingResponse`] when the data has the wrong shape.
    pub fn into_data<T>(self) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.check()?;
        decode_data(self.data)
    }

    /// Converts the whole envelope into a typed one after checking the success flag.
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::into_data`].
    pub fn into_typed<T>(self) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        self.check()?;
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };

        Ok(Envelope {
            success: self.success,
            message: self.message,
            data,
        })
    }
}

impl<T> Envelope<T> {
    /// Fails with the provider message when the envelope reports failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] carrying `message` unmodified.
    pub fn check(&self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Api(self.message.clone()))
        }
    }
}

fn decode_data<T>(data: Option<Value>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match data {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(Error::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Item {
        identifier: String,
        cpus: u32,
    }

    #[test]
    fn decode_success_with_object() {
        let envelope = Envelope::decode(br#"{"success": true, "data": {"identifier": "x"}}"#)
            .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message, "");

        let item: Item = envelope.into_data().unwrap();
        assert_eq!(
            item,
            Item {
                identifier: "x".to_string(),
                cpus: 0
            }
        );
    }

    #[test]
    fn decode_success_with_array() {
        let items: Vec<Item> = Envelope::decode(
            br#"{"success": true, "data": [{"identifier": "a"}, {"identifier": "b", "cpus": 2}]}"#,
        )
        .unwrap()
        .into_data()
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].cpus, 2);
    }

    #[test]
    fn failure_message_is_verbatim() {
        let err = Envelope::decode(br#"{"success": false, "message": "not found"}"#)
            .unwrap()
            .into_data::<Item>()
            .unwrap_err();
        assert_eq!(err, Error::Api("not found".to_string()));
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn failure_ignores_data_shape() {
        // `data` would not decode into `Item`, but it is never looked at.
        let err = Envelope::decode(br#"{"success": false, "message": "denied", "data": [1, 2]}"#)
            .unwrap()
            .into_data::<Item>()
            .unwrap_err();
        assert_eq!(err, Error::Api("denied".to_string()));
    }

    #[test]
    fn missing_success_counts_as_failure() {
        let err = Envelope::decode(br#"{"message": "maintenance"}"#)
            .unwrap()
            .check()
            .unwrap_err();
        assert_eq!(err, Error::Api("maintenance".to_string()));
    }

    #[test]
    fn missing_data_yields_default() {
        let items: Vec<Item> = Envelope::decode(br#"{"success": true, "message": "ok"}"#)
            .unwrap()
            .into_data()
            .unwrap();
        assert!(items.is_empty());

        let item: Item = Envelope::decode(br#"{"success": true, "data": null}"#)
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(item, Item::default());
    }

    #[test]
    fn malformed_json_is_decoding_error() {
        let err = Envelope::decode(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::DecodingResponse(_)));

        let err = Envelope::decode(br#""ok""#).unwrap_err();
        assert!(matches!(err, Error::DecodingResponse(_)));
    }

    #[test]
    fn data_type_mismatch_is_decoding_error() {
        let err = Envelope::decode(br#"{"success": true, "data": {"identifier": 12}}"#)
            .unwrap()
            .into_data::<Item>()
            .unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn into_typed_keeps_message() {
        let envelope: Envelope<Item> = Envelope::decode(
            br#"{"success": true, "message": "snapshot queued", "data": {"identifier": "s1"}}"#,
        )
        .unwrap()
        .into_typed()
        .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.message, "snapshot queued");
        assert_eq!(envelope.data.unwrap().identifier, "s1");
    }
}
