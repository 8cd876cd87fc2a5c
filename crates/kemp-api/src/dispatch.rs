// Status-code classification of appliance responses.

use crate::error::{DecodeError, Error};
use crate::transport::RawResponse;
use crate::xml;

/// Route a raw response to the error or success decoder.
///
/// HTTP >= 400 carries an error document and becomes [`Error::Remote`];
/// if that document itself cannot be decoded, the decode failure is
/// returned instead. Anything below 400 goes to `decode`.
pub fn dispatch<T>(
    raw: &RawResponse,
    decode: impl FnOnce(&[u8]) -> Result<T, DecodeError>,
) -> Result<T, Error> {
    if raw.status >= 400 {
        let message = xml::decode_error_document(&raw.body)?;
        return Err(Error::Remote {
            code: raw.status,
            message,
        });
    }

    Ok(decode(&raw.body)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn raw(status: u16, body: &'static str) -> RawResponse {
        RawResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn error_status_becomes_remote_error() {
        let resp = raw(404, "<Response stat=\"404\"><Error>Not Found</Error></Response>");
        let err = dispatch(&resp, xml::decode_parameters).unwrap_err();

        match err {
            Error::Remote { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_error_body_is_a_decode_error() {
        let resp = raw(500, "<html><body>Internal Server Error");
        let err = dispatch(&resp, xml::decode_parameters).unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    }

    #[test]
    fn success_status_never_reads_error_document() {
        let resp = raw(
            200,
            "<Response><Success><Data><Enable>Y</Enable></Data></Success></Response>",
        );
        let params = dispatch(&resp, xml::decode_parameters).unwrap();
        assert_eq!(params, vec![("Enable".to_string(), "Y".to_string())]);
    }

    #[test]
    fn boundary_399_is_success() {
        let resp = raw(399, "<Response><Error>odd</Error></Response>");
        let err = dispatch(&resp, xml::decode_parameters).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::MissingElement("Success"))
        ));
    }
}
