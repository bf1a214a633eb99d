use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";

/// Payload published to `captionsRequest` by the upload pipeline.
///
/// Both fields are optional on the wire. Any other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptionsRequest {
    #[serde(rename = "VideoId", default)]
    pub video_id: Option<String>,

    #[serde(rename = "S3Key", default)]
    pub s3_key: Option<String>,
}

impl CaptionsRequest {
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(payload).map_err(|e| DecodeError(e.to_string()))
    }

    pub fn video_id(&self) -> &str {
        self.video_id.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn s3_key(&self) -> &str {
        self.s3_key.as_deref().unwrap_or(UNKNOWN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid captions request payload: {0}")]
pub struct DecodeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let request = CaptionsRequest::decode(br#"{"VideoId":"v1","S3Key":"s3://b/v1.vtt"}"#).unwrap();
        assert_eq!(request.video_id(), "v1");
        assert_eq!(request.s3_key(), "s3://b/v1.vtt");
    }

    #[test]
    fn test_missing_fields_read_as_unknown() {
        let request = CaptionsRequest::decode(br#"{"Other":1}"#).unwrap();
        assert_eq!(request.video_id(), "unknown");
        assert_eq!(request.s3_key(), "unknown");
    }

    #[test]
    fn test_null_field_reads_as_unknown() {
        let request = CaptionsRequest::decode(br#"{"VideoId":null,"S3Key":"k"}"#).unwrap();
        assert_eq!(request.video_id(), "unknown");
        assert_eq!(request.s3_key(), "k");
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        for payload in [
            b"not-json".as_slice(),
            b"{\"VideoId\":".as_slice(),
            b"[1,2,3]".as_slice(),
            b"\"v1\"".as_slice(),
            b"{\"VideoId\":42}".as_slice(),
            &[0xffu8, 0xfe, 0x00][..],
        ] {
            assert!(
                CaptionsRequest::decode(payload).is_err(),
                "expected decode failure for {:?}",
                String::from_utf8_lossy(payload)
            );
        }
    }
}
