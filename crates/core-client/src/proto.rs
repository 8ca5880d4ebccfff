//! Wire types for `athena.inference.InferenceService`
//!
//! Generated from `proto/inference.proto` at build time.

#![allow(clippy::derive_partial_eq_without_eq)]

tonic::include_proto!("athena.inference");

pub use inference_service_client::InferenceServiceClient;
pub use inference_service_server::{InferenceService, InferenceServiceServer};

/// Fully qualified service name
pub const SERVICE_NAME: &str = "athena.inference.InferenceService";

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn test_inputs_are_packed_on_the_wire() {
        let request = InferenceRequest {
            request_id: "r".to_string(),
            inputs: vec![1.0, 2.0],
            model_name: String::new(),
            model_version: String::new(),
        };

        let bytes = request.encode_to_vec();
        // field 1 (len 1, "r"), then field 2 packed: tag 0x12, length 8, two floats
        assert_eq!(&bytes[..3], &[0x0a, 0x01, b'r']);
        assert_eq!(&bytes[3..5], &[0x12, 0x08]);
        assert_eq!(bytes.len(), 13);
    }
}
