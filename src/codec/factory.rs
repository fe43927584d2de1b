//! Codec factory
//!
//! Selects the configured codec at start-up so the session manager only ever
//! sees the [`Codec`] capability.

use super::{Codec, CodecFormat, JsonCodec};
use crate::settings::{CodecSettings, SettingsError};

/// Factory for creating the configured codec
pub struct CodecFactory;

impl CodecFactory {
    /// Create the codec named by `settings.format`
    ///
    /// # Errors
    ///
    /// Returns an error if the nesting limit is out of range, or CBOR is
    /// requested but the crate was built without the `cbor` feature
    pub fn create(settings: &CodecSettings) -> Result<Box<dyn Codec>, SettingsError> {
        let depth = settings.max_nesting_depth;
        if depth == 0 || depth > super::MAX_NESTING_DEPTH_CEILING {
            return Err(SettingsError::Invalid(format!(
                "codec nesting limit {depth} is out of range"
            )));
        }

        let codec = Self::for_format(settings.format, depth)?;
        log::info!(
            "🏭 Session codec selected: {} (max nesting depth {depth})",
            codec.format()
        );
        Ok(codec)
    }

    /// Create a codec for an explicit format with the given nesting limit
    ///
    /// # Errors
    ///
    /// Returns an error if CBOR is requested without the `cbor` feature
    pub fn for_format(
        format: CodecFormat,
        max_depth: usize,
    ) -> Result<Box<dyn Codec>, SettingsError> {
        match format {
            CodecFormat::Json => Ok(Box::new(JsonCodec::with_max_depth(max_depth))),
            #[cfg(feature = "cbor")]
            CodecFormat::Cbor => Ok(Box::new(super::CborCodec::with_max_depth(max_depth))),
            #[cfg(not(feature = "cbor"))]
            CodecFormat::Cbor => Err(SettingsError::Invalid(
                "cbor codec requested but the `cbor` feature is disabled".to_string(),
            )),
        }
    }
}
