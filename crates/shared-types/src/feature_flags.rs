use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file disables all
/// optional features — in particular `payment_stub` can never be turned
/// on by accident.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Store uploaded files in S3-compatible object storage instead of
    /// the local uploads directory.
    #[serde(default)]
    pub s3: bool,
    /// Replace the HMAC payment-signature verifier with the
    /// accept-everything test double. Development only.
    #[serde(default)]
    pub payment_stub: bool,
    /// Serve the Swagger UI at /docs.
    #[serde(default)]
    pub swagger_ui: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_all_false() {
        let flags = FeatureFlags::default();
        assert!(!flags.s3);
        assert!(!flags.payment_stub);
        assert!(!flags.swagger_ui);
    }

    #[test]
    fn deserialize_empty_toml_defaults_all_false() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.features, FeatureFlags::default());
    }

    #[test]
    fn deserialize_partial_toml_defaults_missing_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            s3 = true
            "#,
        )
        .unwrap();
        assert!(config.features.s3);
        assert!(!config.features.payment_stub);
        assert!(!config.features.swagger_ui);
    }

    #[test]
    fn serialize_roundtrip() {
        let flags = FeatureFlags {
            s3: true,
            payment_stub: false,
            swagger_ui: true,
        };
        let json = serde_json::to_string(&flags).unwrap();
        let deserialized: FeatureFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, deserialized);
    }
}
