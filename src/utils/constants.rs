//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// Requested token validity when the config does not set one.
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 120;
/// Provider-side ceiling on requested validity: 14 days.
pub const MAX_EXPIRATION_MINUTES: u32 = 20160;

/// Token endpoint path relative to the provider base URL.
pub const DEFAULT_TOKEN_PATH: &str = "/oauth2/token/";

/// Short error token used for every locally synthesized error envelope.
pub const INVALID_SERVER_RESPONSE: &str = "invalid_server_response";
