pub mod auth;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod search;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Grant, NoneAuthenticator,
    PasswordAuthenticator, AUTH_HEADER,
};
pub use catalog::{CatalogError, SourceCatalog, SourceDescriptor};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, AuthConfig,
    Config, ConfigError, LogConfig, PasswordEntry, SanitizedConfig, SearchConfig, ServerConfig,
    SourceConfig,
};
pub use search::{
    FetchError, MacCmsFetcher, MergedItem, Provenance, RawRecord, SearchError, SearchOutcome,
    SearchQuery, SearchService, SearchSettings, SourceFetcher,
};
