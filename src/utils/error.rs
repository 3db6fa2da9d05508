use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnsError {
    #[error("RPC transport failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid UTF-8 data: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid domain name")]
    InvalidDomain,

    #[error("Invalid public key")]
    InvalidPubkey,

    #[error("Invalid reverse lookup data")]
    InvalidReverse,

    #[error("Invalid record data")]
    InvalidRecordData,

    #[error("Unrecognized record: {0}")]
    UnrecognizedRecord(String),

    #[error("Punycode conversion failed")]
    Punycode,

    #[error("Invalid EVM address")]
    InvalidEvmAddress,

    #[error("Invalid Injective address")]
    InvalidInjectiveAddress,

    #[error("Invalid IPv4 address")]
    InvalidIpv4,

    #[error("Invalid IPv6 address")]
    InvalidIpv6,

    #[error("SOL records v1 cannot be serialized without a signature")]
    SolRecordNotSupported,

    #[error("NFT record does not exist")]
    NftRecordDoesNotExist,

    #[error("Record is stale")]
    StaleRecord,

    #[error("Record right of association is not verified")]
    UnverifiedRecord,

    #[error("Seeds do not produce a valid program address")]
    InvalidSeeds,

    #[error("Domain {0} does not exist")]
    DomainDoesNotExist(String),

    #[error("Domain owner is a program address that is not allowed{}", owned_by(program))]
    PdaOwnerNotAllowed { program: Option<String> },

    #[error("Could not find the owner of the tokenized domain")]
    CouldNotFindNftOwner,

    #[error("Invalid account data: {message}")]
    InvalidAccountData { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, SnsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Data,
    Verification,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn owned_by(program: &Option<String>) -> String {
    program
        .as_ref()
        .map(|p| format!(" (owned by {})", p))
        .unwrap_or_default()
}

impl SnsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SnsError::HttpError(_) | SnsError::Rpc { .. } => ErrorCategory::Network,
            SnsError::InvalidDomain
            | SnsError::InvalidPubkey
            | SnsError::UnrecognizedRecord(_)
            | SnsError::InvalidEvmAddress
            | SnsError::InvalidInjectiveAddress
            | SnsError::InvalidIpv4
            | SnsError::InvalidIpv6
            | SnsError::SolRecordNotSupported
            | SnsError::Punycode
            | SnsError::InvalidSeeds => ErrorCategory::Input,
            SnsError::StaleRecord
            | SnsError::UnverifiedRecord
            | SnsError::PdaOwnerNotAllowed { .. } => ErrorCategory::Verification,
            SnsError::IoError(_)
            | SnsError::TomlError(_)
            | SnsError::ConfigError { .. }
            | SnsError::InvalidConfigValueError { .. }
            | SnsError::MissingConfigError { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Verification => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SnsError::HttpError(_) => "Could not reach the Solana RPC node".to_string(),
            SnsError::Rpc { message, .. } => {
                format!("The RPC node rejected the request: {}", message)
            }
            SnsError::DomainDoesNotExist(domain) => format!("Domain {} is not registered", domain),
            SnsError::InvalidDomain => {
                "Domain names must look like `name`, `name.sol` or `sub.name.sol`".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the RPC url or retry later; public endpoints are rate limited"
            }
            ErrorCategory::Input => "Check the spelling of the domain, key or record name",
            ErrorCategory::Data => "The on-chain account does not have the expected layout",
            ErrorCategory::Verification => {
                "The record exists but was not signed by the current owner"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
        }
    }

    /// JSON-RPC `Invalid params`, returned e.g. when a mint account does not exist.
    pub fn is_invalid_params(&self) -> bool {
        matches!(self, SnsError::Rpc { code: -32602, .. })
    }
}
