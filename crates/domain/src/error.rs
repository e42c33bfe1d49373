/// Shared error type used across all Shopfront crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("session store: {0}")]
    Store(String),

    #[error("chat transport: {0}")]
    Transport(String),

    #[error("repository: {0}")]
    Repository(String),

    /// A continuation fired with no pending interaction to resume
    /// (never armed, already consumed, or expired via TTL).
    #[error("no pending interaction to resume")]
    NothingToResume,

    /// The stored slot failed the format contract (bad shape or opcode
    /// mismatch). The slot is always deleted before this surfaces.
    #[error("malformed pending interaction: {0}")]
    MalformedSlot(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
