pub mod core;
pub mod source;

// Re-export the main types for convenience
pub use self::core::Language;
pub use self::source::{
    FallbackWordSource, LocalWordSource, RemoteWordSource, WordSource, WordSourceError,
    RANDOM_WORD_API,
};
