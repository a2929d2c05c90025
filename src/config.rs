//! Construction-time configuration for each cache type.
//!
//! Every cache is constructed from a small, validated config struct rather
//! than a long parameter list. Fields are public: these structs exist to
//! name and group construction parameters, not to hide them.

pub mod hash_lfu;
pub mod hash_lru;
pub mod lfu;
pub mod lru;
pub mod lru_k;

pub use hash_lfu::HashLfuCacheConfig;
pub use hash_lru::HashLruCacheConfig;
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;
pub use lru_k::LruKCacheConfig;
