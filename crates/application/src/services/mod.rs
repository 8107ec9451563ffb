mod alias_cache;

pub use alias_cache::{AliasCache, AliasCacheKey};
