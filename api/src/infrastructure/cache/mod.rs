mod noop_cache;
mod redis_cache;

pub use noop_cache::NoopUserCache;
pub use redis_cache::RedisUserCache;
