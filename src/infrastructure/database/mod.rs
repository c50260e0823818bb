mod memory_repository;
mod redis_repository;

pub use memory_repository::create_memory_repository;
pub use redis_repository::create_redis_repository;
