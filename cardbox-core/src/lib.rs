pub mod media;
pub mod slug;
pub mod storage;
pub mod types;
pub mod validate;
