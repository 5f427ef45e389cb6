pub mod extractor;
pub mod media;
pub mod resolver;
pub mod storage;
