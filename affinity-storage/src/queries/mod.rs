//! SQL for each document collection. Every function takes a borrowed
//! connection so the engine decides whether it runs on the writer or a reader.

pub mod codec;
pub mod embedding_ops;
pub mod message_ops;
pub mod profile_ops;
pub mod stats_ops;
pub mod user_ops;
