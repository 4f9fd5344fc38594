//! Infrastructure implementations for Mobilia.
//!
//! Everything that touches the outside world lives here: the SQLite
//! catalog and chat repositories, the OpenAI completion client, the
//! fastembed image embedder, local media resolution, and config loading.
//! The traits these types implement are defined in `mobilia-core`.

pub mod config;
pub mod llm;
pub mod media;
pub mod sqlite;
pub mod vision;
