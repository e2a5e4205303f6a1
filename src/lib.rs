//! Query-vs-candidates semantic matching with an incremental embedding cache.
//!
//! A caller supplies one query text and an editable list of candidate texts. vecsearch
//! embeds each piece of text through a [`VectorProvider`](embedding::VectorProvider),
//! keeps the resulting vectors cached per slot for as long as the slot's text is
//! unchanged, and ranks the candidates by cosine similarity to the query.
//!
//! # Architecture
//!
//! - **Slots**: the query and every candidate live in a named slot with a stable id;
//!   editing a slot's text is what invalidates its cached vector
//! - **Cache**: one entry per slot recording the exact text that produced the vector
//! - **Fetching**: stale slots are refreshed in parallel, at most one provider call per
//!   slot in flight, and a result is only cached if the slot still holds the text sent
//! - **Ranking**: cosine similarity, percentages rounded to two decimals, stable ordering
//!   for ties; failed candidates are reported as excluded instead of scored as zero
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`embedding`]: The vector provider boundary and the OpenAI-compatible HTTP provider
//! - [`matching`]: Slot board, embedding cache, fetch coordinator, scorer, and match engine

pub mod config;
pub mod embedding;
pub mod matching;
