// Script generation pipeline.
// Request → persona handler → prompt composition → model call → section
// parsing → bundle assembly. All model calls go through `invoker`.

pub mod agents;
pub mod assembler;
pub mod bundle;
pub mod composer;
pub mod content_type;
pub mod duration;
pub mod generator;
pub mod handlers;
pub mod invoker;
pub mod parser;
pub mod prompts;
pub mod request;
pub mod style_catalog;
pub mod templates;
