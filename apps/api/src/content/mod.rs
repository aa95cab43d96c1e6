// Content lifecycle: persistence, owner-scoped listing, downloads and the
// retention sweep. Storage goes through the `ContentStore` port only.

pub mod archive;
pub mod captions;
pub mod handlers;
pub mod lifecycle;
pub mod store;
pub mod sweep;
