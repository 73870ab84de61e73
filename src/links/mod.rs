pub mod code;
pub mod models;
pub mod normalize;
pub mod service;
pub mod store;

pub use code::{ALPHABET, ByteSource, CodeGenerator, ThreadRngSource, encode_code};
pub use models::{LinkRecord, LinkSummary};
pub use normalize::normalize_destination;
pub use service::LinkService;
pub use store::LinkStore;
