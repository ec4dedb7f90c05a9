pub mod controller;
pub mod router;
pub mod service;

pub use router::init_docs_router;
pub use service::DocsAggregator;
