pub mod binary;
pub mod descriptor;
pub mod orderedheaders;
pub mod requestbody;
pub mod response;

// Re-exports for convenience
pub use binary::{ContentAnomaly, DecodedBody};
pub use descriptor::{MultiHeaders, RequestDescriptor, ResponseDescriptor};
pub use orderedheaders::OrderedHeaders;
pub use requestbody::RequestBody;
pub use response::Response;
