pub mod error;
pub mod extract;
pub mod hash;
pub mod pipeline;

pub use error::IngestError;
pub use extract::{AutoExtractor, ExtractError, TextExtractor, Utf8Extractor};
#[cfg(feature = "pdf")]
pub use extract::PdfExtractor;
pub use pipeline::{Document, FileOutcome, FileStatus, IngestPipeline, IngestReport, UploadBatch};
