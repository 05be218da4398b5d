//! # Reportsync Core Domain Models
//!
//! Data passed between the stages of the report pipeline:
//!
//! - **Identifier**: normalized product or variant code
//! - **RawRecord**: one cell or text fragment read from a report file
//! - **ExtractionResult**: the identifiers of one run, tagged as ordered
//!   (`Structured`) or best-effort (`Heuristic`)
//! - **SheetPayload**: the table handed to a spreadsheet writer

pub mod identifier;
pub mod record;
pub mod extraction;
pub mod sheet;


pub use identifier::*;
pub use record::*;
pub use extraction::*;
pub use sheet::*;
