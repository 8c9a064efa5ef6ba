//! Extraction module - instruction, record schema and the LLM extractor

mod extractor;
pub mod instruction;
pub mod schema;

pub use extractor::{parse_json_payload, Extractor, PageContent};
pub use instruction::default_instruction;
pub use schema::{FieldSpec, RecordSchema};

/// A natural-language instruction plus the schema the answer must follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub instruction: String,
    pub schema: RecordSchema,
}

impl ExtractRequest {
    pub fn new(instruction: impl Into<String>, schema: RecordSchema) -> Self {
        Self {
            instruction: instruction.into(),
            schema,
        }
    }

    /// The default interactive-element request for a page
    pub fn interactive_elements(url: &str) -> Self {
        Self::new(
            default_instruction(url),
            RecordSchema::interactive_elements(),
        )
    }
}
