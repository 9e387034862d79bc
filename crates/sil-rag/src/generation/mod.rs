//! Query routing, prompt assembly and answer generation

pub mod answer;
pub mod citation;
pub mod context;
pub mod prompt;
pub mod router;

pub use answer::AnswerGenerator;
pub use citation::cited_indices;
pub use context::{format_context, ContextFormatter, FormattedContext};
pub use prompt::PromptBuilder;
pub use router::{is_smalltalk, QueryRouter, SMALLTALK_PHRASES};
