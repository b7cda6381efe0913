//! Recommendation domain.
//!
//! The prompt template and the reply resolver share one contract: the labels the
//! model is told to answer with are the labels the resolver looks for.

mod candidate;
mod errors;
mod prompt;
mod request;
mod resolver;

pub use candidate::{Candidate, PriceRange};
pub use errors::ResolveError;
pub use prompt::{PromptTemplate, ReplyLabels};
pub use request::{Recommendation, RecommendationRequest};
pub use resolver::{ParsedReply, Resolution};
