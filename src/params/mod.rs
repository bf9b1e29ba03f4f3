pub mod literal;
pub mod parameter;
pub mod types;

pub use literal::{Literal, LiteralError, parse_literal};
pub use parameter::{Parameter, ParameterRecord, ParameterSet, Role};
pub use types::{CwlType, infer_cwl_type};
