//! Semantic analysis: alias scopes, schema-aware validation, and lowering of
//! the AST into the relational-algebra IR.

mod lowering;
mod scope;
mod validator;

pub use lowering::lower;
pub use scope::AliasScope;
pub use validator::{validate, ValidationError, ValidationErrorKind};
