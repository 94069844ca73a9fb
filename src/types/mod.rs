mod context;
mod criteria;
mod error;
mod field;
mod node;
mod operator;
mod value;

pub use context::{EvalContext, Placeholder, SqlBindings};
pub use criteria::EligibilityCriteria;
pub use error::{CatalogError, SqlError, ValidationError};
pub use field::{FieldCategory, FieldDataType, FieldDef, FieldOption, FieldRegistry};
pub use node::{FieldRule, Group, GroupLogic, RuleNode, SqlRule};
pub use operator::Operator;
pub use value::Value;
