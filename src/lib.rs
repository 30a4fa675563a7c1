//! Composable validators for JSON data, and a compiler that builds them from
//! JSON Schema documents (draft-04 vocabulary).
//!
//! Every validator implements [`Validator`]. Failures come back as a tree of
//! [`ValidationError`]s mirroring the shape of the data, which
//! [`ValidationError::leaves`] flattens into JSON pointers.

mod collection;
mod compile;
mod compound;
mod error;
mod json_object;
mod json_type;
mod keyed;
mod number;
mod object;
mod string;
mod validator;
mod value_set;

pub use collection::*;
pub use compile::*;
pub use compound::*;
pub use error::*;
pub use json_object::*;
pub use json_type::*;
pub use keyed::*;
pub use number::*;
pub use object::*;
pub use string::*;
pub use validator::*;
pub use value_set::*;
