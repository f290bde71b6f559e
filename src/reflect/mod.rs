//! Reflection Module
//!
//! The crate's stand-in for runtime reflection. Classes declare their shape
//! once (via the `reflect_object!` macro or by hand) and everything else is
//! driven by it:
//!
//! - `descriptor.rs` - class/property descriptors (hints, annotations, defaults)
//! - `object.rs` - the privileged by-name field accessor
//! - `registry.rs` - class name -> descriptor + constructor
//! - `value.rs` - field slot values exchanged through the accessor
//! - `macros.rs` - the `reflect_object!` declaration macro

mod descriptor;
mod macros;
mod object;
mod registry;
mod value;

pub use descriptor::{ClassDescriptor, PropertyDescriptor};
pub use object::{ReflectClass, ReflectError, ReflectKind, ReflectedObject};
pub use registry::ClassRegistry;
pub use value::{EntityBox, FieldValue, value_type_name};

pub(crate) use value::is_truthy;
