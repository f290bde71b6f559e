//! `reflect_object!` declares a plain struct together with everything the
//! merge engine needs to treat it as a reflectable class: a `Default`
//! constructor, a `ClassDescriptor` (namespace, imports, declaration-ordered
//! properties with inline type hints, annotations and captured defaults),
//! and the privileged `ReflectedObject` accessor.
//!
//! ```
//! use entitymerge::reflect_object;
//! use serde_json::Value as JsonValue;
//!
//! reflect_object! {
//!     pub struct Article {
//!         namespace: "blog",
//!         imports: ["blog::author::Author"],
//!         fields: {
//!             id: Option<i64>,
//!             title: Option<String> as "string",
//!             tags: Vec<String> = Vec::new(),
//!             extra: Option<JsonValue>,
//!         },
//!     }
//! }
//! ```
//!
//! Scalar fields round-trip through serde, so their types must implement
//! `Serialize` and `DeserializeOwned`. Relation slots are declared in a
//! separate `relations` section as `name: one Target` or `name: many Target`
//! and are stored as `Option<Target>` / `Vec<Target>`.

#[macro_export]
macro_rules! reflect_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            namespace: $ns:literal
            $(, imports: [$($import:literal),* $(,)?])?
            $(, fields: {
                $($field:ident : $fty:ty
                    $(as $hint:literal $([$($ann:literal),* $(,)?])?)?
                    $(= $default:expr)?
                ),* $(,)?
            })?
            $(, relations: {
                $($rfield:ident : $rkind:ident $rty:ty),* $(,)?
            })?
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $($(pub $field: $fty,)*)?
            $($(pub $rfield: $crate::reflect_object!(@slot $rkind $rty),)*)?
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $($($field: $crate::reflect_object!(@default $($default)?),)*)?
                    $($($rfield: ::core::default::Default::default(),)*)?
                }
            }
        }

        impl $crate::reflect::ReflectClass for $name {
            const CLASS_NAME: &'static str =
                ::core::concat!($ns, "::", ::core::stringify!($name));

            fn class_descriptor() -> $crate::reflect::ClassDescriptor {
                #[allow(unused_mut)]
                let mut descriptor =
                    $crate::reflect::ClassDescriptor::new($ns, ::core::stringify!($name));
                $($(descriptor.imports.push($import.to_string());)*)?
                $($(
                    #[allow(unused_mut)]
                    let mut property =
                        $crate::reflect::PropertyDescriptor::new(::core::stringify!($field));
                    $(
                        property.type_hint = Some($hint.to_string());
                        $($(property.annotations.push($ann.to_string());)*)?
                    )?
                    $(
                        let default: $fty = $default;
                        property.default = $crate::serde_json::to_value(&default).ok();
                    )?
                    descriptor.properties.push(property);
                )*)?
                $($(
                    descriptor.properties.push($crate::reflect::PropertyDescriptor::new(
                        ::core::stringify!($rfield),
                    ));
                )*)?
                descriptor
            }
        }

        impl $crate::reflect::ReflectedObject for $name {
            fn class_name(&self) -> &str {
                <Self as $crate::reflect::ReflectClass>::CLASS_NAME
            }

            fn descriptor(&self) -> ::core::option::Option<&$crate::reflect::ClassDescriptor> {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::reflect::ClassDescriptor> =
                    ::std::sync::OnceLock::new();
                Some(DESCRIPTOR.get_or_init(
                    <$name as $crate::reflect::ReflectClass>::class_descriptor,
                ))
            }

            fn field_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![
                    $($(::core::stringify!($field).to_string(),)*)?
                    $($(::core::stringify!($rfield).to_string(),)*)?
                ]
            }

            fn get_field(
                &self,
                name: &str,
            ) -> ::core::option::Option<$crate::reflect::FieldValue> {
                match name {
                    $($(::core::stringify!($field) => {
                        Some($crate::reflect::FieldValue::Scalar(
                            $crate::serde_json::to_value(&self.$field)
                                .unwrap_or($crate::serde_json::Value::Null),
                        ))
                    })*)?
                    $($(::core::stringify!($rfield) => {
                        Some($crate::reflect_object!(@get $rkind self.$rfield))
                    })*)?
                    _ => None,
                }
            }

            fn take_field(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<$crate::reflect::FieldValue> {
                match name {
                    $($(::core::stringify!($field) => {
                        Some($crate::reflect::FieldValue::Scalar(
                            $crate::serde_json::to_value(&self.$field)
                                .unwrap_or($crate::serde_json::Value::Null),
                        ))
                    })*)?
                    $($(::core::stringify!($rfield) => {
                        Some($crate::reflect_object!(@take $rkind self.$rfield))
                    })*)?
                    _ => None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::reflect::FieldValue,
            ) -> ::core::result::Result<(), $crate::reflect::ReflectError> {
                match name {
                    $($(::core::stringify!($field) => match value {
                        $crate::reflect::FieldValue::Scalar(raw) => {
                            self.$field = $crate::serde_json::from_value::<$fty>(raw)
                                .map_err(|err| $crate::reflect::ReflectError::TypeMismatch {
                                    property: ::core::stringify!($field).to_string(),
                                    class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME
                                        .to_string(),
                                    reason: err.to_string(),
                                })?;
                            Ok(())
                        }
                        _ => Err($crate::reflect::ReflectError::TypeMismatch {
                            property: ::core::stringify!($field).to_string(),
                            class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME
                                .to_string(),
                            reason: "expected a scalar value".to_string(),
                        }),
                    },)*)?
                    $($(::core::stringify!($rfield) => $crate::reflect_object!(
                        @set $rkind $rty, self.$rfield, value, ::core::stringify!($rfield)
                    ),)*)?
                    _ => Err($crate::reflect::ReflectError::NoSuchProperty(
                        name.to_string(),
                        <Self as $crate::reflect::ReflectClass>::CLASS_NAME.to_string(),
                    )),
                }
            }

            fn clone_boxed(&self) -> $crate::reflect::EntityBox {
                ::std::boxed::Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }
    };

    (@slot one $rty:ty) => { ::core::option::Option<$rty> };
    (@slot many $rty:ty) => { ::std::vec::Vec<$rty> };

    (@default) => { ::core::default::Default::default() };
    (@default $default:expr) => { $default };

    (@get one $slot:expr) => {
        $crate::reflect::FieldValue::Entity(($slot).clone().map(|related| {
            ::std::boxed::Box::new(related) as $crate::reflect::EntityBox
        }))
    };
    (@get many $slot:expr) => {
        $crate::reflect::FieldValue::Collection(
            ($slot)
                .iter()
                .cloned()
                .map(|related| ::std::boxed::Box::new(related) as $crate::reflect::EntityBox)
                .collect(),
        )
    };

    (@take one $slot:expr) => {
        $crate::reflect::FieldValue::Entity(($slot).take().map(|related| {
            ::std::boxed::Box::new(related) as $crate::reflect::EntityBox
        }))
    };
    (@take many $slot:expr) => {
        $crate::reflect::FieldValue::Collection(
            ::std::mem::take(&mut $slot)
                .into_iter()
                .map(|related| ::std::boxed::Box::new(related) as $crate::reflect::EntityBox)
                .collect(),
        )
    };

    (@set one $rty:ty, $slot:expr, $value:expr, $prop:expr) => {
        match $value {
            $crate::reflect::FieldValue::Entity(incoming) => match incoming {
                Some(boxed) => match boxed.into_any().downcast::<$rty>() {
                    Ok(related) => {
                        $slot = Some(*related);
                        Ok(())
                    }
                    Err(_) => Err($crate::reflect::ReflectError::TypeMismatch {
                        property: $prop.to_string(),
                        class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME.to_string(),
                        reason: ::std::format!(
                            "expected an instance of {}",
                            ::core::stringify!($rty)
                        ),
                    }),
                },
                None => {
                    $slot = None;
                    Ok(())
                }
            },
            _ => Err($crate::reflect::ReflectError::TypeMismatch {
                property: $prop.to_string(),
                class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME.to_string(),
                reason: "expected an entity value".to_string(),
            }),
        }
    };
    (@set many $rty:ty, $slot:expr, $value:expr, $prop:expr) => {
        match $value {
            $crate::reflect::FieldValue::Collection(items) => {
                let mut collected = ::std::vec::Vec::with_capacity(items.len());
                let mut mismatch = false;
                for item in items {
                    match item.into_any().downcast::<$rty>() {
                        Ok(entity) => collected.push(*entity),
                        Err(_) => {
                            mismatch = true;
                            break;
                        }
                    }
                }
                if mismatch {
                    Err($crate::reflect::ReflectError::TypeMismatch {
                        property: $prop.to_string(),
                        class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME.to_string(),
                        reason: ::std::format!(
                            "expected instances of {}",
                            ::core::stringify!($rty)
                        ),
                    })
                } else {
                    $slot = collected;
                    Ok(())
                }
            }
            _ => Err($crate::reflect::ReflectError::TypeMismatch {
                property: $prop.to_string(),
                class: <Self as $crate::reflect::ReflectClass>::CLASS_NAME.to_string(),
                reason: "expected a collection of entities".to_string(),
            }),
        }
    };
}
