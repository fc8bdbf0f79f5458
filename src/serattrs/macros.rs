//! Typed accessor generation.
//!
//! [`attribute_accessors!`](crate::attribute_accessors) writes the per-field
//! methods for a type implementing [`Attributed`](crate::Attributed). Fields
//! are grouped by type tag, the same verbs a schema is declared with:
//!
//! ```
//! use serattrs::{attribute_accessors, Attributed, MemoryRecord, Record};
//!
//! struct Document {
//!     record: Record<MemoryRecord>,
//! }
//!
//! impl Attributed for Document {
//!     type Host = MemoryRecord;
//!
//!     fn record(&self) -> &Record<MemoryRecord> {
//!         &self.record
//!     }
//!
//!     fn record_mut(&mut self) -> &mut Record<MemoryRecord> {
//!         &mut self.record
//!     }
//! }
//!
//! attribute_accessors! {
//!     impl Document {
//!         string title, body;
//!         integer age;
//!         boolean active;
//!     }
//! }
//! ```
//!
//! For every field `name` this generates:
//!
//! | method | returns |
//! |---|---|
//! | `name()` | `Result<Option<T>>`, `None` when unset |
//! | `set_name(v)` | the parsed value |
//! | `name_changed()` | whether it was written since the last load |
//! | `name_before_type_cast()` | the encoded value as a string |
//! | `name_change()` | `(previous, current)` when changed |
//!
//! Boolean fields also get `is_name()`, which is `false` when unset. Tags
//! without a native mapping (custom registry tags) use `AttrValue` as `T`.

#[macro_export]
macro_rules! attribute_accessors {
    (impl $ty:ty { $($kind:ident $($name:ident),+ ;)* }) => {
        impl $ty {
            $($(
                $crate::attribute_accessors!(@field $kind $name);
            )+)*
        }
    };

    (@field string $name:ident) => {
        $crate::attribute_accessors!(@common $name, ::std::string::String);
    };
    (@field integer $name:ident) => {
        $crate::attribute_accessors!(@common $name, i64);
    };
    (@field float $name:ident) => {
        $crate::attribute_accessors!(@common $name, f64);
    };
    (@field time $name:ident) => {
        $crate::attribute_accessors!(
            @common $name,
            $crate::chrono::DateTime<$crate::chrono::Utc>
        );
    };
    (@field array $name:ident) => {
        $crate::attribute_accessors!(@common $name, ::std::vec::Vec<$crate::AttrValue>);
    };
    (@field hash $name:ident) => {
        $crate::attribute_accessors!(
            @common $name,
            ::std::collections::BTreeMap<::std::string::String, $crate::AttrValue>
        );
    };
    (@field boolean $name:ident) => {
        $crate::attribute_accessors!(@common $name, bool);

        $crate::paste::paste! {
            pub fn [<is_ $name>](&mut self) -> $crate::Result<bool> {
                let value = $crate::Attributed::record_mut(self).get(::std::stringify!($name))?;
                Ok(value.is_truthy())
            }
        }
    };
    (@field $other:ident $name:ident) => {
        $crate::attribute_accessors!(@common $name, $crate::AttrValue);
    };

    (@common $name:ident, $t:ty) => {
        $crate::paste::paste! {
            pub fn $name(&mut self) -> $crate::Result<::std::option::Option<$t>> {
                let value = $crate::Attributed::record_mut(self).get(::std::stringify!($name))?;
                Ok(<$t as $crate::FromAttr>::from_attr(value))
            }

            pub fn [<set_ $name>](
                &mut self,
                value: impl ::std::convert::Into<$crate::AttrValue>,
            ) -> $crate::Result<$crate::AttrValue> {
                $crate::Attributed::record_mut(self).set(::std::stringify!($name), value)
            }

            pub fn [<$name _changed>](&self) -> bool {
                $crate::Attributed::record(self).is_changed(::std::stringify!($name))
            }

            pub fn [<$name _before_type_cast>](&mut self) -> $crate::Result<::std::string::String> {
                $crate::Attributed::record_mut(self).before_type_cast(::std::stringify!($name))
            }

            pub fn [<$name _change>](
                &mut self,
            ) -> $crate::Result<::std::option::Option<($crate::AttrValue, $crate::AttrValue)>> {
                $crate::Attributed::record_mut(self).change(::std::stringify!($name))
            }
        }
    };
}
