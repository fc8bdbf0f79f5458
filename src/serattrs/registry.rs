//! Attribute type registry.
//!
//! Maps type tags (`"string"`, `"integer"`, ...) to factories that build a
//! [`AttributeType`] from a field's [`FieldOptions`]. A registry instance is
//! handed to schema construction; the tags it knows are exactly the verbs a
//! schema may declare fields with.
//!
//! Factories receive the registry itself so composite types can resolve
//! their child tags (`item`, per-key `types`) through the same vocabulary.

use crate::error::{AttrError, Result};
use crate::types::{AttributeType, FieldOptions};
use std::collections::BTreeMap;

/// Builds a descriptor for a field declaration.
pub type TypeFactory = fn(&TypeRegistry, &FieldOptions) -> Result<AttributeType>;

/// Tag used for array items and hash values when no type is given.
pub const DEFAULT_CHILD_TAG: &str = "string";

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    factories: BTreeMap<String, TypeFactory>,
}

impl Default for TypeRegistry {
    /// A registry carrying the builtin tags.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("string", |_, _| Ok(AttributeType::string()))
            .register("integer", |_, _| Ok(AttributeType::integer()))
            .register("float", |_, _| Ok(AttributeType::float()))
            .register("boolean", |_, _| Ok(AttributeType::boolean()))
            .register("time", |_, _| Ok(AttributeType::time()))
            .register("array", array_type)
            .register("hash", hash_type);
        registry
    }
}

impl TypeRegistry {
    /// A registry with no tags at all.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Associate `tag` with `factory`, replacing any previous association.
    pub fn register(&mut self, tag: impl Into<String>, factory: TypeFactory) -> &mut Self {
        self.factories.insert(tag.into(), factory);
        self
    }

    pub fn resolve(&self, tag: &str) -> Result<TypeFactory> {
        self.factories
            .get(tag)
            .copied()
            .ok_or_else(|| AttrError::UnknownType(tag.to_string()))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Resolve `tag` and build its descriptor.
    ///
    /// A declared default is parsed through the built type, so it holds the
    /// same canonical value a write would store. A blank default is no
    /// default.
    pub fn build(&self, tag: &str, options: &FieldOptions) -> Result<AttributeType> {
        let factory = self.resolve(tag)?;
        let ty = factory(self, options)?;
        let Some(raw) = &options.default else {
            return Ok(ty);
        };
        let default = ty.parse(raw)?;
        Ok(ty.with_default(default))
    }
}

fn array_type(registry: &TypeRegistry, options: &FieldOptions) -> Result<AttributeType> {
    let tag = options.item.as_deref().unwrap_or(DEFAULT_CHILD_TAG);
    let item = registry.build(tag, &FieldOptions::default())?;
    Ok(AttributeType::array(item))
}

fn hash_type(registry: &TypeRegistry, options: &FieldOptions) -> Result<AttributeType> {
    let mut types = BTreeMap::new();
    for (key, tag) in &options.types {
        types.insert(key.clone(), registry.build(tag, &FieldOptions::default())?);
    }
    let fallback = registry.build(DEFAULT_CHILD_TAG, &FieldOptions::default())?;
    Ok(AttributeType::hash(types, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;
    use crate::value::AttrValue;

    #[test]
    fn default_registry_has_builtin_tags() {
        let registry = TypeRegistry::default();
        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(
            tags,
            vec!["array", "boolean", "float", "hash", "integer", "string", "time"]
        );
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let registry = TypeRegistry::default();
        match registry.resolve("decimal") {
            Err(AttrError::UnknownType(tag)) => assert_eq!(tag, "decimal"),
            other => panic!("Expected UnknownType, got {:?}", other.map(|_| ())),
        }
        assert!(TypeRegistry::empty().resolve("string").is_err());
    }

    #[test]
    fn build_applies_default() {
        let registry = TypeRegistry::default();
        let ty = registry
            .build("integer", &FieldOptions::new().default_value(18))
            .unwrap();
        assert_eq!(ty.default(), AttrValue::Integer(18));
    }

    #[test]
    fn build_parses_default_through_the_type() {
        let registry = TypeRegistry::default();
        let ty = registry
            .build("integer", &FieldOptions::new().default_value("18"))
            .unwrap();
        assert_eq!(ty.default(), AttrValue::Integer(18));

        let picks = registry
            .build(
                "array",
                &FieldOptions::new().item("integer").default_value(vec!["4", "2"]),
            )
            .unwrap();
        assert_eq!(
            picks.default(),
            AttrValue::Array(vec![AttrValue::Integer(4), AttrValue::Integer(2)])
        );
    }

    #[test]
    fn unparseable_default_fails_build() {
        let registry = TypeRegistry::default();
        let result = registry.build("time", &FieldOptions::new().default_value("someday"));
        assert!(matches!(result, Err(AttrError::Coercion { kind: "time", .. })));
    }

    #[test]
    fn blank_default_is_no_default() {
        let registry = TypeRegistry::default();
        let ty = registry
            .build("integer", &FieldOptions::new().default_value(""))
            .unwrap();
        assert!(!ty.has_default());
    }

    #[test]
    fn array_item_defaults_to_string() {
        let registry = TypeRegistry::default();
        let ty = registry.build("array", &FieldOptions::new()).unwrap();
        match ty.kind() {
            TypeKind::Array(item) => assert_eq!(item.kind_name(), "string"),
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn composite_children_must_be_registered() {
        let registry = TypeRegistry::default();
        let result = registry.build("array", &FieldOptions::new().item("money"));
        assert!(matches!(result, Err(AttrError::UnknownType(tag)) if tag == "money"));
    }

    #[test]
    fn custom_tags_compose_builtins() {
        let mut registry = TypeRegistry::default();
        registry.register("tags", |reg, _| {
            reg.build("array", &FieldOptions::new().item("string"))
                .map(|ty| ty.with_default(Vec::<String>::new()))
        });
        let ty = registry.build("tags", &FieldOptions::new()).unwrap();
        assert_eq!(ty.kind_name(), "array");
        assert_eq!(ty.default(), AttrValue::Array(vec![]));
    }
}
