//! Record and sum-type handler derivation, built as runtime value tables
//! rather than compile-time code generation: a [`DerivationConfig`] plus a
//! handful of builder combinators in [`record`], [`sum`], and [`recursive`].

pub mod naming;
pub mod record;
pub mod recursive;
pub mod sum;

use std::{collections::HashMap, sync::Arc};

/// How an unrenamed field or type name is turned into its wire-format name.
#[derive(Clone)]
pub enum NamingPolicy {
    /// Use the Rust identifier verbatim.
    Identity,
    /// Convert to `snake_case`.
    SnakeCase,
    /// Convert to `PascalCase`.
    PascalCase,
    /// Convert to `camelCase`.
    CamelCase,
    /// A caller-supplied transform.
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NamingPolicy {
    /// Applies this policy to a Rust identifier.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingPolicy::Identity => name.to_owned(),
            NamingPolicy::SnakeCase => naming::to_snake_case(name),
            NamingPolicy::PascalCase => naming::to_pascal_case(name),
            NamingPolicy::CamelCase => naming::to_camel_case(name),
            NamingPolicy::Custom(f) => f(name),
        }
    }
}

impl std::fmt::Debug for NamingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamingPolicy::Identity => write!(f, "Identity"),
            NamingPolicy::SnakeCase => write!(f, "SnakeCase"),
            NamingPolicy::PascalCase => write!(f, "PascalCase"),
            NamingPolicy::CamelCase => write!(f, "CamelCase"),
            NamingPolicy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Per-field overrides that take precedence over the naming policy.
#[derive(Clone, Debug, Default)]
pub struct FieldOverride {
    /// An explicit wire key, overriding the naming policy entirely.
    pub rename: Option<String>,
    /// `@NoneAsNull`: write `None` as an explicit `Bson::Null` instead of the
    /// default policy of omitting the key entirely.
    pub none_as_null: bool,
}

/// The set of cross-cutting derivation choices: how field and type names are
/// translated to wire names, which field carries a sum type's discriminator,
/// and any per-field renames.
///
/// This is an explicit, caller-constructed value, not global state: two
/// derived handlers in the same process are free to use different configs.
#[derive(Clone, Debug)]
pub struct DerivationConfig {
    field_naming: NamingPolicy,
    type_naming: NamingPolicy,
    discriminator_field: String,
    field_overrides: HashMap<&'static str, FieldOverride>,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        DerivationConfig {
            field_naming: NamingPolicy::Identity,
            type_naming: NamingPolicy::Identity,
            discriminator_field: "className".to_owned(),
            field_overrides: HashMap::new(),
        }
    }
}

impl DerivationConfig {
    /// The default configuration: identity naming, `"className"` as the
    /// discriminator field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field naming policy.
    #[must_use]
    pub fn with_field_naming(mut self, policy: NamingPolicy) -> Self {
        self.field_naming = policy;
        self
    }

    /// Sets the type naming policy, used to derive a sum-type variant's
    /// discriminator value from its Rust type name when not renamed.
    #[must_use]
    pub fn with_type_naming(mut self, policy: NamingPolicy) -> Self {
        self.type_naming = policy;
        self
    }

    /// Sets the discriminator field name used by sum-type handlers built
    /// against this config.
    #[must_use]
    pub fn with_discriminator_field(mut self, field: impl Into<String>) -> Self {
        self.discriminator_field = field.into();
        self
    }

    /// Registers an explicit wire-name override for a Rust field name,
    /// superseding the field naming policy for that field only.
    #[must_use]
    pub fn with_renamed_field(mut self, rust_name: &'static str, wire_name: impl Into<String>) -> Self {
        self.field_overrides.entry(rust_name).or_default().rename = Some(wire_name.into());
        self
    }

    /// Marks a field as `@NoneAsNull`: writing `None` emits `Bson::Null`
    /// rather than omitting the key.
    #[must_use]
    pub fn with_none_as_null(mut self, rust_name: &'static str) -> Self {
        self.field_overrides.entry(rust_name).or_default().none_as_null = true;
        self
    }

    /// Whether `rust_name` was marked `@NoneAsNull`.
    pub fn resolve_none_as_null(&self, rust_name: &'static str) -> bool {
        self.field_overrides
            .get(rust_name)
            .map(|o| o.none_as_null)
            .unwrap_or(false)
    }

    /// The discriminator field name.
    pub fn discriminator_field(&self) -> &str {
        &self.discriminator_field
    }

    /// Resolves the wire key for a Rust field name: an explicit rename wins,
    /// otherwise the field naming policy is applied.
    pub fn resolve_field_key(&self, rust_name: &'static str) -> String {
        match self.field_overrides.get(rust_name).and_then(|o| o.rename.clone()) {
            Some(renamed) => renamed,
            None => self.field_naming.apply(rust_name),
        }
    }

    /// Resolves the discriminator tag for a Rust type name: an explicit
    /// `tag` wins, otherwise the type naming policy is applied.
    pub fn resolve_type_tag(&self, rust_type_name: &str, tag: Option<&str>) -> String {
        match tag {
            Some(t) => t.to_owned(),
            None => self.type_naming.apply(rust_type_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_identity_naming_and_class_name_discriminator() {
        let config = DerivationConfig::new();
        assert_eq!(config.resolve_field_key("firstName"), "firstName");
        assert_eq!(config.discriminator_field(), "className");
    }

    #[test]
    fn snake_case_policy_transforms_unrenamed_fields() {
        let config = DerivationConfig::new().with_field_naming(NamingPolicy::SnakeCase);
        assert_eq!(config.resolve_field_key("firstName"), "first_name");
    }

    #[test]
    fn explicit_rename_overrides_naming_policy() {
        let config = DerivationConfig::new()
            .with_field_naming(NamingPolicy::SnakeCase)
            .with_renamed_field("firstName", "fname");
        assert_eq!(config.resolve_field_key("firstName"), "fname");
    }

    #[test]
    fn type_tag_falls_back_to_type_naming_policy() {
        let config = DerivationConfig::new().with_type_naming(NamingPolicy::SnakeCase);
        assert_eq!(config.resolve_type_tag("CircleShape", None), "circle_shape");
        assert_eq!(config.resolve_type_tag("CircleShape", Some("circle")), "circle");
    }

    #[test]
    fn none_as_null_defaults_to_false_and_can_be_set() {
        let config = DerivationConfig::new();
        assert!(!config.resolve_none_as_null("value"));
        let config = config.with_none_as_null("value");
        assert!(config.resolve_none_as_null("value"));
    }
}
