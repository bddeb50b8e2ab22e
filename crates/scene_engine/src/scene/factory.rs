//! String-keyed property construction
//!
//! The registration table behind scene decode: maps a property type name
//! to a constructor producing a property bound to a given node. Populated
//! once by the host before any scene is decoded; there is no dynamic
//! plugin loading after that.

use std::collections::HashMap;
use std::fmt;

use super::error::SceneError;
use super::node::NodeId;
use super::property::Property;

/// Constructor producing a property bound to its owning node.
pub type PropertyConstructor = Box<dyn Fn(NodeId) -> Box<dyn Property> + Send + Sync>;

/// Registration table mapping property type names to constructors.
///
/// An explicit instance rather than process-global state; pass it to
/// [`NodeRegistry::load_from_file`] when decoding a scene.
///
/// [`NodeRegistry::load_from_file`]: super::registry::NodeRegistry::load_from_file
#[derive(Default)]
pub struct PropertyFactory {
    constructors: HashMap<String, PropertyConstructor>,
}

impl PropertyFactory {
    /// Create an empty factory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a property type name.
    ///
    /// Re-registering a name overwrites the previous constructor: last
    /// registration wins.
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        F: Fn(NodeId) -> Box<dyn Property> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self
            .constructors
            .insert(type_name.clone(), Box::new(constructor))
            .is_some()
        {
            log::debug!("property type '{type_name}' re-registered, last registration wins");
        }
    }

    /// Construct a property of the given type, bound to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownPropertyType`] when no constructor is
    /// registered for `type_name`. During scene decode the caller skips
    /// the single property entry and continues.
    pub fn create(
        &self,
        type_name: &str,
        owner: NodeId,
    ) -> Result<Box<dyn Property>, SceneError> {
        self.constructors.get(type_name).map_or_else(
            || Err(SceneError::UnknownPropertyType(type_name.to_owned())),
            |constructor| Ok(constructor(owner)),
        )
    }

    /// Whether a constructor is registered for `type_name`
    #[must_use]
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Number of registered property types
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether no property types are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for PropertyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PropertyFactory")
            .field("registered", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::property::{to_fragment, PropertyFragment};

    struct Marker(u32);

    impl Property for Marker {
        fn type_name(&self) -> &'static str {
            "Marker"
        }

        fn load(&mut self, _fragment: &PropertyFragment) -> Result<(), SceneError> {
            Ok(())
        }

        fn save(&self) -> Result<PropertyFragment, SceneError> {
            to_fragment(&self.0)
        }
    }

    #[test]
    fn test_create_unknown_type_fails() {
        let factory = PropertyFactory::new();
        let result = factory.create("Nope", NodeId::new(0));
        assert!(matches!(result, Err(SceneError::UnknownPropertyType(name)) if name == "Nope"));
    }

    #[test]
    fn test_register_and_create() {
        let mut factory = PropertyFactory::new();
        factory.register("Marker", |_owner| Box::new(Marker(1)) as Box<dyn Property>);

        assert!(factory.is_registered("Marker"));
        let property = factory.create("Marker", NodeId::new(7)).expect("registered");
        assert_eq!(property.type_name(), "Marker");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut factory = PropertyFactory::new();
        factory.register("Marker", |_owner| Box::new(Marker(1)) as Box<dyn Property>);
        factory.register("Marker", |_owner| Box::new(Marker(2)) as Box<dyn Property>);

        assert_eq!(factory.len(), 1);
        // The second constructor is the one that runs.
        let property = factory.create("Marker", NodeId::new(0)).expect("registered");
        let payload = property.save().expect("save");
        assert_eq!(payload, to_fragment(&2u32).expect("encode"));
    }
}
