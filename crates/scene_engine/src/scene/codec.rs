//! Scene codec: converts between the in-memory node/property graph and
//! the on-disk hierarchical text representation
//!
//! Scene files are RON documents with one required top-level `nodes`
//! section, a mapping from integer node id to node record:
//!
//! ```ron
//! (
//!     nodes: {
//!         0: (
//!             name: "Camera",
//!             transform: (
//!                 position: (x: 0.0, y: 0.0, z: 0.0),
//!                 rotation: (x: 0.0, y: 0.0, z: 0.0),
//!                 scale: (x: 1.0, y: 1.0, z: 1.0),
//!             ),
//!             properties: {},
//!         ),
//!     },
//! )
//! ```
//!
//! Property fragments are opaque to the codec; only the owning property
//! type knows their schema. Node order and per-node property order are
//! preserved exactly through decode and encode, and file ids are
//! reinstated as runtime ids.

use indexmap::IndexMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::math::{Transform, Vec3};

use super::error::SceneError;
use super::factory::PropertyFactory;
use super::node::{Node, NodeId};
use super::property::PropertyFragment;

/// Serialized form of a 3-component vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct VecRecord {
    x: f32,
    y: f32,
    z: f32,
}

impl From<&Vec3> for VecRecord {
    fn from(v: &Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl VecRecord {
    fn into_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Serialized form of a node transform. All three vectors are required.
#[derive(Debug, Serialize, Deserialize)]
struct TransformRecord {
    position: VecRecord,
    rotation: VecRecord,
    scale: VecRecord,
}

impl From<&Transform> for TransformRecord {
    fn from(transform: &Transform) -> Self {
        Self {
            position: (&transform.position).into(),
            rotation: (&transform.rotation).into(),
            scale: (&transform.scale).into(),
        }
    }
}

impl TransformRecord {
    fn into_transform(self) -> Transform {
        Transform::new(
            self.position.into_vec3(),
            self.rotation.into_vec3(),
            self.scale.into_vec3(),
        )
    }
}

/// Serialized form of one node.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    name: String,
    transform: TransformRecord,
    #[serde(default)]
    properties: IndexMap<String, PropertyFragment>,
}

/// Full scene document, encode side.
#[derive(Debug, Serialize)]
struct SceneDocument {
    nodes: IndexMap<u64, NodeRecord>,
}

/// Decode-side document wrapper that distinguishes a missing `nodes`
/// section from an empty one.
struct RawDocument {
    nodes: Option<IndexMap<u64, NodeRecord>>,
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        enum Field {
            Nodes,
            Ignore,
        }

        impl<'de> Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct FieldVisitor;

                impl Visitor<'_> for FieldVisitor {
                    type Value = Field;

                    fn expecting(
                        &self,
                        formatter: &mut std::fmt::Formatter<'_>,
                    ) -> std::fmt::Result {
                        formatter.write_str("a scene document field")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        Ok(match value {
                            "nodes" => Field::Nodes,
                            _ => Field::Ignore,
                        })
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct DocVisitor;

        impl<'de> Visitor<'de> for DocVisitor {
            type Value = RawDocument;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a scene document")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut nodes = None;
                while let Some(key) = map.next_key::<Field>()? {
                    match key {
                        Field::Nodes => nodes = Some(map.next_value()?),
                        Field::Ignore => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(RawDocument { nodes })
            }
        }

        deserializer.deserialize_struct("SceneDocument", &["nodes"], DocVisitor)
    }
}

/// Decode a scene document into nodes, in file iteration order.
///
/// Property entries whose type name is not registered in `factory`, or
/// whose fragment their property rejects, are logged and skipped; the
/// rest of the scene still decodes. A missing `nodes` section is a hard
/// failure and nothing decodes at all.
///
/// # Errors
///
/// [`SceneError::Parse`] when `text` is not a valid scene document,
/// [`SceneError::MissingNodes`] when the `nodes` section is absent.
pub fn decode(text: &str, factory: &PropertyFactory) -> Result<Vec<Node>, SceneError> {
    let raw: RawDocument = ron::from_str(text)?;
    let records = raw.nodes.ok_or(SceneError::MissingNodes)?;

    let mut nodes = Vec::with_capacity(records.len());
    for (raw_id, record) in records {
        let id = NodeId::new(raw_id);
        let mut node = Node::with_id(id, record.name, record.transform.into_transform());

        for (type_name, fragment) in record.properties {
            match factory.create(&type_name, id) {
                Ok(mut property) => match property.load(&fragment) {
                    Ok(()) => {
                        log::debug!("loaded property '{type_name}' for node {id}");
                        node.push_property(property);
                    }
                    Err(err) => {
                        log::warn!("skipping property '{type_name}' on node {id}: {err}");
                    }
                },
                Err(_) => {
                    log::warn!("unknown property type '{type_name}' on node {id}, skipping");
                }
            }
        }

        nodes.push(node);
    }

    Ok(nodes)
}

/// Encode nodes into scene document text, in the given order.
///
/// Each node record is keyed by the node's id; the `properties` mapping
/// holds each property's `save` fragment keyed by its type name.
///
/// # Errors
///
/// Any property `save` failure, or a document serialization failure.
pub fn encode(nodes: &[Node]) -> Result<String, SceneError> {
    let mut records = IndexMap::with_capacity(nodes.len());

    for node in nodes {
        let mut properties = IndexMap::with_capacity(node.property_count());
        for property in node.properties() {
            properties.insert(property.type_name().to_owned(), property.save()?);
        }

        records.insert(
            node.id().raw(),
            NodeRecord {
                name: node.key().to_owned(),
                transform: node.transform().into(),
                properties,
            },
        );
    }

    let document = SceneDocument { nodes: records };
    Ok(ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::property::{from_fragment, to_fragment, Property};
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct GlowParams {
        intensity: f32,
    }

    struct Glow {
        params: GlowParams,
    }

    impl Glow {
        fn constructor(_owner: NodeId) -> Box<dyn Property> {
            Box::new(Self {
                params: GlowParams::default(),
            })
        }
    }

    impl Property for Glow {
        fn type_name(&self) -> &'static str {
            "Glow"
        }

        fn load(&mut self, fragment: &PropertyFragment) -> Result<(), SceneError> {
            self.params = from_fragment(fragment)?;
            Ok(())
        }

        fn save(&self) -> Result<PropertyFragment, SceneError> {
            to_fragment(&self.params)
        }
    }

    fn test_factory() -> PropertyFactory {
        let mut factory = PropertyFactory::new();
        factory.register("Glow", Glow::constructor);
        factory
    }

    #[test]
    fn test_decode_missing_nodes_section_fails() {
        let factory = test_factory();
        let result = decode("(version: 1)", &factory);
        assert!(matches!(result, Err(SceneError::MissingNodes)));
    }

    #[test]
    fn test_decode_unreadable_document_fails() {
        let factory = test_factory();
        let result = decode("this is not a scene {", &factory);
        assert!(matches!(result, Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_decode_empty_nodes_section_is_an_empty_scene() {
        let factory = test_factory();
        let nodes = decode("(nodes: {})", &factory).expect("valid document");
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_decode_preserves_file_ids_and_order() {
        let text = r#"(
            nodes: {
                7: (
                    name: "Camera",
                    transform: (
                        position: (x: 0.0, y: 0.0, z: 0.0),
                        rotation: (x: 0.0, y: 0.0, z: 0.0),
                        scale: (x: 1.0, y: 1.0, z: 1.0),
                    ),
                ),
                3: (
                    name: "Light",
                    transform: (
                        position: (x: 1.0, y: 2.0, z: 3.0),
                        rotation: (x: 0.0, y: 0.0, z: 0.0),
                        scale: (x: 1.0, y: 1.0, z: 1.0),
                    ),
                ),
            },
        )"#;

        let factory = test_factory();
        let nodes = decode(text, &factory).expect("valid document");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id(), NodeId::new(7));
        assert_eq!(nodes[0].key(), "Camera");
        assert_eq!(nodes[1].id(), NodeId::new(3));
        assert_eq!(nodes[1].key(), "Light");
        assert_eq!(nodes[1].transform().position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_decode_skips_unknown_property_and_keeps_the_rest() {
        let text = r#"(
            nodes: {
                0: (
                    name: "Lamp",
                    transform: (
                        position: (x: 0.0, y: 0.0, z: 0.0),
                        rotation: (x: 0.0, y: 0.0, z: 0.0),
                        scale: (x: 1.0, y: 1.0, z: 1.0),
                    ),
                    properties: {
                        "Mystery": {"whatever": 1.0},
                        "Glow": {"intensity": 0.75},
                    },
                ),
            },
        )"#;

        let factory = test_factory();
        let nodes = decode(text, &factory).expect("valid document");

        assert_eq!(nodes.len(), 1);
        let tags: Vec<&str> = nodes[0].properties().map(|p| p.type_name()).collect();
        assert_eq!(tags, vec!["Glow"]);
    }

    #[test]
    fn test_encode_then_decode_round_trips() {
        let factory = test_factory();

        let mut camera = Node::with_id(
            NodeId::new(0),
            "Camera".to_owned(),
            Transform::default(),
        );
        camera.push_property(Box::new(Glow {
            params: GlowParams { intensity: 0.1 },
        }));

        let light = Node::with_id(
            NodeId::new(1),
            "Light".to_owned(),
            Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
        );

        let text = encode(&[camera, light]).expect("encode");
        let nodes = decode(&text, &factory).expect("decode");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].key(), "Camera");
        assert_eq!(nodes[0].id(), NodeId::new(0));
        assert_eq!(nodes[1].key(), "Light");
        assert_eq!(nodes[1].id(), NodeId::new(1));
        assert_eq!(nodes[1].transform().position, Vec3::new(1.0, 2.0, 3.0));

        let saved = nodes[0]
            .properties()
            .next()
            .expect("glow survives")
            .save()
            .expect("save");
        let params: GlowParams = from_fragment(&saved).expect("typed");
        assert_eq!(params, GlowParams { intensity: 0.1 });
    }
}
