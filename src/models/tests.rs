//! Tests for models module

use super::*;
use crate::codec::{TaggedUnion, UnionCodec, WireTag};
use crate::error::Error;
use crate::types::{AmbiguityPolicy, DecodeOptions, JsonValue};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Constraints & Indexes
// ============================================================================

#[test]
fn test_uniqueness_constraint_round_trip() {
    let doc = json!({"constraintType": "uniqueness", "properties": ["a", "b"]});

    let constraint = Constraint::codec().decode_value(doc.clone()).unwrap().unwrap();
    assert_eq!(
        constraint,
        Constraint::Uniqueness(UniquenessConstraint {
            properties: vec!["a".to_string(), "b".to_string()],
        })
    );
    assert_eq!(constraint.constraint_type(), ConstraintType::Uniqueness);

    let encoded = Constraint::codec().encode_value(&constraint).unwrap();
    assert_eq!(encoded, doc);
}

#[test]
fn test_requires_constraint_round_trip() {
    let constraint = Constraint::from(RequiresConstraint {
        require: ContainerReference::new("cdf_cdm", "CogniteAsset"),
    });

    let encoded = Constraint::codec().encode_value(&constraint).unwrap();
    assert_eq!(
        encoded,
        json!({
            "constraintType": "requires",
            "require": {"space": "cdf_cdm", "externalId": "CogniteAsset"}
        })
    );
    assert_eq!(Constraint::codec().decode_strict(encoded).unwrap(), constraint);
}

#[test]
fn test_btree_index_decodes() {
    let doc = json!({"indexType": "btree", "properties": ["x"]});

    let index = Index::codec().decode_value(doc.clone()).unwrap().unwrap();
    assert_eq!(index.index_type(), IndexType::BTree);
    assert_eq!(index.as_btree().unwrap().properties, vec!["x".to_string()]);
    assert_eq!(Index::codec().encode_value(&index).unwrap(), doc);
}

#[test_case("hashmap" ; "hashmap")]
#[test_case("inverted" ; "inverted")]
fn test_unregistered_index_is_no_value(tag: &str) {
    let doc = json!({"indexType": tag, "properties": ["x"]});

    assert_eq!(Index::codec().decode_value(doc.clone()).unwrap(), None);

    let err = Index::codec().decode_strict(doc).unwrap_err();
    assert!(err.is_forward_compatible());
    assert!(err.to_string().contains(tag));
}

// ============================================================================
// Property Types
// ============================================================================

#[test_case("boolean", PropertyTypeVariant::Boolean ; "boolean")]
#[test_case("float32", PropertyTypeVariant::Float32 ; "float32")]
#[test_case("float64", PropertyTypeVariant::Float64 ; "float64")]
#[test_case("int32", PropertyTypeVariant::Int32 ; "int32")]
#[test_case("int64", PropertyTypeVariant::Int64 ; "int64")]
#[test_case("timestamp", PropertyTypeVariant::Timestamp ; "timestamp")]
#[test_case("date", PropertyTypeVariant::Date ; "date")]
#[test_case("json", PropertyTypeVariant::Json ; "json")]
fn test_primitive_property_types(tag: &str, expected: PropertyTypeVariant) {
    let doc = json!({"type": tag, "list": true});

    let property = PropertyType::codec().decode_value(doc.clone()).unwrap().unwrap();
    assert_eq!(property.variant(), expected);
    assert!(expected.is_primitive());
    assert!(property.is_list());
    assert_eq!(property, PropertyType::primitive(expected, true).unwrap());

    // Same payload type, but each variant keeps its own tag
    assert_eq!(
        PropertyType::codec().wire_tag(&property),
        Some(WireTag::from(tag))
    );
    assert_eq!(PropertyType::codec().encode_value(&property).unwrap(), doc);
}

#[test]
fn test_text_and_direct_property_types() {
    let text = json!({"type": "text", "collation": "ucs_basic"});
    let direct = json!({
        "type": "direct",
        "container": {"space": "s", "externalId": "Pump"}
    });

    let decoded = PropertyType::codec().decode_value(text.clone()).unwrap().unwrap();
    assert_eq!(decoded.variant(), PropertyTypeVariant::Text);
    assert!(!decoded.is_list());
    assert_eq!(PropertyType::codec().encode_value(&decoded).unwrap(), text);

    let decoded = PropertyType::codec().decode_value(direct.clone()).unwrap().unwrap();
    let PropertyType::Direct(relation) = &decoded else {
        panic!("expected a direct relation, got {decoded:?}");
    };
    assert_eq!(
        relation.container,
        Some(ContainerReference::new("s", "Pump"))
    );
    assert_eq!(PropertyType::codec().encode_value(&decoded).unwrap(), direct);

    assert_eq!(PropertyType::primitive(PropertyTypeVariant::Text, false), None);
}

// ============================================================================
// Instances
// ============================================================================

fn edge_doc() -> JsonValue {
    json!({
        "instanceType": "edge",
        "space": "s",
        "externalId": "e1",
        "startNode": {"space": "s", "externalId": "a"},
        "endNode": {"space": "s", "externalId": "b"}
    })
}

#[test]
fn test_edge_write_decodes_as_edge() {
    let codec = InstanceCodec::<JsonValue>::new().unwrap();

    let instance = codec.decode_write(edge_doc()).unwrap().unwrap();
    assert_eq!(instance.tag(), InstanceType::Edge);

    let edge = instance.as_edge().unwrap();
    assert_eq!(edge.start_node, InstanceId::new("s", "a"));
    assert_eq!(edge.end_node, InstanceId::new("s", "b"));
    assert_eq!(instance.id(), InstanceId::new("s", "e1"));

    assert_eq!(codec.encode_write(&instance).unwrap(), edge_doc());
}

#[test]
fn test_edge_read_decodes_as_edge() {
    let codec = InstanceCodec::<JsonValue>::new().unwrap();
    let mut doc = edge_doc();
    doc["version"] = json!(3);
    doc["createdTime"] = json!(1_700_000_000_000_i64);
    doc["lastUpdatedTime"] = json!(1_700_000_000_500_i64);

    let instance = codec.decode_read(doc.clone()).unwrap().unwrap();
    let edge = instance.as_edge().unwrap();
    assert_eq!(edge.version, 3);
    assert_eq!(edge.end_node, InstanceId::new("s", "b"));
    assert!(!instance.is_deleted());
    assert_eq!(codec.encode_read(&instance).unwrap(), doc);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pump {
    name: String,
    capacity: f64,
}

#[test]
fn test_node_write_with_typed_properties() {
    let codec = InstanceCodec::<Pump>::new().unwrap();
    let pump = Pump {
        name: "P-101".to_string(),
        capacity: 2.5,
    };
    let node: InstanceWrite<Pump> = NodeWrite::new("plant", "p101")
        .with_source(SourceReference::view("plant", "Pump", "1"), pump.clone())
        .into();

    let encoded = codec.encode_write(&node).unwrap();
    assert_eq!(
        encoded,
        json!({
            "instanceType": "node",
            "space": "plant",
            "externalId": "p101",
            "sources": [{
                "source": {"type": "view", "space": "plant", "externalId": "Pump", "version": "1"},
                "properties": {"name": "P-101", "capacity": 2.5}
            }]
        })
    );

    let decoded = codec.decode_write(encoded).unwrap().unwrap();
    assert_eq!(decoded, node);
    assert_eq!(decoded.as_node().unwrap().sources[0].properties, pump);
}

#[test]
fn test_read_shapes_with_typed_properties() {
    let codec = InstanceCodec::<Pump>::new().unwrap();
    let node = json!({
        "instanceType": "node",
        "space": "plant",
        "externalId": "p101",
        "version": 2,
        "properties": {"name": "P-101", "capacity": 2.5}
    });
    let edge = json!({
        "instanceType": "edge",
        "space": "plant",
        "externalId": "e1",
        "startNode": {"space": "plant", "externalId": "p101"},
        "endNode": {"space": "plant", "externalId": "p102"}
    });

    let instance = codec.decode_read(node).unwrap().unwrap();
    assert_eq!(instance.properties().map(|p| p.capacity), Some(2.5));

    let instance = codec.decode_read(edge).unwrap().unwrap();
    assert_eq!(instance.properties(), None);

    let direct: Node<Pump> = serde_json::from_value(json!({
        "space": "plant",
        "externalId": "p101",
        "properties": null
    }))
    .unwrap();
    assert_eq!(direct.properties, None);
}

#[test]
fn test_explicit_null_properties_round_trip() {
    let codec = InstanceCodec::<JsonValue>::new().unwrap();
    let doc = json!({
        "instanceType": "node",
        "space": "s",
        "externalId": "n1",
        "version": 1,
        "createdTime": 10,
        "lastUpdatedTime": 20,
        "properties": null
    });

    let instance = codec.decode_read(doc.clone()).unwrap().unwrap();
    assert_eq!(instance.properties(), Some(&JsonValue::Null));
    assert_eq!(codec.encode_read(&instance).unwrap(), doc);

    let mut absent = doc;
    absent.as_object_mut().unwrap().remove("properties");
    let instance = codec.decode_read(absent.clone()).unwrap().unwrap();
    assert_eq!(instance.properties(), None);
    assert_eq!(codec.encode_read(&instance).unwrap(), absent);
}

#[test]
fn test_node_read_properties() {
    let codec = InstanceCodec::<JsonValue>::new().unwrap();
    let doc = json!({
        "instanceType": "node",
        "space": "s",
        "externalId": "n1",
        "version": 1,
        "createdTime": 10,
        "lastUpdatedTime": 20,
        "deletedTime": 30,
        "properties": {"s": {"Pump/1": {"name": "P-101"}}}
    });

    let instance = codec.decode_read(doc.clone()).unwrap().unwrap();
    assert!(instance.is_deleted());
    assert_eq!(
        instance.properties().unwrap()["s"]["Pump/1"]["name"],
        json!("P-101")
    );
    assert_eq!(codec.encode_read(&instance).unwrap(), doc);
}

#[test]
fn test_unknown_instance_type_is_no_value() {
    let codec = InstanceCodec::<JsonValue>::new().unwrap();
    let doc = json!({"instanceType": "hyperedge", "space": "s", "externalId": "x"});

    assert_eq!(codec.decode_write(doc.clone()).unwrap(), None);

    let strict = codec.with_options(DecodeOptions::strict());
    assert!(matches!(
        strict.decode_write(doc),
        Err(Error::UnknownVariant { .. })
    ));
}

#[test]
fn test_instances_nest_in_request_bodies() {
    #[derive(Debug, Serialize, Deserialize)]
    struct ApplyRequest {
        items: Vec<InstanceWrite<JsonValue>>,
    }

    let body = json!({"items": [edge_doc(), {"instanceType": "node", "space": "s", "externalId": "n"}]});
    let request: ApplyRequest = serde_json::from_value(body.clone()).unwrap();

    assert_eq!(request.items.len(), 2);
    assert_eq!(request.items[0].tag(), InstanceType::Edge);
    assert_eq!(request.items[1].tag(), InstanceType::Node);
    assert_eq!(serde_json::to_value(&request).unwrap(), body);
}

#[test]
fn test_source_reference_container() {
    let source = SourceReference::container("s", "PumpContainer");
    let encoded = SourceReference::codec().encode_value(&source).unwrap();

    assert_eq!(
        encoded,
        json!({"type": "container", "space": "s", "externalId": "PumpContainer"})
    );
    assert_eq!(SourceReference::codec().decode_strict(encoded).unwrap(), source);
}

// ============================================================================
// Field Resolvers
// ============================================================================

#[test_case(json!({"type": "constant", "value": 42}), FieldResolverType::Constant ; "constant")]
#[test_case(json!({"type": "raw", "dbName": "db", "tableName": "pumps", "columnName": "name"}), FieldResolverType::Raw ; "raw")]
#[test_case(json!({"type": "syntheticTimeSeries", "expression": "ts{id:1} * 2", "isStep": false}), FieldResolverType::SyntheticTimeSeries ; "synthetic time series")]
#[test_case(json!({"type": "view", "externalId": "Pump"}), FieldResolverType::View ; "view")]
#[test_case(json!({"type": "asset", "externalId": "a1"}), FieldResolverType::Asset ; "asset")]
#[test_case(json!({"type": "timeSeries", "externalId": "ts1"}), FieldResolverType::TimeSeries ; "time series")]
#[test_case(json!({"type": "event", "externalId": "ev1"}), FieldResolverType::Event ; "event")]
fn test_field_resolver_round_trip(doc: JsonValue, expected: FieldResolverType) {
    let resolver = FieldResolver::codec().decode_value(doc.clone()).unwrap().unwrap();

    assert_eq!(resolver.resolver_type(), expected);
    assert_eq!(FieldResolver::codec().encode_value(&resolver).unwrap(), doc);
}

#[test]
fn test_reference_resolvers_share_payload_but_not_tag() {
    let asset = FieldResolver::Asset(ReferenceResolver::new("x"));
    let event = FieldResolver::Event(ReferenceResolver::new("x"));

    assert_eq!(asset.external_id(), Some("x"));
    assert_ne!(
        FieldResolver::codec().encode_value(&asset).unwrap(),
        FieldResolver::codec().encode_value(&event).unwrap()
    );
}

#[test]
fn test_view_resolver_with_nested_input() {
    let doc = json!({
        "type": "view",
        "externalId": "Pump",
        "input": {"type": "raw", "dbName": "db", "tableName": "pumps"}
    });

    let resolver = FieldResolver::codec().decode_value(doc.clone()).unwrap().unwrap();
    let FieldResolver::View(view) = &resolver else {
        panic!("expected a view resolver, got {resolver:?}");
    };
    let input = view.input.as_deref().unwrap();
    assert_eq!(input.resolver_type(), FieldResolverType::Raw);

    assert_eq!(FieldResolver::codec().encode_value(&resolver).unwrap(), doc);
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_view_property_without_direction_is_definition() {
    let doc = json!({"type": {"type": "text"}, "nullable": true});

    let property = ViewProperty::codec().decode_value(doc.clone()).unwrap();
    let definition = property.as_definition().unwrap();
    assert_eq!(definition.property_type, Some(PropertyType::text()));
    assert_eq!(definition.nullable, Some(true));

    assert_eq!(ViewProperty::codec().encode_value(&property).unwrap(), doc);
}

#[test_case(json!({"type": {"type": "text"}, "defaultValue": null}) ; "null default")]
#[test_case(json!({"type": {"type": "int64"}, "defaultValue": 0}) ; "zero default")]
#[test_case(json!({"type": {"type": "text"}}) ; "no default")]
fn test_view_property_default_value_round_trip(doc: JsonValue) {
    let property = ViewProperty::codec().decode_value(doc.clone()).unwrap();
    let definition = property.as_definition().unwrap();
    assert_eq!(definition.default_value.as_ref(), doc.get("defaultValue"));

    assert_eq!(ViewProperty::codec().encode_value(&property).unwrap(), doc);
}

#[test]
fn test_view_property_with_direction_is_connection() {
    let doc = json!({
        "direction": "outwards",
        "type": {"space": "cdf_cdm", "externalId": "hasPart"}
    });

    let property = ViewProperty::codec().decode_value(doc.clone()).unwrap();
    assert!(property.is_connection());

    let connection = property.as_connection().unwrap();
    assert_eq!(connection.edge_type, InstanceId::new("cdf_cdm", "hasPart"));
    assert_eq!(connection.direction, Direction::Outwards);

    assert_eq!(ViewProperty::codec().encode_value(&property).unwrap(), doc);
}

#[test]
fn test_view_property_shapes_do_not_overlap() {
    let options = DecodeOptions::default().with_ambiguity(AmbiguityPolicy::Reject);
    let definition = json!({"type": {"type": "int64"}, "nullable": false});
    let connection = json!({"direction": "inwards", "type": {"space": "s", "externalId": "t"}});

    assert!(ViewProperty::codec()
        .decode_value_with(&definition, &options)
        .is_ok());
    assert!(ViewProperty::codec()
        .decode_value_with(&connection, &options)
        .is_ok());
}

#[test]
fn test_view_property_no_match() {
    let err = ViewProperty::codec()
        .decode_value(json!({"nullable": true}))
        .unwrap_err();

    let Error::NoMatchingVariant { family, attempts } = err else {
        panic!("expected NoMatchingVariant, got {err:?}");
    };
    assert_eq!(family, "viewProperty");
    assert!(attempts.contains("ViewPropertyDefinition"));
    assert!(attempts.contains("ConnectionDefinition"));
}

fn view_definition_doc() -> JsonValue {
    json!({
        "space": "s",
        "externalId": "Pump",
        "version": "1",
        "properties": {
            "name": {"type": {"type": "text"}},
            "parts": {"direction": "outwards", "type": {"space": "s", "externalId": "hasPart"}}
        }
    })
}

#[test]
fn test_data_model_view_definition_listed_first() {
    let view = DataModelView::codec()
        .decode_value(view_definition_doc())
        .unwrap();

    let definition = view.as_definition().unwrap();
    assert_eq!(definition.properties.len(), 2);
    assert!(definition.properties["parts"].is_connection());
    assert_eq!(view.reference(), ViewReference::new("s", "Pump", "1"));
}

#[test]
fn test_data_model_view_reference() {
    let doc = json!({"space": "s", "externalId": "Pump", "version": "1"});

    let view = DataModelView::codec().decode_value(doc.clone()).unwrap();
    assert_eq!(view.as_reference(), Some(&ViewReference::new("s", "Pump", "1")));
    assert_eq!(DataModelView::codec().encode_value(&view).unwrap(), doc);
}

#[test]
fn test_data_model_view_definition_is_ambiguous_when_rejecting() {
    let options = DecodeOptions::default().with_ambiguity(AmbiguityPolicy::Reject);

    let err = DataModelView::codec()
        .decode_value_with(&view_definition_doc(), &options)
        .unwrap_err();

    let Error::AmbiguousVariant { candidates, .. } = err else {
        panic!("expected AmbiguousVariant, got {err:?}");
    };
    assert_eq!(candidates, vec!["ViewDefinition", "ViewReference"]);
}

#[test]
fn test_data_model_with_mixed_views() {
    let doc = json!({
        "space": "s",
        "externalId": "Plant",
        "version": "1",
        "views": [
            view_definition_doc(),
            {"space": "s", "externalId": "Valve", "version": "2"}
        ]
    });

    let model: DataModel = serde_json::from_value(doc.clone()).unwrap();
    assert!(model.views[0].as_definition().is_some());
    assert!(model.views[1].as_reference().is_some());
    assert_eq!(serde_json::to_value(&model).unwrap(), doc);
}

#[test]
fn test_view_property_with_unknown_type_stays_a_definition() {
    let doc = json!({
        "type": {"type": "vector", "dimensions": 3},
        "container": {"space": "s", "externalId": "Pump"},
        "containerPropertyIdentifier": "embedding",
        "nullable": true
    });

    let property = ViewProperty::codec().decode_value(doc).unwrap();
    let definition = property.as_definition().unwrap();
    assert_eq!(definition.property_type, None);
    assert_eq!(
        definition.container_property_identifier.as_deref(),
        Some("embedding")
    );
    assert_eq!(definition.nullable, Some(true));

    let encoded = ViewProperty::codec().encode_value(&property).unwrap();
    assert_eq!(encoded["type"], JsonValue::Null);
    assert_eq!(ViewProperty::codec().decode_value(encoded).unwrap(), property);
}

#[test]
fn test_view_property_unknown_type_under_reject() {
    let options = DecodeOptions::default().with_ambiguity(AmbiguityPolicy::Reject);
    let doc = json!({"type": {"type": "vector"}, "nullable": false});

    let property = ViewProperty::codec()
        .decode_value_with(&doc, &options)
        .unwrap();
    assert!(!property.is_connection());
}

#[test_case(json!({"nullable": true}) ; "missing type")]
#[test_case(json!({"type": {"type": 7}}) ; "malformed type tag")]
#[test_case(json!({"type": "text"}) ; "type is not an object")]
fn test_view_property_type_must_be_well_formed(doc: JsonValue) {
    assert!(matches!(
        ViewProperty::codec().decode_value(doc),
        Err(Error::NoMatchingVariant { .. })
    ));
}

// ============================================================================
// Query
// ============================================================================

#[test]
fn test_query_table_expressions() {
    let doc = json!({
        "with": {
            "pumps": {"nodes": {"filter": {"equals": {"property": ["node", "space"], "value": "s"}}}, "limit": 10},
            "parts": {"edges": {"from": "pumps", "direction": "outwards", "maxDistance": 1}}
        },
        "select": {"pumps": {}}
    });

    let query: Query = serde_json::from_value(doc.clone()).unwrap();
    assert_eq!(query.with["pumps"].limit(), Some(10));
    assert!(query.with["pumps"].as_nodes().is_some());

    let parts = query.with["parts"].as_edges().unwrap();
    assert_eq!(parts.edges.max_distance, Some(1));
    assert_eq!(query.with["parts"].chained_from(), Some("pumps"));
    assert!(query.dangling_references().is_empty());

    assert_eq!(serde_json::to_value(&query).unwrap(), doc);
}

#[test]
fn test_query_dangling_reference() {
    let query = Query {
        with: [(
            "parts".to_string(),
            TableExpression::from(EdgeExpression {
                edges: EdgesQuery {
                    from: Some("missing".to_string()),
                    ..EdgesQuery::default()
                },
                ..EdgeExpression::default()
            }),
        )]
        .into_iter()
        .collect(),
        ..Query::default()
    };

    assert_eq!(query.dangling_references(), vec!["missing"]);
}

#[test]
fn test_table_expression_first_listed_wins() {
    let doc = json!({"nodes": {}, "edges": {}});

    let expression = TableExpression::codec().decode_value(doc.clone()).unwrap();
    assert!(expression.as_nodes().is_some());

    let options = DecodeOptions::default().with_ambiguity(AmbiguityPolicy::Reject);
    let err = TableExpression::codec()
        .decode_value_with(&doc, &options)
        .unwrap_err();
    assert!(matches!(err, Error::AmbiguousVariant { .. }));
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_groups_acl_encoding() {
    let capability = Capability::Groups(Acl::new([AclAction::List, AclAction::Read], Scope::all()));

    let encoded = Capability::codec().encode_value(&capability).unwrap();
    assert_eq!(
        encoded,
        json!({"groupsAcl": {"actions": ["LIST", "READ"], "scope": {"all": {}}}})
    );

    // One key, and no discriminator inside the payload
    let map = encoded.as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert!(map["groupsAcl"].get("type").is_none());

    assert_eq!(Capability::codec().decode_strict(encoded).unwrap(), capability);
}

#[test]
fn test_every_capability_round_trips() {
    assert_eq!(CapabilityType::ALL.len(), 20);

    for &capability_type in CapabilityType::ALL {
        let capability = Capability::new(
            capability_type,
            Acl::new([AclAction::Read], Scope::data_sets([1, 2])),
        );
        assert_eq!(capability.capability_type(), capability_type);

        let encoded = Capability::codec().encode_value(&capability).unwrap();
        assert!(encoded.get(capability_type.as_str()).is_some());

        let decoded = Capability::codec().decode_strict(encoded).unwrap();
        assert_eq!(decoded, capability);
        assert!(decoded.acl().allows(AclAction::Read));
    }
}

#[test_case(Scope::all(), json!({"all": {}}) ; "all")]
#[test_case(Scope::current_user(), json!({"currentuserscope": {}}) ; "current user")]
#[test_case(Scope::data_sets([7]), json!({"datasetScope": {"ids": [7]}}) ; "data set")]
#[test_case(Scope::Id(IdScope { ids: vec![1] }), json!({"idScope": {"ids": [1]}}) ; "id")]
#[test_case(Scope::AssetRootId(AssetRootIdScope { root_ids: vec![9] }), json!({"assetRootIdScope": {"rootIds": [9]}}) ; "asset root id")]
#[test_case(Scope::spaces(["s1", "s2"]), json!({"spaceIdScope": {"spaceIds": ["s1", "s2"]}}) ; "space id")]
#[test_case(Scope::ExtractionPipeline(IdScope { ids: vec![3] }), json!({"extractionPipelineScope": {"ids": [3]}}) ; "extraction pipeline")]
fn test_scope_wire_shapes(scope: Scope, expected: JsonValue) {
    assert_eq!(Scope::codec().encode_value(&scope).unwrap(), expected);
    assert_eq!(Scope::codec().decode_strict(expected).unwrap(), scope);
}

#[test]
fn test_table_scope() {
    let doc = json!({"tableScope": {"dbsToTables": {"db": {"tables": ["a", "b"]}}}});

    let scope = Scope::codec().decode_strict(doc.clone()).unwrap();
    let Scope::Table(table) = &scope else {
        panic!("expected a table scope, got {scope:?}");
    };
    assert_eq!(table.dbs_to_tables["db"].tables, vec!["a", "b"]);
    assert_eq!(Scope::codec().encode_value(&scope).unwrap(), doc);
}

#[test]
fn test_group_drops_unknown_capabilities() {
    let doc = json!({
        "id": 1,
        "name": "readers",
        "capabilities": [
            {"assetsAcl": {"actions": ["READ"], "scope": {"all": {}}}},
            {"quantumAcl": {"actions": ["READ"], "scope": {"all": {}}}}
        ]
    });

    let group: Group = serde_json::from_value(doc).unwrap();
    assert_eq!(group.capabilities.len(), 1);
    assert_eq!(group.capabilities_of(CapabilityType::Assets).count(), 1);
    assert_eq!(group.capabilities_of(CapabilityType::Groups).count(), 0);

    let encoded = serde_json::to_value(&group).unwrap();
    assert_eq!(encoded["capabilities"].as_array().unwrap().len(), 1);
}

#[test]
fn test_group_drops_capabilities_with_unknown_scope() {
    let doc = json!({
        "name": "readers",
        "capabilities": [
            {"assetsAcl": {"actions": ["READ"], "scope": {"galaxyScope": {"ids": [1]}}}},
            {"eventsAcl": {"actions": ["READ"], "scope": {"datasetScope": {"ids": [7]}}}}
        ]
    });

    let group: Group = serde_json::from_value(doc).unwrap();
    assert_eq!(group.capabilities.len(), 1);
    assert_eq!(group.capabilities_of(CapabilityType::Assets).count(), 0);
    assert_eq!(group.capabilities_of(CapabilityType::Events).count(), 1);
}

#[test_case(json!({"assetsAcl": {"actions": ["READ"], "scope": {"all": {}, "idScope": {}}}}) ; "two scope keys")]
#[test_case(json!({"assetsAcl": {"actions": ["READ"], "scope": "all"}}) ; "scope is not an object")]
#[test_case(json!({"assetsAcl": {"actions": ["READ"], "scope": {"idScope": {"ids": "x"}}}}) ; "bad scope payload")]
fn test_group_with_malformed_scope_fails(capability: JsonValue) {
    let doc = json!({"name": "readers", "capabilities": [capability]});
    assert!(serde_json::from_value::<Group>(doc).is_err());
}

#[test]
fn test_unknown_scope_inside_known_capability_fails() {
    let doc = json!({"actions": ["READ"], "scope": {"galaxyScope": {}}});

    let err = serde_json::from_value::<Acl>(doc).unwrap_err();
    assert!(err.to_string().contains("galaxyScope"));
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn test_family_names() {
    for family in Family::ALL {
        assert_eq!(Family::from_name(family.name()), Some(family));
        assert_eq!(family.describe().unwrap().family, family.name());
    }

    assert_eq!(Family::from_name("property-type"), Some(Family::PropertyType));
    assert_eq!(Family::from_name("nope"), None);
}

#[test]
fn test_family_decode_reports_variant_and_tag() {
    let doc = json!({"constraintType": "uniqueness", "properties": ["a", "b"]});

    let decoded = Family::Constraint
        .decode(doc.clone(), &DecodeOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(decoded.variant, "UniquenessConstraint");
    assert_eq!(decoded.tag, Some(json!("uniqueness")));
    assert_eq!(decoded.value, doc);
}

#[test]
fn test_family_decode_instances_and_untagged() {
    let decoded = Family::InstanceWrite
        .decode(edge_doc(), &DecodeOptions::default())
        .unwrap()
        .unwrap();
    assert!(decoded.variant.starts_with("EdgeWrite"));
    assert_eq!(decoded.tag, Some(json!("edge")));

    let decoded = Family::ViewProperty
        .decode(json!({"type": {"type": "text"}}), &DecodeOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(decoded.variant, "ViewPropertyDefinition");
    assert_eq!(decoded.tag, None);
}

#[test]
fn test_family_decode_unknown_is_none() {
    let doc = json!({"indexType": "hashmap", "properties": ["x"]});

    assert_eq!(Family::Index.decode(doc, &DecodeOptions::default()).unwrap(), None);
}

#[test]
fn test_family_peek_tag() {
    let doc = json!({"groupsAcl": {"actions": [], "scope": {"all": {}}}});

    assert_eq!(
        Family::Capability.peek_tag(&doc).unwrap(),
        Some(WireTag::from("groupsAcl"))
    );
    assert_eq!(Family::ViewProperty.peek_tag(&doc).unwrap(), None);
    assert!(!Family::ViewProperty.is_tagged());
    assert!(Family::Constraint.peek_tag(&doc).is_err());
}

#[test]
fn test_describe_capabilities() {
    let description = Family::Capability.describe().unwrap();

    assert_eq!(description.envelope, "single-key wrapper");
    assert_eq!(description.variants.len(), 20);
    assert_eq!(description.variants[0].tag, Some(WireTag::from("groupsAcl")));
}
