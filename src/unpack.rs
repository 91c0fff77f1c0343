use serde_json::{Map, Value};

use crate::graph::DisclosureGraph;
use crate::{ARRAY_CLAIM_ITEM_PROPERTY_NAME, DIGEST_TAG_PROPERTY_NAME, SD_CLAIM_NAME};

/// Rebuild a claim tree with its digest placeholders resolved against
/// `graph`.
///
/// The result has the shape a disclosure frame navigates: every position a
/// disclosure governs holds either the bare digest string or the unpacked
/// substructure tagged with its digest. Plain scalars are dropped, and
/// array slots that resolve to nothing become `null` so that indices stay
/// aligned with the frame.
pub fn unpack_claims(claims: &Value, graph: &DisclosureGraph) -> Value {
    match claims {
        Value::Object(object) => Value::Object(unpack_object_claims(object, graph)),
        Value::Array(items) => Value::Array(unpack_array_claims(items, graph)),
        _ => Value::Object(Map::new()),
    }
}

fn unpack_object_claims(object: &Map<String, Value>, graph: &DisclosureGraph) -> Map<String, Value> {
    let mut claims = Map::new();

    for (key, value) in object {
        if key == SD_CLAIM_NAME || key == ARRAY_CLAIM_ITEM_PROPERTY_NAME {
            continue;
        }

        // Only containers can hold further disclosures
        match value {
            Value::Object(child) => {
                let child = unpack_object_claims(child, graph);
                if !child.is_empty() {
                    claims.insert(key.clone(), Value::Object(child));
                }
            }
            Value::Array(items) => {
                let items = unpack_array_claims(items, graph);
                if !items.is_empty() {
                    claims.insert(key.clone(), Value::Array(items));
                }
            }
            _ => {}
        }
    }

    if let Some(digests) = object.get(SD_CLAIM_NAME).and_then(Value::as_array) {
        for digest in digests {
            let digest = match digest.as_str() {
                Some(digest) => digest,
                None => continue,
            };
            let entry = match graph.get(digest) {
                Some(entry) => entry,
                None => continue,
            };
            // An array element disclosure has no property name to attach
            let name = match entry.disclosure.claim_name() {
                Some(name) => name,
                None => continue,
            };

            claims.insert(
                name.to_owned(),
                unpack_property_value(digest, entry.disclosure.claim_value(), graph),
            );
        }
    }

    claims
}

fn unpack_array_claims(items: &[Value], graph: &DisclosureGraph) -> Vec<Value> {
    let mut unpacked_array = Vec::with_capacity(items.len());

    for item in items {
        let slot = match item {
            Value::Object(object) => match array_item_digest(object) {
                Some(digest) => match graph.get(digest) {
                    Some(entry) => {
                        unpack_array_item(digest, entry.disclosure.claim_value(), graph)
                    }
                    // Keep the digest in place: the slot stays addressable
                    // and a frame selecting it surfaces DisclosureNotFound
                    // instead of shifting every later index.
                    None => Value::String(digest.to_owned()),
                },
                None => {
                    let claims = unpack_object_claims(object, graph);
                    if claims.is_empty() {
                        Value::Null
                    } else {
                        Value::Object(claims)
                    }
                }
            },
            Value::Array(nested) => {
                let nested = unpack_array_claims(nested, graph);
                if nested.is_empty() {
                    Value::Null
                } else {
                    Value::Array(nested)
                }
            }
            _ => Value::Null,
        };

        unpacked_array.push(slot);
    }

    unpacked_array
}

/// Resolved value for a digest found in an _sd array.
fn unpack_property_value(digest: &str, value: &Value, graph: &DisclosureGraph) -> Value {
    match value {
        Value::Object(object) => tag_or_bare(digest, unpack_object_claims(object, graph)),
        Value::Array(items) => Value::Array(unpack_array_claims(items, graph)),
        _ => Value::String(digest.to_owned()),
    }
}

/// Resolved value for a digest found in a "..." marker.
fn unpack_array_item(digest: &str, value: &Value, graph: &DisclosureGraph) -> Value {
    match value {
        Value::Object(object) => tag_or_bare(digest, unpack_object_claims(object, graph)),
        Value::Array(items) => {
            let items = unpack_array_claims(items, graph);
            // No nested disclosure anywhere inside: the one digest governs
            // the whole value
            if items.iter().all(Value::is_null) {
                Value::String(digest.to_owned())
            } else {
                Value::Array(items)
            }
        }
        _ => Value::String(digest.to_owned()),
    }
}

fn tag_or_bare(digest: &str, mut claims: Map<String, Value>) -> Value {
    if claims.is_empty() {
        Value::String(digest.to_owned())
    } else {
        claims.insert(
            DIGEST_TAG_PROPERTY_NAME.to_owned(),
            Value::String(digest.to_owned()),
        );
        Value::Object(claims)
    }
}

fn array_item_digest(object: &Map<String, Value>) -> Option<&str> {
    if object.len() != 1 {
        return None;
    }

    object.get(ARRAY_CLAIM_ITEM_PROPERTY_NAME)?.as_str()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::disclosure::{Disclosure, DisclosureKind};

    fn property(digest: &str, name: &str, value: Value) -> Disclosure {
        Disclosure::from_parts(
            "encoded",
            "salt",
            DisclosureKind::Property {
                name: name.to_owned(),
                value,
            },
            digest,
        )
    }

    fn array_item(digest: &str, value: Value) -> Disclosure {
        Disclosure::from_parts("encoded", "salt", DisclosureKind::ArrayItem(value), digest)
    }

    #[test]
    fn nested_object_disclosures_are_tagged_with_their_digest() {
        let disclosures = vec![
            property("outer-digest", "outer", json!({ "_sd": ["inner-digest"] })),
            property("inner-digest", "inner", json!("scalar")),
        ];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(&json!({ "_sd": ["outer-digest"] }), &graph);

        assert_eq!(
            unpacked,
            json!({
                "outer": {
                    "inner": "inner-digest",
                    "__digest": "outer-digest",
                },
            })
        );
    }

    #[test]
    fn object_disclosure_without_nested_disclosures_stays_bare() {
        let disclosures = vec![property(
            "address-digest",
            "address",
            json!({ "street": "123 Main St", "locality": "Anytown" }),
        )];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(&json!({ "_sd": ["address-digest"] }), &graph);

        assert_eq!(unpacked, json!({ "address": "address-digest" }));
    }

    #[test]
    fn array_slots_without_disclosures_stay_null() {
        let disclosures = vec![array_item("element-digest", json!("DE"))];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(
            &json!({ "nationalities": [10, { "...": "element-digest" }, "US"] }),
            &graph,
        );

        assert_eq!(
            unpacked,
            json!({ "nationalities": [null, "element-digest", null] })
        );
    }

    #[test]
    fn marker_resolving_to_digest_free_array_collapses() {
        let disclosures = vec![array_item("list-digest", json!(["one", "two"]))];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(&json!([{ "...": "list-digest" }]), &graph);

        assert_eq!(unpacked, json!(["list-digest"]));
    }

    #[test]
    fn marker_resolving_to_array_with_disclosures_stays_an_array() {
        let disclosures = vec![
            array_item("list-digest", json!(["one", { "...": "element-digest" }])),
            array_item("element-digest", json!("two")),
        ];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(&json!([{ "...": "list-digest" }]), &graph);

        assert_eq!(unpacked, json!([[null, "element-digest"]]));
    }

    #[test]
    fn unresolvable_marker_keeps_the_bare_digest() {
        let graph = DisclosureGraph::build(&[]).unwrap();

        let unpacked = unpack_claims(&json!({ "items": [{ "...": "unknown" }, 10] }), &graph);

        assert_eq!(unpacked, json!({ "items": ["unknown", null] }));
    }

    #[test]
    fn plain_structure_is_kept_only_while_it_leads_to_disclosures() {
        let disclosures = vec![property("leaf-digest", "leaf", json!("value"))];
        let graph = DisclosureGraph::build(&disclosures).unwrap();

        let unpacked = unpack_claims(
            &json!({
                "keep": { "down": { "_sd": ["leaf-digest"] } },
                "drop": { "down": { "scalar": 10 } },
            }),
            &graph,
        );

        assert_eq!(unpacked, json!({ "keep": { "down": { "leaf": "leaf-digest" } } }));
    }

    #[test]
    fn unpacking_is_idempotent_in_shape() {
        let disclosures = vec![
            property("outer-digest", "outer", json!({ "_sd": ["inner-digest"] })),
            property("inner-digest", "inner", json!(["x", { "...": "missing" }])),
        ];
        let graph = DisclosureGraph::build(&disclosures).unwrap();
        let claims = json!({ "_sd": ["outer-digest"], "plain": { "a": 1 } });

        assert_eq!(unpack_claims(&claims, &graph), unpack_claims(&claims, &graph));
    }
}
