use std::collections::BTreeMap;

use crate::disclosure::Disclosure;
use crate::error::ResolveError;
use crate::{ARRAY_CLAIM_ITEM_PROPERTY_NAME, SD_CLAIM_NAME};

/// A disclosure together with the chain of disclosures whose revealed
/// values contain its digest, nearest container first.
#[derive(Debug)]
pub struct GraphEntry<'a> {
    pub disclosure: &'a Disclosure,

    /// Every disclosure here must accompany `disclosure` when it is
    /// revealed, or the digest has no position in the reconstructed tree.
    pub ancestors: Vec<&'a Disclosure>,
}

/// Digest-keyed dependency map over a set of disclosures.
#[derive(Debug)]
pub struct DisclosureGraph<'a> {
    entries: BTreeMap<&'a str, GraphEntry<'a>>,
}

impl<'a> DisclosureGraph<'a> {
    /// Index `disclosures` by digest and compute each one's ancestor chain.
    pub fn build(disclosures: &'a [Disclosure]) -> Result<Self, ResolveError> {
        let mut parents: BTreeMap<&'a str, &'a Disclosure> = BTreeMap::new();

        for disclosure in disclosures {
            record_child_digests(disclosure.claim_value(), disclosure, &mut parents)?;
        }

        let mut entries = BTreeMap::new();
        for disclosure in disclosures {
            let ancestors = ancestor_chain(disclosure, &parents)?;
            let prev = entries.insert(
                disclosure.digest.as_str(),
                GraphEntry {
                    disclosure,
                    ancestors,
                },
            );

            if prev.is_some() {
                return Err(ResolveError::DuplicateDigest(disclosure.digest.clone()));
            }
        }

        Ok(DisclosureGraph { entries })
    }

    pub fn get(&self, digest: &str) -> Option<&GraphEntry<'a>> {
        self.entries.get(digest)
    }
}

/// Record `disclosure` as the parent of every digest its revealed value
/// references through an _sd array or a "..." marker.
fn record_child_digests<'a>(
    value: &'a serde_json::Value,
    disclosure: &'a Disclosure,
    parents: &mut BTreeMap<&'a str, &'a Disclosure>,
) -> Result<(), ResolveError> {
    match value {
        serde_json::Value::Object(object) => {
            for (key, child) in object {
                if key == SD_CLAIM_NAME {
                    for digest in child.as_array().into_iter().flatten() {
                        if let Some(digest) = digest.as_str() {
                            record_parent(digest, disclosure, parents)?;
                        }
                    }
                } else if key == ARRAY_CLAIM_ITEM_PROPERTY_NAME {
                    if let Some(digest) = child.as_str() {
                        record_parent(digest, disclosure, parents)?;
                    }
                } else {
                    record_child_digests(child, disclosure, parents)?;
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                record_child_digests(item, disclosure, parents)?;
            }
        }
        _ => {}
    }

    Ok(())
}

fn record_parent<'a>(
    digest: &'a str,
    disclosure: &'a Disclosure,
    parents: &mut BTreeMap<&'a str, &'a Disclosure>,
) -> Result<(), ResolveError> {
    if let Some(previous) = parents.insert(digest, disclosure) {
        if previous.digest != disclosure.digest {
            return Err(ResolveError::AmbiguousParent(digest.to_owned()));
        }
    }

    Ok(())
}

fn ancestor_chain<'a>(
    disclosure: &'a Disclosure,
    parents: &BTreeMap<&'a str, &'a Disclosure>,
) -> Result<Vec<&'a Disclosure>, ResolveError> {
    let mut chain = Vec::new();
    let mut seen = vec![disclosure.digest.as_str()];
    let mut current = disclosure;

    while let Some(&parent) = parents.get(current.digest.as_str()) {
        if seen.contains(&parent.digest.as_str()) {
            return Err(ResolveError::CycleDetected(parent.digest.clone()));
        }

        seen.push(parent.digest.as_str());
        chain.push(parent);
        current = parent;
    }

    Ok(chain)
}
