use serde_json::Value;

use crate::disclosure::Disclosure;
use crate::error::ResolveError;
use crate::graph::DisclosureGraph;
use crate::unpack::unpack_claims;

/// Resolve the disclosures that must accompany a presentation for every
/// claim path the frame marks `true`.
///
/// `claims` is the credential's claim tree as issued, digests still in
/// place; `frame` mirrors its shape with boolean leaves. The returned list
/// is dependency complete: each disclosure is preceded or followed by its
/// whole ancestor chain, in first-required order.
pub fn required_disclosures<'a>(
    claims: &Value,
    frame: &Value,
    disclosures: &'a [Disclosure],
) -> Result<Vec<&'a Disclosure>, ResolveError> {
    let graph = DisclosureGraph::build(disclosures)?;
    let unpacked = unpack_claims(claims, &graph);

    let mut required: Vec<String> = Vec::new();
    let mut path = Vec::new();
    collect_frame_requests(frame, &unpacked, &mut path, &mut required)?;

    // A nested disclosure is unusable without the disclosures that establish
    // its position in the tree, so close the set over ancestor chains. The
    // chains are pre-flattened: entries appended here add nothing new of
    // their own.
    let mut resolved = Vec::with_capacity(required.len());
    let mut index = 0;
    while index < required.len() {
        let digest = required[index].clone();
        let entry = graph
            .get(&digest)
            .ok_or(ResolveError::DisclosureNotFound(digest))?;

        resolved.push(entry.disclosure);
        for ancestor in &entry.ancestors {
            if !required.iter().any(|required| required == &ancestor.digest) {
                required.push(ancestor.digest.clone());
            }
        }

        index += 1;
    }

    Ok(resolved)
}

enum PathSegment<'f> {
    Key(&'f str),
    Index(usize),
}

fn collect_frame_requests<'f>(
    frame: &'f Value,
    unpacked: &Value,
    path: &mut Vec<PathSegment<'f>>,
    required: &mut Vec<String>,
) -> Result<(), ResolveError> {
    match frame {
        Value::Object(object) => {
            for (key, child) in object {
                path.push(PathSegment::Key(key));
                collect_frame_requests(child, unpacked, path, required)?;
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                collect_frame_requests(child, unpacked, path, required)?;
                path.pop();
            }
        }
        // Only an exact `true` leaf requests disclosure
        Value::Bool(true) => resolve_request(unpacked, path, required)?,
        _ => {}
    }

    Ok(())
}

fn resolve_request(
    unpacked: &Value,
    path: &[PathSegment],
    required: &mut Vec<String>,
) -> Result<(), ResolveError> {
    // The frame may split finer than the claim model does: back off one
    // segment at a time until the nearest enclosing disclosed node is found.
    for length in (1..=path.len()).rev() {
        if let Some(value) = lookup(unpacked, &path[..length]) {
            collect_digests(value, required);
            return Ok(());
        }
    }

    if path.is_empty() {
        // `true` for the whole frame selects the whole tree
        collect_digests(unpacked, required);
        return Ok(());
    }

    Err(ResolveError::FrameMismatch(frame_path_string(path)))
}

fn lookup<'v>(tree: &'v Value, path: &[PathSegment]) -> Option<&'v Value> {
    let mut current = tree;

    for segment in path {
        current = match segment {
            PathSegment::Key(key) => current.as_object()?.get(*key)?,
            PathSegment::Index(index) => current.as_array()?.get(*index)?,
        };
    }

    Some(current)
}

/// Every string leaf below a disclosed node is a digest governing part of
/// its substructure.
fn collect_digests(value: &Value, required: &mut Vec<String>) {
    match value {
        Value::String(digest) => {
            if !required.iter().any(|required| required == digest) {
                required.push(digest.clone());
            }
        }
        Value::Object(object) => {
            for child in object.values() {
                collect_digests(child, required);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_digests(item, required);
            }
        }
        _ => {}
    }
}

fn frame_path_string(path: &[PathSegment]) -> String {
    let segments: Vec<String> = path
        .iter()
        .map(|segment| match segment {
            PathSegment::Key(key) => (*key).to_owned(),
            PathSegment::Index(index) => index.to_string(),
        })
        .collect();

    segments.join("/")
}
