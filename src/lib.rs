mod digest;
mod disclosure;
mod error;
mod graph;
mod resolve;
mod unpack;

pub use digest::{hash_encoded_disclosure, SdAlg};
pub use disclosure::{Disclosure, DisclosureKind};
pub use error::{DecodeError, ResolveError};
pub use graph::{DisclosureGraph, GraphEntry};
pub use resolve::required_disclosures;
pub use unpack::unpack_claims;

const SD_CLAIM_NAME: &str = "_sd";
const ARRAY_CLAIM_ITEM_PROPERTY_NAME: &str = "...";

/// Key under which an unpacked object disclosure carries its own digest.
/// Only ever inserted after the object's disclosed claims, so a claim that
/// happens to use the same name is overwritten by the genuine digest.
const DIGEST_TAG_PROPERTY_NAME: &str = "__digest";
