/// Errors decoding a disclosure from its wire form
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// A disclosure is malformed
    #[error("A disclosure is malformed")]
    DisclosureMalformed,

    /// Unknown value of _sd_alg
    #[error("Unknown value of _sd_alg {0}")]
    UnknownSdAlg(String),

    /// Bubbled up error from serde_json
    #[error(transparent)]
    JsonDeserialization(#[from] serde_json::Error),
}

/// Errors in the required-disclosure resolution pathway
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// A required digest has no matching disclosure
    #[error("No disclosure found for digest {0}")]
    DisclosureNotFound(String),

    /// A disclosure frame path matched no disclosed claim
    #[error("Disclosure frame path {0} matched no disclosed claim")]
    FrameMismatch(String),

    /// The digest reference graph contains a cycle
    #[error("Disclosure digest {0} is part of a reference cycle")]
    CycleDetected(String),

    /// A digest is referenced by more than one containing disclosure
    #[error("Disclosure digest {0} is referenced by more than one parent")]
    AmbiguousParent(String),

    /// Multiple disclosures given with the same digest
    #[error("Multiple disclosures given with the same digest {0}")]
    DuplicateDigest(String),
}
