//! Classification of failed pushes and pulls from git's output

/// Why a push was rejected by the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushRejection {
    /// The current branch has no upstream configured
    MissingUpstream,
    /// The remote has commits the local branch lacks
    NonFastForward,
    /// Anything else: authentication, network, hooks
    Other,
}

const MISSING_UPSTREAM_MARKERS: &[&str] = &[
    "no upstream branch",
    "set the remote as upstream",
    "have no upstream",
];

const NON_FAST_FORWARD_MARKERS: &[&str] = &[
    "non-fast-forward",
    "Updates were rejected",
    "tip of your current branch is behind",
];

/// Classify the combined output of a failed push.
pub fn classify_push_failure(output: &str) -> PushRejection {
    if MISSING_UPSTREAM_MARKERS.iter().any(|m| output.contains(m)) {
        PushRejection::MissingUpstream
    } else if NON_FAST_FORWARD_MARKERS.iter().any(|m| output.contains(m)) {
        PushRejection::NonFastForward
    } else {
        PushRejection::Other
    }
}

/// Whether the output of a failed `pull --rebase` reports a content conflict.
pub fn is_merge_conflict(output: &str) -> bool {
    output.contains("CONFLICT") || output.contains("conflict")
}
