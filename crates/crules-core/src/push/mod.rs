//! Push Engine: publish working-tree rule changes through the mirror
//!
//! Local changes are computed against the refreshed mirror, written into it,
//! committed and pushed. A remote that is ahead is integrated once with a
//! rebase; a conflict during that rebase is left for the user to resolve.

mod engine;

pub use engine::{AcceptAll, PushEngine, PushOptions, PushOutcome, PushReport, PushReviewer};
