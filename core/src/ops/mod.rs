//! Combinator library
//!
//! Everything here composes tools without knowing what they compute:
//! wrapping external functions and values, extracting keys, chaining,
//! folding, fanning out, and reshaping data between map and sequence
//! forms. Error policy is uniform propagation; the only softening lives
//! in [`Extract`]'s missing-key policy and the `Null`-for-absent rule of
//! [`Gather`]/[`Pluck`].

mod chain;
mod extract;
mod fanout;
mod reshape;
mod wrap;

pub use chain::{Chain, Compose, ComposeArg, ComposeFn, Fold, FoldOp};
pub use extract::{Extract, Key, MissingKey};
pub use fanout::{Fanout, Unpack};
pub use reshape::{Gather, MergeMaps, MergeSeqs, Pluck, Spread};
pub use wrap::{Lambda, Variable, Wrapper};
