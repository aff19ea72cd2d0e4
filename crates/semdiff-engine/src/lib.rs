#![forbid(unsafe_code)]

pub mod collaborators;
pub mod comparator;
pub mod coupling;
pub mod escalation;
pub mod options;
pub mod pipeline;
pub mod result;
pub mod tools;

pub use comparator::{Comparator, CompareOptions};
pub use coupling::{Coupling, CouplingSet};
pub use options::Options;
pub use result::{DiffResult, ResultKind};
