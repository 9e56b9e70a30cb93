//! Packaging collaborator: the abstract sink that turns persisted bytes
//! into referenceable handles and canvas subtrees into reusable templates.

pub mod sink;
