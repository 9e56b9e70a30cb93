//! Materialized scene output: the arena tree, coordinate mapping, per-type
//! payload dispatch, and the traversal that drives them.

pub mod builder;
pub mod dispatch;
pub mod node;
pub mod placement;
