//! Dependencies between stages
//!
//! Stages are linked only through the dependency store: a stage records the
//! scheduler id of each submission under a [JobKey](crate::unit::JobKey), and a
//! later stage looks the same key up, keeps the ids the scheduler still knows
//! about, and turns them into a dependency directive in its job script.

/// Persisted map from job key to scheduler job ids
pub mod store;
/// Drop recorded ids that are no longer pending or running
pub mod liveness;
