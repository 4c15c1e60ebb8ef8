//! Account endpoints: the caller's own account, public lookups, search and updates

pub mod lookup;
pub mod me;
pub mod search;
pub mod update;
