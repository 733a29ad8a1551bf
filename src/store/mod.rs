pub mod backend;
pub mod ledger;
pub mod usage;
