//! Validation stages that reconcile specification facts against code facts.

mod contract;
mod modules;
mod runner;
mod signatures;

pub use contract::{normalize_path, validate_contracts, ContractReport};
pub use modules::{reconcile_modules, ModuleReport};
pub use runner::{InspectOptions, Inspector};
pub use signatures::{compare_signatures, types_match, validate_signatures, SignatureReport};
