//! Built-in rules, grouped by category.
//!
//! Registration order below is the order the engine runs rules in for a given
//! resource kind; it is part of the stable contract.

use crate::rule::FnRule;

mod audit;
mod encryption;
mod identity;
mod network;
mod resilience;
pub mod secrets;
pub(crate) mod utils;


pub fn builtin_rules() -> Vec<FnRule> {
    let mut rules = Vec::new();
    rules.extend(encryption::rules());
    rules.extend(network::rules());
    rules.extend(identity::rules());
    rules.extend(audit::rules());
    rules.extend(resilience::rules());
    rules
}
