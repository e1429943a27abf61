//! Contract-call descriptors for incentive actions
//!
//! Builders produce one option per distinct token; when a request lists a
//! token more than once, its first entry is used.

mod approval;
mod vault;

pub use approval::*;
pub use vault::*;

use market_types::{Address, TokenId};
use std::collections::HashSet;

/// Address text used in option ids, as written in the token id
pub(crate) fn id_address(token_id: &TokenId, address: &Address) -> String {
    token_id.address_part().map_or_else(|| address.to_string(), str::to_string)
}

/// First item for each token, in input order
pub(crate) fn first_per_token<'a, T>(items: &'a [T], token_id: impl Fn(&T) -> &TokenId) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    items.iter().filter(|item| seen.insert(token_id(item).clone())).collect()
}
