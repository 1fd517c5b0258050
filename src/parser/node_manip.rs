use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::{ParsedProxy, Proxy};

/// Prefix given to proxies whose source carried no name.
pub const DEFAULT_NAME_PREFIX: &str = "defaultName";

/// Makes proxy names unique across a batch
///
/// Two passes over the batch in source order:
/// 1. count how often each user-supplied name occurs;
/// 2. rename. Proxies that only carry the protocol placeholder become
///    `defaultName_<n>` with one counter for the whole batch. A user-supplied
///    name that occurs more than once gets `_<k>` appended to every
///    occurrence (1-indexed); a name that occurs once is left alone.
///
/// Generated names skip any candidate that is already taken, so the output
/// never contains duplicates and running the pass again changes nothing.
pub fn dedupe_names(parsed: Vec<ParsedProxy>) -> Vec<Proxy> {
    // Pass 1
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in &parsed {
        if let Some(name) = &item.original_name {
            *counts.entry(name.clone()).or_insert(0) += 1;
        }
    }
    let mut taken: HashSet<String> = counts
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(name, _)| name.clone())
        .collect();

    // Pass 2
    let mut default_counter = 0usize;
    let mut occurrence: HashMap<String, usize> = HashMap::new();
    let mut proxies = Vec::with_capacity(parsed.len());

    for ParsedProxy {
        mut proxy,
        original_name,
    } in parsed
    {
        let name = match original_name {
            None => loop {
                default_counter += 1;
                let candidate = format!("{}_{}", DEFAULT_NAME_PREFIX, default_counter);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
            },
            Some(name) if counts.get(&name).copied().unwrap_or(0) <= 1 => name,
            Some(name) => {
                let index = occurrence.entry(name.clone()).or_insert(0);
                loop {
                    *index += 1;
                    let candidate = format!("{}_{}", name, index);
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                }
            }
        };

        if name != proxy.name {
            debug!("Renamed proxy {} to {}", proxy.name, name);
        }
        proxy.name = name;
        proxies.push(proxy);
    }

    proxies
}
