//! Version upgrades for saved sessions.
//!
//! Each step rewrites the raw JSON of one layout into the next. Revival runs
//! every step newer than the file's version, so readers only ever see the
//! current layout.
//!
//! | version | layout |
//! |---|---|
//! | ≤ 6 | `empConfig`, flat `extras` record, `dtInISO`/`dtOutISO` |
//! | 7 | `extras` keyed by month with an optional `__default` entry |
//! | 8 | `employeeConfig`, `defaultExtras`, `timeInISO`/`timeOutISO` |

use serde_json::{Map, Value};
use tracing::debug;

/// Version assumed for files that carry none.
pub(crate) const UNVERSIONED: u64 = 5;

const LEGACY_DEFAULT_KEY: &str = "__default";
const EXTRAS_FIELDS: [&str; 4] = ["travel", "tips", "bonus", "advance"];

type Step = fn(&mut Map<String, Value>);

/// Upgrade steps in order, each tagged with the version it produces.
const STEPS: [(u64, Step); 2] = [(7, extras_by_month), (8, canonical_names)];

/// Rewrites a session object from `from` to the newest layout.
pub(crate) fn upgrade(root: &mut Map<String, Value>, from: u64) {
    for (target, step) in STEPS {
        if from < target {
            debug!(from, to = target, "Upgrading session layout");
            step(root);
        }
    }
}

fn configs_mut<'a>(root: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    root.get_mut(key).and_then(Value::as_object_mut)
}

/// A flat extras record becomes the `__default` entry of a month map.
fn extras_by_month(root: &mut Map<String, Value>) {
    let Some(configs) = configs_mut(root, "empConfig") else {
        return;
    };
    for config in configs.values_mut().filter_map(Value::as_object_mut) {
        let Some(extras) = config.get("extras").and_then(Value::as_object) else {
            continue;
        };
        let is_flat = extras.keys().any(|k| EXTRAS_FIELDS.contains(&k.as_str()));
        if is_flat {
            let flat = Value::Object(extras.clone());
            let mut by_month = Map::new();
            by_month.insert(LEGACY_DEFAULT_KEY.to_string(), flat);
            config.insert("extras".to_string(), Value::Object(by_month));
        }
    }
}

fn rename(object: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = object.remove(from) {
        object.entry(to.to_string()).or_insert(value);
    }
}

/// Current field names, and `__default` lifted out of the month map.
fn canonical_names(root: &mut Map<String, Value>) {
    rename(root, "empConfig", "employeeConfig");

    if let Some(configs) = configs_mut(root, "employeeConfig") {
        for config in configs.values_mut().filter_map(Value::as_object_mut) {
            let legacy_default = config
                .get_mut("extras")
                .and_then(Value::as_object_mut)
                .and_then(|extras| extras.remove(LEGACY_DEFAULT_KEY));
            if let Some(default) = legacy_default {
                config.entry("defaultExtras".to_string()).or_insert(default);
            }
        }
    }

    if let Some(punches) = root.get_mut("punches").and_then(Value::as_array_mut) {
        for punch in punches.iter_mut().filter_map(Value::as_object_mut) {
            rename(punch, "dtInISO", "timeInISO");
            rename(punch, "dtOutISO", "timeOutISO");
        }
    }
}
