#![allow(dead_code)]

use chrono::NaiveDate;
use haiti_dash::models::Record;
use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The three-record set used by the worked scenarios.
pub fn scenario_records() -> Vec<Record> {
    vec![
        Record::new()
            .with_sector("WASH")
            .with_department_code("A")
            .with_observed_on(day(2023, 1, 5)),
        Record::new()
            .with_sector("WASH")
            .with_department_code("B")
            .with_observed_on(day(2023, 2, 1)),
        Record::new()
            .with_sector("Health")
            .with_department_code("A")
            .with_observed_on(day(2023, 1, 10)),
    ]
}

/// Operational-presence extract in the source's CSV layout.
pub const PRESENCE_CSV: &str = "\
Organisation,Secteur,adm1code,Typedorganisation,date
MSF,WASH,HT01,ONG Internationale,2023-01-05
UNICEF,WASH,HT03,Agence UN,2023-02-01
MSPP,Santé,HT01,Gouvernement,2023-01-10
Croix-Rouge,Santé,,ONG Nationale,
PAM,Sécurité alimentaire,HT05,Agence UN,2023-03-15 09:00:00
";
