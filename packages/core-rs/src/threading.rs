use std::env;

const THREAD_ENV: &str = "NUMRS_CPU_THREADS";
const DISABLE_ENV: &str = "NUMRS_DISABLE_PARALLEL";
const MIN_UNITS_ENV: &str = "NUMRS_PARALLEL_MIN_UNITS";

const DEFAULT_MIN_UNITS: usize = 2;

/// Knobs for the data-parallel scheduler.
///
/// `min_units` is the smallest number of independent units of work (rows or
/// columns) worth dispatching to the pool; shorter ranges run inline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub threads: Option<usize>,
    pub parallel_disabled: bool,
    pub min_units: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            threads: None,
            parallel_disabled: false,
            min_units: DEFAULT_MIN_UNITS,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            threads: parse_threads(lookup(THREAD_ENV)),
            parallel_disabled: parse_flag(lookup(DISABLE_ENV)),
            min_units: parse_min_units(lookup(MIN_UNITS_ENV)),
        }
    }

    pub fn sequential() -> Self {
        Self {
            parallel_disabled: true,
            ..Self::default()
        }
    }

    pub fn should_parallelize(&self, units: usize) -> bool {
        !self.parallel_disabled && units >= self.min_units.max(2)
    }
}

fn parse_threads(raw: Option<String>) -> Option<usize> {
    match raw {
        Some(value) => match value.trim() {
            "" => None,
            raw => match raw.parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!(
                        var = THREAD_ENV,
                        value = raw,
                        "ignoring unparsable thread count"
                    );
                    None
                }
            },
        },
        None => None,
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.map(|raw| raw.trim().to_ascii_lowercase()),
        Some(ref value) if value == "1" || value == "true" || value == "yes"
    )
}

fn parse_min_units(raw: Option<String>) -> usize {
    raw.and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(DEFAULT_MIN_UNITS)
}
