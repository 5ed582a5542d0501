//! Product code generation: `PRD-YYMMDD-NNNN` or `PRD-YYMMDD-{prefix}-NNNN`.
//!
//! Codes are bucketed by the UTC date of creation. The counter continues from the
//! highest trailing number among existing codes containing the bucket's initial
//! part, so numbering survives deletions without reusing the top value.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

/// Inserts retried after a duplicate-code collision before giving up
pub const MAX_CODE_ATTEMPTS: usize = 5;

const CODE_PREFIX: &str = "PRD";

/// Source of "today" for code bucketing
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Initial part of every code in a bucket, trailing dash included
pub fn bucket_key(date: NaiveDate, prefix: Option<&str>) -> String {
    let day = date.format("%y%m%d");
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}-{}-{}-", CODE_PREFIX, day, prefix),
        None => format!("{}-{}-", CODE_PREFIX, day),
    }
}

/// Builds bucket keys from an injected clock
#[derive(Clone)]
pub struct CodeGenerator {
    clock: Arc<dyn Clock>,
}

impl CodeGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Initial part of codes created today
    pub fn initial(&self, prefix: Option<&str>) -> String {
        bucket_key(self.clock.today(), prefix)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Trailing ASCII digit run of a code; 0 if there is none or it overflows
pub fn trailing_counter(code: &str) -> u64 {
    let digits = code.len()
        - code
            .bytes()
            .rev()
            .take_while(u8::is_ascii_digit)
            .count();
    code[digits..].parse().unwrap_or(0)
}

/// Next code in the bucket given the codes that currently contain `initial`
pub fn next_in_bucket<S: AsRef<str>>(initial: &str, existing: &[S]) -> String {
    let highest = existing
        .iter()
        .map(|code| trailing_counter(code.as_ref()))
        .max()
        .unwrap_or(0);
    format!("{}{:04}", initial, highest.saturating_add(1))
}
