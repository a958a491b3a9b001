use serde::{Deserialize, Serialize};
use single_utilities::traits::FloatOps;
use std::fmt;

pub mod correction;
pub mod inference;

pub mod utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestType {
    Student, // Equal variance
    Welch,   // Unequal variance
}

/// Sign of a test statistic comparing the first level against the second.
///
/// `Positive` means the first level's mean is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum EffectDirection {
    Negative,
    Tie,
    Positive,
}

impl EffectDirection {
    pub fn from_statistic(statistic: f64) -> Self {
        if statistic > 0.0 {
            EffectDirection::Positive
        } else if statistic < 0.0 {
            EffectDirection::Negative
        } else {
            EffectDirection::Tie
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            EffectDirection::Negative => -1,
            EffectDirection::Tie => 0,
            EffectDirection::Positive => 1,
        }
    }

    /// The same relationship stated with the two levels swapped.
    pub fn reversed(self) -> Self {
        match self {
            EffectDirection::Negative => EffectDirection::Positive,
            EffectDirection::Tie => EffectDirection::Tie,
            EffectDirection::Positive => EffectDirection::Negative,
        }
    }
}

impl TryFrom<i8> for EffectDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(EffectDirection::Negative),
            0 => Ok(EffectDirection::Tie),
            1 => Ok(EffectDirection::Positive),
            other => Err(format!("effect direction must be -1, 0 or 1, got {}", other)),
        }
    }
}

impl From<EffectDirection> for i8 {
    fn from(direction: EffectDirection) -> Self {
        direction.as_i8()
    }
}

impl fmt::Display for EffectDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value
    pub statistic: T,
    /// The two-sided p-value of the test
    pub p_value: T,
    /// Degrees of freedom of the reference t distribution
    pub degrees_of_freedom: Option<T>,
    /// Standard error of the mean difference
    pub standard_error: Option<T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
            standard_error: None,
        }
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: T) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }
}

/// Outcome of comparing one unordered pair of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub level1: String,
    pub level2: String,
    pub effect_direction: EffectDirection,
    /// Raw t statistic of `level1` against `level2`
    #[serde(default)]
    pub statistic: f64,
    pub p_value: f64,
    pub is_sig: bool,
    pub corrected_p_value: f64,
}

impl ComparisonRecord {
    /// Build a record by hand, e.g. from results computed elsewhere.
    pub fn new(
        level1: impl Into<String>,
        level2: impl Into<String>,
        effect_direction: EffectDirection,
        is_sig: bool,
    ) -> Self {
        ComparisonRecord {
            level1: level1.into(),
            level2: level2.into(),
            effect_direction,
            statistic: 0.0,
            p_value: if is_sig { 0.0 } else { 1.0 },
            is_sig,
            corrected_p_value: if is_sig { 0.0 } else { 1.0 },
        }
    }

    /// True if this record compares `a` and `b`, in either order.
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        (self.level1 == a && self.level2 == b) || (self.level1 == b && self.level2 == a)
    }
}

/// All pairwise comparisons of one factor, in `combinations(levels, 2)` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    records: Vec<ComparisonRecord>,
    /// False discovery rate used for the `is_sig` decisions
    pub alpha: f64,
}

impl ComparisonTable {
    pub fn from_records(records: Vec<ComparisonRecord>, alpha: f64) -> Self {
        ComparisonTable { records, alpha }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComparisonRecord> {
        self.records.iter()
    }

    pub fn significant(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.records.iter().filter(|r| r.is_sig)
    }

    /// Look up the comparison of `a` and `b` regardless of which was named first.
    pub fn find(&self, a: &str, b: &str) -> Option<&ComparisonRecord> {
        self.records.iter().find(|r| r.involves_pair(a, b))
    }

    pub fn into_records(self) -> Vec<ComparisonRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ComparisonTable {
    type Item = &'a ComparisonRecord;
    type IntoIter = std::slice::Iter<'a, ComparisonRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w1 = self
            .records
            .iter()
            .map(|r| r.level1.chars().count())
            .max()
            .unwrap_or(0)
            .max("level1".len());
        let w2 = self
            .records
            .iter()
            .map(|r| r.level2.chars().count())
            .max()
            .unwrap_or(0)
            .max("level2".len());

        writeln!(
            f,
            "{:>4}  {:<w1$}  {:<w2$}  {:>16}  {:>12}  {:>6}  {:>17}",
            "",
            "level1",
            "level2",
            "effect_direction",
            "p_value",
            "is_sig",
            "corrected_p_value",
        )?;
        for (i, r) in self.records.iter().enumerate() {
            writeln!(
                f,
                "{:>4}  {:<w1$}  {:<w2$}  {:>16}  {:>12.6e}  {:>6}  {:>17.6e}",
                i,
                r.level1,
                r.level2,
                r.effect_direction.as_i8(),
                r.p_value,
                r.is_sig,
                r.corrected_p_value,
            )?;
        }
        Ok(())
    }
}
