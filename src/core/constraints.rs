use chrono::NaiveDate;

use crate::models::{BookableUnit, HardConstraints};

/// One conjunct of the compiled hard-constraint predicate.
///
/// Each clause knows how to render itself as a SQL condition for the catalog
/// store and how to evaluate itself against an in-memory row, with identical
/// null handling: an absent candidate field never disqualifies.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact match on the ISO country code
    CountryEquals(String),
    /// Candidate availability starts no later than the requested end
    StartsBy(NaiveDate),
    /// Candidate availability ends no earlier than the requested begin
    EndsAfter(NaiveDate),
    /// Candidate age window admits the traveler's age
    AdmitsAge(i64),
    /// Candidate party-size cap admits the requested group
    AdmitsParty(i64),
}

impl Clause {
    /// Render this clause as a SQL condition. String values are escaped by
    /// doubling single quotes before being embedded.
    pub fn sql(&self) -> String {
        match self {
            Clause::CountryEquals(code) => format!("country = '{}'", escape(code)),
            Clause::StartsBy(end) => {
                format!("(start_date IS NULL OR start_date <= '{}')", end.format("%Y-%m-%d"))
            }
            Clause::EndsAfter(begin) => {
                format!("(end_date IS NULL OR end_date >= '{}')", begin.format("%Y-%m-%d"))
            }
            Clause::AdmitsAge(age) => format!(
                "(min_age IS NULL OR min_age <= {age}) AND (max_age IS NULL OR max_age >= {age})"
            ),
            Clause::AdmitsParty(pax) => format!("(max_pax IS NULL OR max_pax >= {pax})"),
        }
    }

    /// Evaluate this clause against an in-memory row with the same
    /// open-interval semantics the SQL rendering has
    pub fn matches(&self, unit: &BookableUnit) -> bool {
        match self {
            Clause::CountryEquals(code) => unit.country.as_deref() == Some(code.as_str()),
            Clause::StartsBy(end) => unit.start_date.map_or(true, |start| start <= *end),
            Clause::EndsAfter(begin) => unit.end_date.map_or(true, |e| e >= *begin),
            Clause::AdmitsAge(age) => {
                unit.min_age.map_or(true, |min| i64::from(min) <= *age)
                    && unit.max_age.map_or(true, |max| i64::from(max) >= *age)
            }
            Clause::AdmitsParty(pax) => unit.max_pax.map_or(true, |max| i64::from(max) >= *pax),
        }
    }
}

/// Conjunction of hard-constraint clauses, handed to the catalog store
#[derive(Debug, Clone, Default)]
pub struct CompiledPredicate {
    clauses: Vec<Clause>,
}

impl CompiledPredicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True when no source field produced a clause; such a predicate
    /// matches every row
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    /// SQL WHERE body for the catalog store
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            return "TRUE".to_string();
        }
        self.clauses
            .iter()
            .map(Clause::sql)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Evaluate all clauses against one row
    pub fn matches(&self, unit: &BookableUnit) -> bool {
        self.clauses.iter().all(|clause| clause.matches(unit))
    }
}

/// Compile hard constraints into a conjunction of independent clauses, each
/// included only when its source field is present
pub fn compile(constraints: &HardConstraints) -> CompiledPredicate {
    let mut clauses = Vec::new();

    if let Some(country) = &constraints.country {
        if !country.trim().is_empty() {
            clauses.push(Clause::CountryEquals(country.clone()));
        }
    }

    // Date overlap: each requested bound restricts the opposite end of the
    // candidate window; a candidate with no window is always available
    match (constraints.holiday_begin_date, constraints.holiday_end_date) {
        (Some(begin), Some(end)) => {
            clauses.push(Clause::StartsBy(end));
            clauses.push(Clause::EndsAfter(begin));
        }
        (Some(begin), None) => clauses.push(Clause::EndsAfter(begin)),
        (None, Some(end)) => clauses.push(Clause::StartsBy(end)),
        (None, None) => {}
    }

    if let Some(age) = constraints.age {
        clauses.push(Clause::AdmitsAge(age));
    }

    if let Some(pax) = constraints.max_pax {
        clauses.push(Clause::AdmitsParty(pax));
    }

    CompiledPredicate { clauses }
}

/// Double single quotes so values are safe to embed in a query string
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
