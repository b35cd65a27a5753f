use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of patients an analytics call is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    #[default]
    All,
    Patients(BTreeSet<i64>),
}

impl Cohort {
    pub fn from_ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        Self::Patients(ids.into_iter().collect())
    }

    pub fn contains(&self, patient_id: i64) -> bool {
        match self {
            Self::All => true,
            Self::Patients(ids) => ids.contains(&patient_id),
        }
    }

    /// Explicit ids, `None` for the whole store.
    pub fn ids(&self) -> Option<&BTreeSet<i64>> {
        match self {
            Self::All => None,
            Self::Patients(ids) => Some(ids),
        }
    }
}

/// Sort direction for follow-up visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    Ascending,
    Descending,
}

impl VisitOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}
