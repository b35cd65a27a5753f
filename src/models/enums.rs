use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same string value as the database column.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
    Unknown => "unknown",
});

str_enum!(WhoGrade {
    GradeI => "I",
    GradeII => "II",
    GradeIII => "III",
    GradeIV => "IV",
    Unknown => "unknown",
});

str_enum!(IdhStatus {
    Wildtype => "wildtype",
    Mutant => "mutant",
    Unknown => "unknown",
});

str_enum!(MgmtStatus {
    Methylated => "methylated",
    Unmethylated => "unmethylated",
    Unknown => "unknown",
});

str_enum!(AtrxStatus {
    Retained => "retained",
    Lost => "lost",
    Unknown => "unknown",
});

str_enum!(CodeletionStatus {
    Present => "present",
    Absent => "absent",
    Unknown => "unknown",
});

str_enum!(SurgeryType {
    Biopsy => "biopsy",
    PartialResection => "partial_resection",
    SubtotalResection => "subtotal_resection",
    GrossTotalResection => "gross_total_resection",
});

str_enum!(TreatmentType {
    Radiation => "radiation",
    Chemotherapy => "chemotherapy",
    Immunotherapy => "immunotherapy",
    TargetedTherapy => "targeted_therapy",
    Combination => "combination",
});

str_enum!(TreatmentStatus {
    Planned => "planned",
    Active => "active",
    Completed => "completed",
    Discontinued => "discontinued",
    OnHold => "on_hold",
});

str_enum!(ImagingResponse {
    CompleteResponse => "complete_response",
    PartialResponse => "partial_response",
    StableDisease => "stable_disease",
    ProgressiveDisease => "progressive_disease",
});

str_enum!(NeurologicalStatus {
    Stable => "stable",
    Improved => "improved",
    Declined => "declined",
});

str_enum!(EcogScore {
    Score0 => "0",
    Score1 => "1",
    Score2 => "2",
    Score3 => "3",
    Score4 => "4",
});

impl ImagingResponse {
    /// Clinical priority used for best-response selection: CR > PR > SD > PD.
    pub fn priority(&self) -> u8 {
        match self {
            Self::CompleteResponse => 4,
            Self::PartialResponse => 3,
            Self::StableDisease => 2,
            Self::ProgressiveDisease => 1,
        }
    }

    /// Complete or partial response (counts toward the objective response rate).
    pub fn is_objective(&self) -> bool {
        matches!(self, Self::CompleteResponse | Self::PartialResponse)
    }

    /// Anything short of progression (counts toward disease control).
    pub fn is_disease_control(&self) -> bool {
        !matches!(self, Self::ProgressiveDisease)
    }
}
