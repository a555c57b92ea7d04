use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raised when a candidate string is not one of the members of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a member of enumeration {enumeration} [{}]", .allowed.join(", "))]
pub struct UnknownMember {
    pub enumeration: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

/// A closed, string-backed enumeration.
pub trait Vocabulary: Copy + Sized + 'static {
    /// Name used in error messages and schema titles.
    const NAME: &'static str;
    /// Every member in declaration order.
    const ALL: &'static [Self];
    /// Wire form of every member, aligned with `ALL`.
    const VALUES: &'static [&'static str];

    fn as_str(self) -> &'static str;

    fn parse(raw: &str) -> Result<Self, UnknownMember> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.as_str() == raw)
            .ok_or_else(|| UnknownMember {
                enumeration: Self::NAME,
                value: raw.to_string(),
                allowed: Self::VALUES,
            })
    }
}

macro_rules! string_backed {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownMember;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                <$ty as Vocabulary>::parse(raw)
            }
        }
    };
}

/// Lifecycle state of a company record. Companies are never deleted, only
/// transitioned away from `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Acquired,
    Exited,
}

impl Vocabulary for CompanyStatus {
    const NAME: &'static str = "CompanyStatus";
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive, Self::Acquired, Self::Exited];
    const VALUES: &'static [&'static str] = &["active", "inactive", "acquired", "exited"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Acquired => "acquired",
            Self::Exited => "exited",
        }
    }
}

string_backed!(CompanyStatus);

/// Relationship between the fund and the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    Portfolio,
    Target,
    Exited,
    Benchmark,
}

impl Vocabulary for OwnershipType {
    const NAME: &'static str = "OwnershipType";
    const ALL: &'static [Self] = &[
        Self::Portfolio,
        Self::Target,
        Self::Exited,
        Self::Benchmark,
    ];
    const VALUES: &'static [&'static str] = &["portfolio", "target", "exited", "benchmark"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Target => "target",
            Self::Exited => "exited",
            Self::Benchmark => "benchmark",
        }
    }
}

string_backed!(OwnershipType);

/// The seven AI-readiness dimensions. Ordering follows declaration order and
/// drives the key order of serialized weight and target maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionName {
    DataInfrastructure,
    AiGovernance,
    TechnologyStack,
    Talent,
    Leadership,
    UseCasePortfolio,
    Culture,
}

impl DimensionName {
    pub const COUNT: usize = 7;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::DataInfrastructure,
            Self::AiGovernance,
            Self::TechnologyStack,
            Self::Talent,
            Self::Leadership,
            Self::UseCasePortfolio,
            Self::Culture,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DataInfrastructure => "Data Infrastructure",
            Self::AiGovernance => "AI Governance",
            Self::TechnologyStack => "Technology Stack",
            Self::Talent => "Talent",
            Self::Leadership => "Leadership",
            Self::UseCasePortfolio => "Use Case Portfolio",
            Self::Culture => "Culture",
        }
    }
}

impl Vocabulary for DimensionName {
    const NAME: &'static str = "DimensionName";
    const ALL: &'static [Self] = &Self::ordered();
    const VALUES: &'static [&'static str] = &[
        "data_infrastructure",
        "ai_governance",
        "technology_stack",
        "talent",
        "leadership",
        "use_case_portfolio",
        "culture",
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::DataInfrastructure => "data_infrastructure",
            Self::AiGovernance => "ai_governance",
            Self::TechnologyStack => "technology_stack",
            Self::Talent => "talent",
            Self::Leadership => "leadership",
            Self::UseCasePortfolio => "use_case_portfolio",
            Self::Culture => "culture",
        }
    }
}

string_backed!(DimensionName);

/// Assessor confidence attached to a dimension score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Anchored pattern equivalent to the membership test.
    pub const PATTERN: &'static str = "^(high|medium|low)$";
}

impl Vocabulary for ConfidenceLevel {
    const NAME: &'static str = "ConfidenceLevel";
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];
    const VALUES: &'static [&'static str] = &["high", "medium", "low"];

    fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

string_backed!(ConfidenceLevel);
