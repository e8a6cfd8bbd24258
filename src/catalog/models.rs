use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire id does not name any variant of a choice enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {}", self.field, self.value)
    }
}

impl std::error::Error for UnknownChoice {}

/// Closed set of values with a wire id and a human readable label
pub trait Choice: Sized + Copy + 'static {
    /// Name used in error messages and query parameters
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn id(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn parse(value: &str) -> Result<Self, UnknownChoice> {
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownChoice {
                field: Self::FIELD,
                value: value.to_string(),
            })
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => ($id:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl Choice for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Choice>::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

choice_enum! {
    /// Seniority required for a posting
    ExperienceLevel, "experience" {
        Entry => ("entry", "Entry Level"),
        Mid => ("mid", "Mid Level"),
        Senior => ("senior", "Senior Level"),
    }
}

choice_enum! {
    /// Employment arrangement of a posting
    JobType, "type" {
        FullTime => ("full-time", "Full-time"),
        PartTime => ("part-time", "Part-time"),
        Internship => ("internship", "Internship"),
        Contract => ("contract", "Contract"),
    }
}

choice_enum! {
    /// Where the work happens
    LocationType, "locationType" {
        Remote => ("remote", "Remote"),
        Onsite => ("onsite", "Onsite"),
        Hybrid => ("hybrid", "Hybrid"),
    }
}

choice_enum! {
    /// Industry bucket used for the category tabs
    Category, "category" {
        It => ("it", "IT & Software"),
        Marketing => ("marketing", "Marketing"),
        Finance => ("finance", "Finance"),
        Healthcare => ("healthcare", "Healthcare"),
        Government => ("government", "Government & Public Sector"),
    }
}

/// One posting in the catalog
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free-text range such as "$90,000 - $110,000"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub experience_level: ExperienceLevel,
    pub job_type: JobType,
    pub location_type: LocationType,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub perks: Vec<String>,
    pub posted_date: NaiveDate,
    pub deadline: NaiveDate,
    pub company_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
}

/// Category tab entry with the number of postings it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: Category,
    pub label: &'static str,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_wire_ids_round_trip_through_serde() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, "\"full-time\"");

        let parsed: LocationType = serde_json::from_str("\"hybrid\"").unwrap();
        assert_eq!(parsed, LocationType::Hybrid);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("IT".parse::<Category>().unwrap(), Category::It);
        assert_eq!("Senior".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Senior);
    }

    #[test]
    fn test_parse_unknown_value_names_the_field() {
        let err = "freelance".parse::<JobType>().unwrap_err();
        assert_eq!(err.field, "type");
        assert_eq!(err.to_string(), "unknown type value: freelance");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::It.label(), "IT & Software");
        assert_eq!(Category::Government.label(), "Government & Public Sector");
        assert_eq!(ExperienceLevel::Mid.label(), "Mid Level");
        assert_eq!(JobType::PartTime.label(), "Part-time");
    }

    #[test]
    fn test_variant_order_follows_declaration() {
        assert!(Category::It < Category::Marketing);
        assert_eq!(Category::ALL.len(), 5);
        assert_eq!(JobType::ALL.first(), Some(&JobType::FullTime));
    }
}
