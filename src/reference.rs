//! NAT2 reference tables.
//!
//! This module provides:
//! - The known NAT2 diplotypes with their acetylator class, population
//!   frequency and expected calls at the six marker positions
//! - Isoniazid dosing guidance for each acetylator class
//!
//! Both tables are compiled-in constants and are never modified.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::allele::Allele::{self, Wild as W, A, C, G, T};
use crate::allele::ObservedAlleles;

/// Acetylator phenotype: how quickly isoniazid is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcetylatorType {
    Fast,
    Intermediate,
    Slow,
}

/// Error returned when a string does not name an acetylator class.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown acetylator type: {0}")]
pub struct UnknownAcetylatorType(pub String);

impl AcetylatorType {
    /// All classes, fastest first.
    pub const ALL: [AcetylatorType; 3] = [
        AcetylatorType::Fast,
        AcetylatorType::Intermediate,
        AcetylatorType::Slow,
    ];

    /// Returns the display name of this class.
    pub fn as_str(self) -> &'static str {
        match self {
            AcetylatorType::Fast => "Fast",
            AcetylatorType::Intermediate => "Intermediate",
            AcetylatorType::Slow => "Slow",
        }
    }

    /// Returns the dosing guidance for this class.
    pub fn recommendation(self) -> &'static Recommendation {
        match self {
            AcetylatorType::Fast => &FAST,
            AcetylatorType::Intermediate => &INTERMEDIATE,
            AcetylatorType::Slow => &SLOW,
        }
    }
}

impl fmt::Display for AcetylatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AcetylatorType {
    type Err = UnknownAcetylatorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownAcetylatorType(s.to_string()))
    }
}

/// A known NAT2 diplotype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeRecord {
    /// Diplotype label, e.g. `NAT2*4/*4`
    pub label: &'static str,
    /// Phenotype this diplotype confers
    pub acetylator: AcetylatorType,
    /// Population frequency, in percent
    pub frequency: f64,
    /// Expected calls at the six marker positions
    pub alleles: ObservedAlleles,
}

/// Dosing and monitoring guidance for isoniazid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub dose: &'static str,
    pub risk: &'static str,
    pub monitoring: &'static str,
    pub details: &'static str,
}

const fn calls(alleles: [Allele; 6]) -> ObservedAlleles {
    ObservedAlleles::from_calls(alleles)
}

/// Known diplotypes, in lookup order.
///
/// Columns of the allele patterns are positions 282, 341, 481, 590, 803, 857.
pub static GENOTYPES: [GenotypeRecord; 5] = [
    GenotypeRecord {
        label: "NAT2*4/*4",
        acetylator: AcetylatorType::Fast,
        frequency: 3.3,
        alleles: calls([W, W, W, W, W, W]),
    },
    GenotypeRecord {
        label: "NAT2*4/*14",
        acetylator: AcetylatorType::Intermediate,
        frequency: 0.8,
        alleles: calls([W, W, W, W, A, G]),
    },
    GenotypeRecord {
        label: "NAT2*4/*5",
        acetylator: AcetylatorType::Intermediate,
        frequency: 15.0,
        alleles: calls([W, C, T, W, G, W]),
    },
    // Same pattern as NAT2*4/*5, so never reached by a first-match lookup.
    GenotypeRecord {
        label: "NAT2*5/*5",
        acetylator: AcetylatorType::Slow,
        frequency: 24.2,
        alleles: calls([W, C, T, W, G, W]),
    },
    GenotypeRecord {
        label: "NAT2*6/*6",
        acetylator: AcetylatorType::Slow,
        frequency: 15.8,
        alleles: calls([T, W, W, A, W, W]),
    },
];

const FAST: Recommendation = Recommendation {
    dose: "5-6 mg/kg/day",
    risk: "Lower risk of adverse effects, monitor for treatment efficacy",
    monitoring: "Regular liver function tests every 3 months",
    details: "May require higher doses to maintain therapeutic levels",
};

const INTERMEDIATE: Recommendation = Recommendation {
    dose: "4-5 mg/kg/day",
    risk: "Moderate risk of adverse effects",
    monitoring: "Liver function tests every 2 months",
    details: "Standard dosing usually appropriate",
};

const SLOW: Recommendation = Recommendation {
    dose: "2.5-4 mg/kg/day",
    risk: "Higher risk of drug-induced liver injury",
    monitoring: "Monthly liver function tests",
    details: "Requires reduced dosing to prevent toxicity",
};

/// Guidance used when the acetylator class is not known.
pub static FALLBACK_RECOMMENDATION: Recommendation = Recommendation {
    dose: "Consult specialist",
    risk: "Unknown",
    monitoring: "Frequent monitoring required",
    details: "Individual assessment needed",
};

/// Returns all known diplotypes, in lookup order.
pub fn all_genotypes() -> &'static [GenotypeRecord] {
    &GENOTYPES
}

/// Looks up a diplotype by label.
pub fn genotype(label: &str) -> Option<&'static GenotypeRecord> {
    GENOTYPES.iter().find(|g| g.label == label)
}

/// Sums diplotype frequencies per acetylator class, fastest first.
pub fn frequency_by_acetylator() -> [(AcetylatorType, f64); 3] {
    AcetylatorType::ALL.map(|class| {
        let total = GENOTYPES
            .iter()
            .filter(|g| g.acetylator == class)
            .map(|g| g.frequency)
            .sum::<f64>();
        (class, total)
    })
}

/// Finds records whose allele pattern repeats an earlier record's.
///
/// Returns `(shadowed, earlier)` pairs. A shadowed record can never be
/// returned by a first-match lookup over `table`.
pub fn shadowed_genotypes(table: &[GenotypeRecord]) -> Vec<(&GenotypeRecord, &GenotypeRecord)> {
    table
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            table[..i]
                .iter()
                .find(|earlier| earlier.alleles == record.alleles)
                .map(|earlier| (record, earlier))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::Position;

    #[test]
    fn test_table_order() {
        let labels: Vec<&str> = all_genotypes().iter().map(|g| g.label).collect();
        assert_eq!(
            labels,
            vec!["NAT2*4/*4", "NAT2*4/*14", "NAT2*4/*5", "NAT2*5/*5", "NAT2*6/*6"]
        );
    }

    #[test]
    fn test_labels_are_unique() {
        for (i, a) in GENOTYPES.iter().enumerate() {
            for b in &GENOTYPES[i + 1..] {
                assert_ne!(a.label, b.label);
            }
        }
    }

    #[test]
    fn test_nat2_6_pattern() {
        let record = genotype("NAT2*6/*6").unwrap();
        assert_eq!(record.alleles.get(Position::P282), Allele::T);
        assert_eq!(record.alleles.get(Position::P590), Allele::A);
        assert_eq!(record.alleles.variant_count(), 2);
        assert_eq!(record.acetylator, AcetylatorType::Slow);
        assert_eq!(record.frequency, 15.8);
    }

    #[test]
    fn test_genotype_lookup_by_label() {
        assert!(genotype("NAT2*4/*14").is_some());
        assert!(genotype("NAT2*7/*7").is_none());
    }

    #[test]
    fn test_recommendations_are_distinct() {
        let fast = AcetylatorType::Fast.recommendation();
        let intermediate = AcetylatorType::Intermediate.recommendation();
        let slow = AcetylatorType::Slow.recommendation();
        assert_ne!(fast, intermediate);
        assert_ne!(intermediate, slow);
        assert_ne!(fast, slow);
        for rec in [fast, intermediate, slow] {
            assert!(!rec.dose.is_empty());
            assert!(!rec.risk.is_empty());
            assert!(!rec.monitoring.is_empty());
            assert!(!rec.details.is_empty());
        }
        assert_eq!(slow.dose, "2.5-4 mg/kg/day");
    }

    #[test]
    fn test_acetylator_parsing() {
        assert_eq!("Fast".parse::<AcetylatorType>(), Ok(AcetylatorType::Fast));
        assert_eq!("slow".parse::<AcetylatorType>(), Ok(AcetylatorType::Slow));
        assert_eq!(
            "Unknown".parse::<AcetylatorType>(),
            Err(UnknownAcetylatorType("Unknown".to_string()))
        );
    }

    #[test]
    fn test_frequency_by_acetylator() {
        let totals = frequency_by_acetylator();
        assert_eq!(totals[0].0, AcetylatorType::Fast);
        assert!((totals[0].1 - 3.3).abs() < 1e-9);
        assert!((totals[1].1 - 15.8).abs() < 1e-9);
        assert!((totals[2].1 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_shadowed_genotypes() {
        let shadowed = shadowed_genotypes(all_genotypes());
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].0.label, "NAT2*5/*5");
        assert_eq!(shadowed[0].1.label, "NAT2*4/*5");
    }
}
