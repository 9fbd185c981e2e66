//! Genotype resolution and dosing lookup.
//!
//! A genotype is resolved by scanning the reference table in order and
//! taking the first record whose expected calls equal the observed calls at
//! all six positions. There is no partial matching: `.` is an ordinary
//! symbol, not a wildcard. When nothing matches the result is
//! `GenotypeCall::Unknown`, which is a normal outcome and not an error.

use crate::allele::{ObservedAlleles, Position};
use crate::reference::{
    all_genotypes, AcetylatorType, GenotypeRecord, Recommendation, FALLBACK_RECOMMENDATION,
};

/// Label reported for an unresolved genotype or acetylator class.
pub const UNKNOWN: &str = "Unknown";

/// Outcome of resolving a set of observed calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenotypeCall {
    /// The calls match a known diplotype.
    Known(&'static GenotypeRecord),
    /// No known diplotype matches at all six positions.
    Unknown,
}

impl GenotypeCall {
    /// Diplotype label, or `"Unknown"`.
    pub fn label(&self) -> &'static str {
        match self {
            GenotypeCall::Known(record) => record.label,
            GenotypeCall::Unknown => UNKNOWN,
        }
    }

    pub fn acetylator(&self) -> Option<AcetylatorType> {
        match self {
            GenotypeCall::Known(record) => Some(record.acetylator),
            GenotypeCall::Unknown => None,
        }
    }

    /// Acetylator class name, or `"Unknown"`.
    pub fn acetylator_label(&self) -> &'static str {
        self.acetylator().map_or(UNKNOWN, AcetylatorType::as_str)
    }

    /// Population frequency in percent; `0.0` when unknown.
    pub fn frequency(&self) -> f64 {
        match self {
            GenotypeCall::Known(record) => record.frequency,
            GenotypeCall::Unknown => 0.0,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, GenotypeCall::Known(_))
    }

    /// Returns `(label, acetylator class, frequency)`.
    pub fn as_tuple(&self) -> (&'static str, &'static str, f64) {
        (self.label(), self.acetylator_label(), self.frequency())
    }

    /// Dosing guidance for the resolved class.
    pub fn recommendation(&self) -> &'static Recommendation {
        recommendation_for(self.acetylator())
    }
}

/// Returns true if `record` expects exactly the observed call at every position.
fn matches_record(record: &GenotypeRecord, observed: &ObservedAlleles) -> bool {
    Position::ALL
        .iter()
        .all(|&position| observed.get(position) == record.alleles.get(position))
}

/// Returns the first record in `table` matching `observed` at all six positions.
pub fn first_match<'a>(
    table: &'a [GenotypeRecord],
    observed: &ObservedAlleles,
) -> Option<&'a GenotypeRecord> {
    table.iter().find(|record| matches_record(record, observed))
}

/// Resolves observed calls against the built-in reference table.
pub fn resolve_genotype(observed: &ObservedAlleles) -> GenotypeCall {
    match first_match(all_genotypes(), observed) {
        Some(record) => {
            tracing::debug!(%observed, genotype = record.label, "genotype resolved");
            GenotypeCall::Known(record)
        }
        None => {
            tracing::debug!(%observed, "no known genotype matches");
            GenotypeCall::Unknown
        }
    }
}

/// Dosing guidance for an acetylator class; `None` gets the fallback.
pub fn recommendation_for(acetylator: Option<AcetylatorType>) -> &'static Recommendation {
    match acetylator {
        Some(class) => class.recommendation(),
        None => &FALLBACK_RECOMMENDATION,
    }
}

/// Dosing guidance by class name.
///
/// The name must be exactly `Fast`, `Intermediate` or `Slow`. Anything else,
/// including `"Unknown"`, other casings and padded names, gets the fallback
/// guidance.
pub fn recommendation_for_label(label: &str) -> &'static Recommendation {
    let class = AcetylatorType::ALL.into_iter().find(|t| t.as_str() == label);
    if class.is_none() {
        tracing::debug!(label, "no dosing record for acetylator class");
    }
    recommendation_for(class)
}

/// Observed calls together with their genotype and dosing guidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub observed: ObservedAlleles,
    pub call: GenotypeCall,
    pub recommendation: &'static Recommendation,
}

impl Analysis {
    /// Resolves `observed` and looks up the matching guidance.
    pub fn run(observed: ObservedAlleles) -> Self {
        let call = resolve_genotype(&observed);
        tracing::info!(
            genotype = call.label(),
            acetylator = call.acetylator_label(),
            "analysis complete"
        );
        Self {
            observed,
            call,
            recommendation: call.recommendation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::Allele;
    use crate::reference::{genotype, AcetylatorType};

    fn calls(s: &str) -> ObservedAlleles {
        s.parse().unwrap()
    }

    #[test]
    fn test_all_wild_type_is_fast() {
        let call = resolve_genotype(&calls("282=.,341=.,481=.,590=.,803=.,857=."));
        assert_eq!(call.as_tuple(), ("NAT2*4/*4", "Fast", 3.3));
    }

    #[test]
    fn test_empty_input_defaults_to_wild_type() {
        let call = resolve_genotype(&ObservedAlleles::new());
        assert_eq!(call.as_tuple(), ("NAT2*4/*4", "Fast", 3.3));
    }

    #[test]
    fn test_intermediate_genotype() {
        let call = resolve_genotype(&calls("803=A,857=G"));
        assert_eq!(call.as_tuple(), ("NAT2*4/*14", "Intermediate", 0.8));
    }

    #[test]
    fn test_slow_genotype() {
        let call = resolve_genotype(&calls("282=T,590=A"));
        assert_eq!(call.as_tuple(), ("NAT2*6/*6", "Slow", 15.8));
        assert_eq!(call.recommendation().dose, "2.5-4 mg/kg/day");
    }

    #[test]
    fn test_no_match_is_unknown() {
        let call = resolve_genotype(&calls("282=T,341=T,481=T,590=T,803=T,857=T"));
        assert_eq!(call, GenotypeCall::Unknown);
        assert_eq!(call.as_tuple(), ("Unknown", "Unknown", 0.0));
        assert!(!call.is_known());
    }

    #[test]
    fn test_partial_match_is_unknown() {
        // NAT2*6/*6 needs both 282=T and 590=A
        let call = resolve_genotype(&calls("282=T"));
        assert_eq!(call, GenotypeCall::Unknown);
    }

    #[test]
    fn test_shared_pattern_resolves_to_first_record() {
        let call = resolve_genotype(&calls("341=C,481=T,803=G"));
        assert_eq!(call.as_tuple(), ("NAT2*4/*5", "Intermediate", 15.0));
    }

    #[test]
    fn test_first_match_respects_table_order() {
        let slow = *genotype("NAT2*6/*6").unwrap();
        let overlapping = GenotypeRecord {
            label: "NAT2*6/*7",
            acetylator: AcetylatorType::Intermediate,
            frequency: 1.0,
            alleles: slow.alleles,
        };
        let observed = calls("282=T,590=A");

        let table = [slow, overlapping];
        assert_eq!(first_match(&table, &observed).map(|r| r.label), Some("NAT2*6/*6"));

        let table = [overlapping, slow];
        assert_eq!(first_match(&table, &observed).map(|r| r.label), Some("NAT2*6/*7"));

        assert!(first_match(&[], &observed).is_none());
    }

    #[test]
    fn test_recommendation_fallback() {
        assert_eq!(recommendation_for(None).dose, "Consult specialist");
        assert_eq!(recommendation_for_label("Unknown").dose, "Consult specialist");
        assert_eq!(recommendation_for_label("Ultra-rapid").risk, "Unknown");
        assert_eq!(recommendation_for_label("").monitoring, "Frequent monitoring required");
        assert_eq!(recommendation_for(None).details, "Individual assessment needed");
    }

    #[test]
    fn test_class_name_lookup_is_exact() {
        for label in ["slow", "FAST", " Intermediate ", "Slow\n"] {
            assert_eq!(recommendation_for_label(label), &FALLBACK_RECOMMENDATION, "{:?}", label);
        }
    }

    #[test]
    fn test_recommendation_by_label() {
        assert_eq!(recommendation_for_label("Fast").dose, "5-6 mg/kg/day");
        assert_eq!(recommendation_for_label("Intermediate").dose, "4-5 mg/kg/day");
        assert!(recommendation_for_label("Slow").risk.contains("liver injury"));
    }

    #[test]
    fn test_analysis_bundles_recommendation() {
        let observed = ObservedAlleles::new().with(Position::P282, Allele::T).with(Position::P590, Allele::A);
        let analysis = Analysis::run(observed);
        assert_eq!(analysis.call.label(), "NAT2*6/*6");
        assert_eq!(analysis.recommendation, AcetylatorType::Slow.recommendation());

        let analysis = Analysis::run(ObservedAlleles::new().with(Position::P857, Allele::C));
        assert_eq!(analysis.recommendation, &FALLBACK_RECOMMENDATION);
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let observed = calls("803=A,857=G");
        assert_eq!(resolve_genotype(&observed), resolve_genotype(&observed));
    }
}
