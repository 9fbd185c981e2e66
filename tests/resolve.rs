use std::io::Write;

use nat2dose::allele::{Allele, ObservedAlleles, Position};
use nat2dose::calls::{parse_calls_file, CallsError};
use nat2dose::reference::{all_genotypes, shadowed_genotypes, AcetylatorType};
use nat2dose::resolver::{
    recommendation_for, recommendation_for_label, resolve_genotype, Analysis, GenotypeCall,
};

fn observed(pairs: &[(u16, char)]) -> ObservedAlleles {
    ObservedAlleles::from_coordinates(pairs.iter().copied()).unwrap()
}

#[test]
fn test_wild_type_at_every_position_is_fast() {
    let input = observed(&[(282, '.'), (341, '.'), (481, '.'), (590, '.'), (803, '.'), (857, '.')]);
    assert_eq!(resolve_genotype(&input).as_tuple(), ("NAT2*4/*4", "Fast", 3.3));
}

#[test]
fn test_nat2_14_is_intermediate() {
    let input = observed(&[(282, '.'), (341, '.'), (481, '.'), (590, '.'), (803, 'A'), (857, 'G')]);
    assert_eq!(resolve_genotype(&input).as_tuple(), ("NAT2*4/*14", "Intermediate", 0.8));
}

#[test]
fn test_nat2_6_is_slow() {
    let input = observed(&[(282, 'T'), (341, '.'), (481, '.'), (590, 'A'), (803, '.'), (857, '.')]);
    assert_eq!(resolve_genotype(&input).as_tuple(), ("NAT2*6/*6", "Slow", 15.8));
}

#[test]
fn test_all_t_is_unknown() {
    let input = observed(&[(282, 'T'), (341, 'T'), (481, 'T'), (590, 'T'), (803, 'T'), (857, 'T')]);
    assert_eq!(resolve_genotype(&input).as_tuple(), ("Unknown", "Unknown", 0.0));
}

#[test]
fn test_empty_input_matches_wild_type() {
    assert_eq!(
        resolve_genotype(&observed(&[])),
        resolve_genotype(&observed(&[(282, '.'), (857, '.')]))
    );
    assert_eq!(resolve_genotype(&observed(&[])).label(), "NAT2*4/*4");
}

#[test]
fn test_slow_recommendation() {
    let rec = recommendation_for_label("Slow");
    assert_eq!(rec.dose, "2.5-4 mg/kg/day");
    assert!(rec.risk.contains("liver injury"));
}

#[test]
fn test_every_reachable_record_resolves_to_itself() {
    let shadowed: Vec<&str> = shadowed_genotypes(all_genotypes())
        .iter()
        .map(|(record, _)| record.label)
        .collect();

    for record in all_genotypes() {
        let call = resolve_genotype(&record.alleles);
        if shadowed.contains(&record.label) {
            assert_ne!(call.label(), record.label);
            continue;
        }
        assert_eq!(
            call.as_tuple(),
            (record.label, record.acetylator.as_str(), record.frequency)
        );
    }
}

#[test]
fn test_single_substitution_from_any_record_is_unknown_or_another_record() {
    for record in all_genotypes() {
        for position in Position::ALL {
            for allele in Allele::ALL {
                if allele == record.alleles.get(position) {
                    continue;
                }
                let input = record.alleles.with(position, allele);
                match resolve_genotype(&input) {
                    GenotypeCall::Unknown => {}
                    GenotypeCall::Known(other) => assert_eq!(other.alleles, input),
                }
            }
        }
    }
}

#[test]
fn test_recommendations_cover_every_class() {
    for class in AcetylatorType::ALL {
        let rec = recommendation_for(Some(class));
        assert_eq!(rec, recommendation_for_label(class.as_str()));
        assert_ne!(rec.dose, "Consult specialist");
    }
    assert_eq!(recommendation_for_label("Unknown").dose, "Consult specialist");
    assert_eq!(recommendation_for_label("rapid").dose, "Consult specialist");
    assert_eq!(recommendation_for_label("slow").dose, "Consult specialist");
    assert_eq!(recommendation_for_label("FAST").dose, "Consult specialist");
}

#[test]
fn test_analysis_from_call_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# NAT2*6/*6 carrier").unwrap();
    writeln!(file, "282\tT").unwrap();
    writeln!(file, "590\tA").unwrap();

    let analysis = Analysis::run(parse_calls_file(file.path()).unwrap());
    assert_eq!(analysis.call.label(), "NAT2*6/*6");
    assert_eq!(analysis.recommendation.monitoring, "Monthly liver function tests");
}

#[test]
fn test_missing_call_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_calls_file(dir.path().join("absent.calls"));
    assert!(matches!(result, Err(CallsError::IoError(_))));
}
