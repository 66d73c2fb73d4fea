//! End-to-end temperament checks.

use temper::exact::fraction;
use temper::{parse_interval, ExtendedMonzo, Mapping, MonzoError};

fn monzo(input: &str) -> ExtendedMonzo {
    parse_interval(input, 3).unwrap()
}

fn tempered_cents(mapping: &Mapping, input: &str) -> f64 {
    mapping.apply(&monzo(input)).unwrap().total_cents()
}

#[test]
fn test_convergents_of_half_octave() {
    let tritone = ExtendedMonzo::from_equal_temperament(&fraction(1, 2), &fraction(2, 1), 1).unwrap();
    let expected = [fraction(1, 1), fraction(3, 2), fraction(7, 5), fraction(17, 12)];
    for (depth, want) in expected.iter().enumerate() {
        assert_eq!(&tritone.get_convergent(depth).unwrap(), want, "depth {}", depth);
    }
}

#[test]
fn test_semiconvergents_of_pi() {
    let pi = ExtendedMonzo::from_value(std::f64::consts::PI, 0).unwrap();
    let expected = [
        fraction(3, 1),
        fraction(13, 4),
        fraction(16, 5),
        fraction(19, 6),
        fraction(22, 7),
        fraction(179, 57),
    ];
    for (depth, want) in expected.iter().enumerate() {
        assert_eq!(&pi.get_semiconvergent(depth).unwrap(), want, "depth {}", depth);
    }
}

#[test]
fn test_mmod_by_unison_fails() {
    let octave = ExtendedMonzo::from_exponents(&[1]).unwrap();
    let unison = ExtendedMonzo::from_exponents(&[0]).unwrap();
    let err = octave.mmod(&unison).unwrap_err();
    assert_eq!(err, MonzoError::ModuloByUnison);
    assert_eq!(err.to_string(), "Modulo by unison");
}

#[test]
fn test_octave_reduction() {
    let octave = monzo("2");
    for (input, reduced) in [("3", (3, 2)), ("5", (5, 4)), ("1/3", (4, 3)), ("15/4", (15, 8))] {
        let got = monzo(input).mmod(&octave).unwrap().to_fraction().unwrap();
        assert_eq!(got, fraction(reduced.0, reduced.1), "{} mmod 2", input);
    }
}

#[test]
fn test_quarter_comma_meantone() {
    let mapping = Mapping::from_comma_list(
        &[monzo("81/80")],
        &[0, 1, 2],
        None,
        &[monzo("2/1"), monzo("5/4")],
    )
    .unwrap();

    let major_tone = tempered_cents(&mapping, "9/8");
    let minor_tone = tempered_cents(&mapping, "10/9");
    assert!((major_tone - minor_tone).abs() < 1e-4);
    assert!((major_tone - 193.157).abs() < 1e-3);
    assert!((tempered_cents(&mapping, "2/1") - 1200.0).abs() < 1e-4);
    assert!((tempered_cents(&mapping, "5/4") - monzo("5/4").total_cents()).abs() < 1e-4);
}

#[test]
fn test_unconstrained_minimax_meantone() {
    let mapping = Mapping::from_comma_list(&[monzo("81/80")], &[0, 1, 2], None, &[]).unwrap();
    for target in ["2/1", "3/1", "5/1"] {
        let error = tempered_cents(&mapping, target) - monzo(target).total_cents();
        assert!(error.abs() < 2.61, "{} is off by {}c", target, error);
    }
    assert!(tempered_cents(&mapping, "81/80").abs() < 1e-9);
}

#[test]
fn test_patent_val_12() {
    let mapping = Mapping::from_patent_val(12, &fraction(2, 1), &[0, 0, 0], 3).unwrap();
    let octave = fraction(2, 1);
    let steps: Vec<_> = mapping
        .columns()
        .iter()
        .map(|column| column.to_equal_temperament().unwrap())
        .collect();
    assert_eq!(
        steps,
        vec![
            (fraction(1, 1), octave.clone()),
            (fraction(19, 12), octave.clone()),
            (fraction(28, 12), octave.clone()),
        ]
    );
    assert!((mapping.columns()[0].total_cents() - 1200.0).abs() < 1e-9);

    let fifth = mapping.apply(&monzo("3/2")).unwrap();
    assert_eq!(fifth.to_equal_temperament().unwrap(), (fraction(7, 12), octave));
    assert_eq!(fifth, monzo("7\\12"));
}

#[test]
fn test_pure_octave_meantone_keeps_commas_tempered() {
    let mapping = Mapping::from_comma_list(&[monzo("81/80")], &[0, 1, 2], None, &[])
        .unwrap()
        .pure_octaves()
        .unwrap();
    assert!((tempered_cents(&mapping, "2/1") - 1200.0).abs() < 1e-9);
    assert!(tempered_cents(&mapping, "81/80").abs() < 1e-9);
}

#[test]
fn test_mapping_serializes() {
    let mapping = Mapping::from_patent_val(12, &fraction(2, 1), &[], 3).unwrap();
    let json = serde_json::to_string(&mapping).unwrap();
    let back: Mapping = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mapping);
}
