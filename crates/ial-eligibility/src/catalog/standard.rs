use std::collections::BTreeSet;

use super::{Qualification, QualificationCatalog, Subject, Unit, DEFAULT_ONLINE_VARIANT_MARKER};
use crate::eligibility::domain::{QualificationFamily, QualificationId, QualificationLevel};
use crate::eligibility::rules::{
    ExclusionRule, ListRule, OneOfRule, PairRule, QualificationRule, ThresholdRule,
};

const PURE_UNITS: [&str; 4] = ["WMA11", "WMA12", "WMA13", "WMA14"];

/// A subject whose awards are plain unit lists. The A level takes every unit.
struct ListSubject {
    key: &'static str,
    name: &'static str,
    units: &'static [(&'static str, &'static str)],
    /// Exam code of the AS award; `None` marks a linear subject.
    as_level: Option<&'static str>,
    as_units: &'static [&'static str],
    a_level: &'static str,
}

const LIST_SUBJECTS: &[ListSubject] = &[
    ListSubject {
        key: "ACCOUNTING",
        name: "Accounting",
        units: &[
            ("WAC11", "Unit 1: The Accounting System and Costing"),
            ("WAC12", "Unit 2: Corporate and Management Accounting"),
        ],
        as_level: Some("XAC11"),
        as_units: &["WAC11"],
        a_level: "YAC11",
    },
    ListSubject {
        key: "ARABIC",
        name: "Arabic",
        units: &[
            ("WAA01", "Unit 1: Understanding and Written Response"),
            ("WAA02", "Unit 2: Research, Writing and Research"),
        ],
        as_level: Some("XAA01"),
        as_units: &["WAA01"],
        a_level: "YAA01",
    },
    ListSubject {
        key: "BIOLOGY",
        name: "Biology",
        units: &[
            ("WBI11", "Unit 1: Molecules, Diet, Transport and Health"),
            ("WBI12", "Unit 2: Cells, Development, Biodiversity and Conservation"),
            ("WBI13", "Unit 3: Practical Skills in Biology I"),
            ("WBI14", "Unit 4: Energy, Environment, Microbiology and Immunity"),
            (
                "WBI15",
                "Unit 5: Respiration, Internal Environment, Coordination and Gene Technology",
            ),
            ("WBI16", "Unit 6: Practical Skills in Biology II"),
        ],
        as_level: Some("XBI11"),
        as_units: &["WBI11", "WBI12", "WBI13"],
        a_level: "YBI11",
    },
    ListSubject {
        key: "BUSINESS",
        name: "Business",
        units: &[
            ("WBS11", "Unit 1: Marketing and people"),
            ("WBS12", "Unit 2: Managing business activities"),
            ("WBS13", "Unit 3: Business decisions and strategy"),
            ("WBS14", "Unit 4: Global business"),
        ],
        as_level: Some("XBS11"),
        as_units: &["WBS11", "WBS12"],
        a_level: "YBS11",
    },
    ListSubject {
        key: "CHEMISTRY",
        name: "Chemistry",
        units: &[
            ("WCH11", "Unit 1: Structure, Bonding and Introduction to Organic Chemistry"),
            ("WCH12", "Unit 2: Energetics, Group Chemistry, Halogenoalkanes and Alcohols"),
            ("WCH13", "Unit 3: Practical Skills in Chemistry I"),
            ("WCH14", "Unit 4: Rates, Equilibria and Further Organic Chemistry"),
            ("WCH15", "Unit 5: Transition Metals and Organic Nitrogen Chemistry"),
            ("WCH16", "Unit 6: Practical Skills in Chemistry II"),
        ],
        as_level: Some("XCH11"),
        as_units: &["WCH11", "WCH12", "WCH13"],
        a_level: "YCH11",
    },
    ListSubject {
        key: "ECONOMICS",
        name: "Economics",
        units: &[
            ("WEC11", "Unit 1: Markets in Action"),
            ("WEC12", "Unit 2: Macroeconomic Performance and Policy"),
            ("WEC13", "Unit 3: Business Behaviour"),
            ("WEC14", "Unit 4: Developments in the Global Economy"),
        ],
        as_level: Some("XEC11"),
        as_units: &["WEC11", "WEC12"],
        a_level: "YEC11",
    },
    ListSubject {
        key: "ENGLISH_LANGUAGE",
        name: "English Language",
        units: &[
            ("WEN01", "Unit 1: Language: Context and Identity"),
            ("WEN02", "Unit 2: Language in Transition"),
            ("WEN03", "Unit 3: Crafting Language (Writing)"),
            ("WEN04", "Unit 4: Investigating Language"),
        ],
        as_level: Some("XEN01"),
        as_units: &["WEN01", "WEN02"],
        a_level: "YEN01",
    },
    ListSubject {
        key: "ENGLISH_LITERATURE",
        name: "English Literature",
        units: &[
            ("WET01", "Unit 1: Post-2000 Poetry and Prose"),
            ("WET02", "Unit 2: Drama"),
            ("WET03", "Unit 3: Poetry and Prose"),
            ("WET04", "Unit 4: Shakespeare and Pre-1900 Poetry"),
        ],
        as_level: Some("XET01"),
        as_units: &["WET01", "WET02"],
        a_level: "YET01",
    },
    ListSubject {
        key: "FRENCH",
        name: "French",
        units: &[
            ("WFR01", "Unit 1: Spoken Expression and Response"),
            ("WFR02", "Unit 2: Understanding and Written Response"),
            ("WFR03", "Unit 3: Understanding and Spoken Response"),
            ("WFR04", "Unit 4: Research, Understanding and Written Response"),
        ],
        as_level: Some("XFR01"),
        as_units: &["WFR01", "WFR02"],
        a_level: "YFR01",
    },
    ListSubject {
        key: "GEOGRAPHY",
        name: "Geography",
        units: &[
            ("WGE01", "Unit 1: Global Challenges"),
            ("WGE02", "Unit 2: Geographical Investigations"),
            ("WGE03", "Unit 3: Contested Planet"),
            ("WGE04", "Unit 4: Researching Geography"),
        ],
        as_level: Some("XGE01"),
        as_units: &["WGE01", "WGE02"],
        a_level: "YGE01",
    },
    ListSubject {
        key: "GERMAN",
        name: "German",
        units: &[
            ("WGN01", "Unit 1: Spoken Expression and Response"),
            ("WGN02", "Unit 2: Understanding and Written Response"),
            ("WGN03", "Unit 3: Understanding and Spoken Response"),
            ("WGN04", "Unit 4: Research, Understanding and Written Response"),
        ],
        as_level: Some("XGN01"),
        as_units: &["WGN01", "WGN02"],
        a_level: "YGN01",
    },
    ListSubject {
        key: "GREEK",
        name: "Greek",
        units: &[
            ("WGK01", "Unit 1: Understanding and Written Response"),
            ("WGK02", "Unit 2: Writing and Research"),
        ],
        as_level: Some("XGK01"),
        as_units: &["WGK01"],
        a_level: "YGK01",
    },
    ListSubject {
        key: "HISTORY",
        name: "History",
        units: &[
            ("WHI01", "Unit 1: Historical Themes"),
            ("WHI02", "Unit 2: Historical Investigation"),
            ("WHI03", "Unit 3: Thematic Study with Source Evaluation"),
            ("WHI04", "Unit 4: Historical Research"),
        ],
        as_level: Some("XHI01"),
        as_units: &["WHI01", "WHI02"],
        a_level: "YHI01",
    },
    ListSubject {
        key: "IT",
        name: "Information Technology",
        units: &[
            ("WIT11", "Unit 1: Information, Systems and Applications"),
            ("WIT12", "Unit 2: Understanding the Tools and Techniques of IT"),
            ("WIT13", "Unit 3: Using Technology in Business and Industry"),
            ("WIT14", "Unit 4: Relational Database Project"),
        ],
        as_level: Some("XIT11"),
        as_units: &["WIT11", "WIT12"],
        a_level: "YIT11",
    },
    ListSubject {
        key: "LAW",
        name: "Law",
        units: &[("WLA11", "Law Paper 1"), ("WLA12", "Law Paper 2")],
        as_level: None,
        as_units: &[],
        a_level: "YLA11",
    },
];

const LATE_LIST_SUBJECTS: &[ListSubject] = &[
    ListSubject {
        key: "PHYSICS",
        name: "Physics",
        units: &[
            ("WPH11", "Unit 1: Mechanics and Materials"),
            ("WPH12", "Unit 2: Waves and Electricity"),
            ("WPH13", "Unit 3: Practical Skills in Physics I"),
            ("WPH14", "Unit 4: Further Mechanics, Fields and Particles"),
            ("WPH15", "Unit 5: Thermodynamics, Radiation, Oscillations and Cosmology"),
            ("WPH16", "Unit 6: Practical Skills in Physics II"),
        ],
        as_level: Some("XPH11"),
        as_units: &["WPH11", "WPH12", "WPH13"],
        a_level: "YPH11",
    },
    ListSubject {
        key: "PSYCHOLOGY",
        name: "Psychology",
        units: &[
            ("WPS01", "Unit 1: Social and Cognitive Psychology"),
            ("WPS02", "Unit 2: Biological Psychology, Learning Theories and Development"),
            ("WPS03", "Unit 3: Applications of Psychology"),
            ("WPS04", "Unit 4: Clinical Psychology and Psychological Skills"),
        ],
        as_level: Some("XPS01"),
        as_units: &["WPS01", "WPS02"],
        a_level: "YPS01",
    },
    ListSubject {
        key: "SPANISH",
        name: "Spanish",
        units: &[
            ("WSP01", "Unit 1: Spoken Expression and Response"),
            ("WSP02", "Unit 2: Understanding and Written Response"),
            ("WSP03", "Unit 3: Understanding and Spoken Response"),
            ("WSP04", "Unit 4: Research, Understanding and Written Response"),
        ],
        as_level: Some("XSP01"),
        as_units: &["WSP01", "WSP02"],
        a_level: "YSP01",
    },
];

pub(super) fn catalog() -> QualificationCatalog {
    let mut subjects = Vec::new();
    let mut qualifications = Vec::new();

    for entry in LIST_SUBJECTS {
        push_list_subject(entry, &mut subjects, &mut qualifications);
    }
    push_mathematics(&mut subjects, &mut qualifications);
    for entry in LATE_LIST_SUBJECTS {
        push_list_subject(entry, &mut subjects, &mut qualifications);
    }

    QualificationCatalog {
        online_variant_marker: DEFAULT_ONLINE_VARIANT_MARKER,
        pure_units: PURE_UNITS.iter().map(|code| code.to_string()).collect::<BTreeSet<_>>(),
        subjects,
        qualifications,
    }
}

fn push_list_subject(
    entry: &ListSubject,
    subjects: &mut Vec<Subject>,
    qualifications: &mut Vec<Qualification>,
) {
    let linear = entry.as_level.is_none();
    subjects.push(Subject {
        key: entry.key.to_string(),
        name: entry.name.to_string(),
        units: units(entry.units),
        family: None,
        linear_papers: linear.then_some(entry.units.len()),
        note: linear.then(|| {
            format!(
                "{} is a linear qualification with no AS Level available",
                entry.name
            )
        }),
    });

    if let Some(exam_code) = entry.as_level {
        qualifications.push(Qualification {
            id: QualificationId::new(exam_code),
            subject: entry.key.to_string(),
            display_name: format!("IAS {}", entry.name),
            exam_code: exam_code.to_string(),
            level: QualificationLevel::As,
            family: None,
            rule: QualificationRule::SimpleList(ListRule {
                units: codes(entry.as_units),
            }),
        });
    }

    let all_units: Vec<String> = entry.units.iter().map(|(code, _)| code.to_string()).collect();
    qualifications.push(Qualification {
        id: QualificationId::new(entry.a_level),
        subject: entry.key.to_string(),
        display_name: format!("IAL {}", entry.name),
        exam_code: entry.a_level.to_string(),
        level: QualificationLevel::A,
        family: None,
        rule: QualificationRule::SimpleList(ListRule { units: all_units }),
    });
}

fn push_mathematics(subjects: &mut Vec<Subject>, qualifications: &mut Vec<Qualification>) {
    subjects.push(Subject {
        key: "MATHEMATICS".to_string(),
        name: "Mathematics".to_string(),
        units: units(&[
            ("WMA11", "Pure Mathematics P1"),
            ("WMA12", "Pure Mathematics P2"),
            ("WMA13", "Pure Mathematics P3"),
            ("WMA14", "Pure Mathematics P4"),
            ("WME01", "Mechanics M1"),
            ("WME02", "Mechanics M2"),
            ("WST01", "Statistics S1"),
            ("WST02", "Statistics S2"),
            ("WDM11", "Decision Mathematics D1"),
        ]),
        family: Some(QualificationFamily::Mathematics),
        linear_papers: None,
        note: None,
    });
    subjects.push(Subject {
        key: "FURTHER_MATHEMATICS".to_string(),
        name: "Further Mathematics".to_string(),
        units: units(&[
            ("WFM01", "Further Pure Mathematics F1"),
            ("WFM02", "Further Pure Mathematics F2"),
            ("WFM03", "Further Pure Mathematics F3"),
            ("WME01", "Mechanics M1"),
            ("WME02", "Mechanics M2"),
            ("WME03", "Mechanics M3"),
            ("WST01", "Statistics S1"),
            ("WST02", "Statistics S2"),
            ("WST03", "Statistics S3"),
            ("WDM11", "Decision Mathematics D1"),
        ]),
        family: Some(QualificationFamily::FurtherMathematics),
        linear_papers: None,
        note: None,
    });
    subjects.push(Subject {
        key: "PURE_MATHEMATICS".to_string(),
        name: "Pure Mathematics".to_string(),
        units: units(&[
            ("WMA11", "Pure Mathematics P1"),
            ("WMA12", "Pure Mathematics P2"),
            ("WMA13", "Pure Mathematics P3"),
            ("WMA14", "Pure Mathematics P4"),
            ("WFM01", "Further Pure Mathematics F1"),
            ("WFM02", "Further Pure Mathematics F2"),
            ("WFM03", "Further Pure Mathematics F3"),
        ]),
        family: Some(QualificationFamily::PureMathematics),
        linear_papers: None,
        note: None,
    });

    let maths = |id: &str,
                 name: &str,
                 level: QualificationLevel,
                 family: QualificationFamily,
                 rule: QualificationRule| Qualification {
        id: QualificationId::new(id),
        subject: match family {
            QualificationFamily::Mathematics => "MATHEMATICS",
            QualificationFamily::FurtherMathematics => "FURTHER_MATHEMATICS",
            QualificationFamily::PureMathematics => "PURE_MATHEMATICS",
        }
        .to_string(),
        display_name: name.to_string(),
        exam_code: id.to_string(),
        level,
        family: Some(family),
        rule,
    };

    qualifications.extend([
        maths(
            "XMA01",
            "IAS Mathematics",
            QualificationLevel::As,
            QualificationFamily::Mathematics,
            QualificationRule::RequiredPlusOneOf(OneOfRule {
                required: codes(&["WMA11", "WMA12"]),
                one_of: codes(&["WME01", "WST01", "WDM11"]),
            }),
        ),
        maths(
            "YMA01",
            "IAL Mathematics",
            QualificationLevel::A,
            QualificationFamily::Mathematics,
            QualificationRule::RequiredPlusPair(PairRule {
                required: codes(&PURE_UNITS),
                pairs: pairs(&[
                    ("WST01", "WST02"),
                    ("WME01", "WME02"),
                    ("WST01", "WME01"),
                    ("WST01", "WDM11"),
                    ("WME01", "WDM11"),
                ]),
            }),
        ),
        maths(
            "XFM01",
            "IAS Further Mathematics",
            QualificationLevel::As,
            QualificationFamily::FurtherMathematics,
            QualificationRule::RequiredPlusExcludingMinCount(ExclusionRule {
                required: "WFM01".to_string(),
                excluding: codes(&PURE_UNITS),
                min_units: 3,
            }),
        ),
        maths(
            "YFM01",
            "IAL Further Mathematics",
            QualificationLevel::A,
            QualificationFamily::FurtherMathematics,
            QualificationRule::RequiredAtLeastOnePlusExcludingMinCount(ThresholdRule {
                required: codes(&["WFM01"]),
                at_least_one_of: codes(&["WFM02", "WFM03"]),
                excluding: codes(&PURE_UNITS),
                min_units: 6,
            }),
        ),
        maths(
            "XPM01",
            "IAS Pure Mathematics",
            QualificationLevel::As,
            QualificationFamily::PureMathematics,
            QualificationRule::SimpleList(ListRule {
                units: codes(&["WMA11", "WMA12", "WFM01"]),
            }),
        ),
        maths(
            "YPM01",
            "IAL Pure Mathematics",
            QualificationLevel::A,
            QualificationFamily::PureMathematics,
            QualificationRule::RequiredPlusOneOf(OneOfRule {
                required: codes(&["WMA11", "WMA12", "WMA13", "WMA14", "WFM01"]),
                one_of: codes(&["WFM02", "WFM03"]),
            }),
        ),
    ]);
}

fn units(entries: &[(&str, &str)]) -> Vec<Unit> {
    entries
        .iter()
        .map(|(code, name)| Unit {
            code: code.to_string(),
            name: name.to_string(),
            exam_variant_group: None,
        })
        .collect()
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|code| code.to_string()).collect()
}

fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(first, second)| (first.to_string(), second.to_string()))
        .collect()
}
