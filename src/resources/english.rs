//! English pack for the consumer price index dataset: templates, slot
//! realizer components, and vocabulary tables.

use std::collections::HashMap;

use regex::Regex;

use super::{field, prefix_variants, value_compares, vt_differs, vt_matches, TemplateBuilder};
use crate::error::ConfigError;
use crate::model::{MatcherOp, Slot, SlotSource, Template};
use crate::realizer::{EnglishMorphology, LookupRealizer, RegexRealizer};
use crate::registry::{
    ConjunctionTable, DateVocab, EntityNames, ErrorStrings, NameVariantSource, OrdinalStyle,
    OrdinalTable, Registry,
};

/// Human-readable names for the index and category codes appearing in
/// value types.
const INDEX_CATEGORIES: &[(&str, &str)] = &[
    ("hicp2015", "harmonized consumer price index"),
    ("rt1", "monthly growth rate"),
    ("rt12", "yearly growth rate"),
    ("cp-hi00", "'all items'"),
    ("cp-hi01", "'food and non-alcoholic beverages'"),
    ("cp-hi02", "'alcoholic beverages and tobacco'"),
    ("cp-hi03", "'clothing and footwear'"),
    ("cp-hi04", "'housing, water, electricity, gas and other fuels'"),
    ("cp-hi05", "'furnishings, household equipment and maintenance'"),
    ("cp-hi06", "'health'"),
    ("cp-hi07", "'transport'"),
    ("cp-hi08", "'communication'"),
    ("cp-hi09", "'recreation and culture'"),
    ("cp-hi10", "'education'"),
    ("cp-hi11", "'hotels, cafes and restaurants'"),
    ("cp-hi12", "'miscellaneous goods and services'"),
    ("cp-hi00xef", "'all items excluding energy, food, alcohol and tobacco'"),
    ("cp-hi00xtb", "'all items excluding tobacco'"),
    ("cp-hie", "'energy'"),
    ("cp-hif", "'food'"),
    ("cp-hifu", "'unprocessed food'"),
    ("cp-hig", "'total goods'"),
    ("cp-hiig", "'industrial goods'"),
    ("cp-his", "'total services'"),
    ("cp-hiigxe", "'non-energy industrial goods'"),
    ("cp-hi00xe", "'all items excluding energy'"),
    ("cp-hi00xefu", "'all items excluding energy and unprocessed food'"),
    ("cp-hi00xes", "'all items excluding energy and seasonal food'"),
];

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("HR", "Croatia"),
    ("IT", "Italy"),
    ("NL", "the Netherlands"),
    ("NO", "Norway"),
    ("PT", "Portugal"),
    ("SE", "Sweden"),
    ("SI", "Slovenia"),
    ("EU27_2020", "the European Union"),
    ("EA19", "the euro area"),
];

pub fn register(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register_templates("en", body_templates()?);
    registry.register_templates("en-head", headline_templates()?);

    for realizer in slot_realizers()? {
        registry.register_slot_realizer(realizer);
    }

    registry.register_conjunctions(
        "en",
        ConjunctionTable {
            default_combiner: "and".to_string(),
            inverse_combiner: "but".to_string(),
            subord_clause_start: ", which is".to_string(),
            comparator: "than".to_string(),
        },
    );

    registry.register_errors(
        "en",
        ErrorStrings {
            no_messages_for_selection: "<p>We are unable to write an article on your selection.</p>"
                .to_string(),
            general_error: "<p>Something went wrong. Please try again later.</p>".to_string(),
            no_template: "[<i>I don't know how to express my thoughts here</i>]".to_string(),
        },
    );

    registry.register_date_vocab("en", date_vocab());

    let countries: HashMap<String, String> = COUNTRY_NAMES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    registry.register_entity_names(
        "en",
        "C",
        EntityNames {
            full: NameVariantSource::Dictionary(countries.clone()),
            short: NameVariantSource::Dictionary(countries),
            pronoun: NameVariantSource::Options(vec!["the country".to_string()]),
        },
    );

    registry.register_ordinals(
        "en",
        OrdinalTable {
            small: [
                ("2", "second"),
                ("3", "third"),
                ("4", "fourth"),
                ("5", "fifth"),
                ("6", "sixth"),
                ("7", "seventh"),
                ("8", "eighth"),
                ("9", "ninth"),
                ("10", "tenth"),
                ("11", "eleventh"),
                ("12", "twelfth"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            style: OrdinalStyle::EnglishSuffix,
        },
    );

    registry.register_morphology("en", Box::new(EnglishMorphology));

    Ok(())
}

fn body_templates() -> Result<Vec<Template>, ConfigError> {
    let mut templates = Vec::new();

    // Present value
    let plain = vec![
        vt_matches("cphi:.*")?,
        vt_differs(".*:rank.*")?,
        vt_differs(".*:comp_.*")?,
    ];
    templates.extend(prefix_variants(
        "in",
        |b| {
            b.lit("the")
                .slot(field("value_type"))
                .lit("was")
                .slot(field("value"))
                .slot(SlotSource::Unit)
        },
        &plain,
    ));
    templates.extend(prefix_variants(
        "in",
        |b| b.lit("it was").slot(field("value")).slot(SlotSource::Unit),
        &plain,
    ));

    // Comparisons against the EU average and the US
    for (suffix, reference) in [("comp_eu", "the EU average"), ("comp_us", "in US")] {
        let base = vec![
            vt_matches(&format!("cphi:.*:{}", suffix))?,
            vt_differs(".*:rank.*")?,
        ];

        let mut above = base.clone();
        above.push(value_compares(MatcherOp::Gt, 0.0)?);
        templates.extend(prefix_variants(
            "in",
            |b| {
                b.lit("the")
                    .slot(field("value_type"))
                    .lit("was")
                    .slot(field("value"))
                    .slot(SlotSource::Unit)
                    .lit("more than")
                    .lit(reference)
            },
            &above,
        ));
        templates.extend(prefix_variants(
            "in",
            |b| {
                b.lit("it was")
                    .slot(field("value"))
                    .slot(SlotSource::Unit)
                    .lit("more than")
                    .lit(reference)
            },
            &above,
        ));

        let mut below = base.clone();
        below.push(value_compares(MatcherOp::Lt, 0.0)?);
        templates.extend(prefix_variants(
            "in",
            |b| {
                b.lit("the")
                    .slot(field("value_type"))
                    .lit("was")
                    .slot_with(field("value"), &[("abs", "true")])
                    .slot(SlotSource::Unit)
                    .lit("less than")
                    .lit(reference)
            },
            &below,
        ));
        templates.extend(prefix_variants(
            "in",
            |b| {
                b.lit("it was")
                    .slot_with(field("value"), &[("abs", "true")])
                    .slot(SlotSource::Unit)
                    .lit("less than")
                    .lit(reference)
            },
            &below,
        ));

        let mut level = base.clone();
        level.push(value_compares(MatcherOp::Eq, 0.0)?);
        templates.extend(prefix_variants(
            "in",
            |b| {
                b.lit("the")
                    .slot(field("value_type"))
                    .lit("was the same as")
                    .lit(reference)
            },
            &level,
        ));
        templates.extend(prefix_variants(
            "in",
            |b| b.lit("it was the same as").lit(reference),
            &level,
        ));
    }

    // Rankings
    let rank = vec![
        vt_matches("cphi:.*:rank.*")?,
        vt_differs(".*rank_reverse.*")?,
    ];
    templates.extend(rank_templates("highest", &rank)?);

    let rank_reverse = vec![vt_matches("cphi:.*:rank_reverse.*")?];
    templates.extend(rank_templates("lowest", &rank_reverse)?);

    Ok(templates)
}

fn rank_templates(
    direction: &str,
    matchers: &[crate::model::Matcher],
) -> Result<Vec<Template>, ConfigError> {
    let mut templates = Vec::new();
    for with_time in [true, false] {
        let mut builder = TemplateBuilder::new();
        if with_time {
            builder = builder.lit("in").slot(SlotSource::Time).lit(",");
        }
        templates.push(
            builder
                .slot(field("location"))
                .lit("had the")
                .slot_with(field("value"), &[("ord", "true")])
                .lit(direction)
                .slot(field("value_type"))
                .lit("across the observed countries")
                .build(matchers.to_vec()),
        );
    }
    Ok(templates)
}

fn headline_templates() -> Result<Vec<Template>, ConfigError> {
    let mut templates = Vec::new();

    templates.push(
        TemplateBuilder::new()
            .lit("in")
            .slot(field("location"))
            .lit(", in")
            .slot(SlotSource::Time)
            .lit(", the")
            .slot(field("value_type"))
            .lit("was")
            .slot(field("value"))
            .slot(SlotSource::Unit)
            .build(vec![
                vt_matches("cphi:.*")?,
                vt_differs(".*:rank.*")?,
                vt_differs(".*:comp_.*")?,
            ]),
    );

    for (suffix, phrase) in [
        ("comp_eu", "over EU average"),
        ("comp_us", "over US"),
    ] {
        templates.push(
            TemplateBuilder::new()
                .lit("in")
                .slot(field("location"))
                .lit(", in")
                .slot(SlotSource::Time)
                .lit(", the")
                .slot(field("value_type"))
                .lit("was")
                .slot(field("value"))
                .slot(SlotSource::Unit)
                .lit(phrase)
                .build(vec![
                    vt_matches(&format!("cphi:.*:{}", suffix))?,
                    vt_differs(".*:rank.*")?,
                    value_compares(MatcherOp::Gt, 0.0)?,
                ]),
        );
        templates.push(
            TemplateBuilder::new()
                .lit("in")
                .slot(field("location"))
                .lit(", in")
                .slot(SlotSource::Time)
                .lit(", the")
                .slot(field("value_type"))
                .lit("at")
                .slot_with(field("value"), &[("abs", "true")])
                .slot(SlotSource::Unit)
                .lit(&format!("below {}", phrase.trim_start_matches("over ")))
                .build(vec![
                    vt_matches(&format!("cphi:.*:{}", suffix))?,
                    vt_differs(".*:rank.*")?,
                    value_compares(MatcherOp::Le, 0.0)?,
                ]),
        );
    }

    templates.push(
        TemplateBuilder::new()
            .lit("in")
            .slot(SlotSource::Time)
            .lit(",")
            .slot_with(field("location"), &[("case", "gen")])
            .slot_with(field("value"), &[("ord", "true")])
            .slot(field("value_type"))
            .lit("highest")
            .build(vec![
                vt_matches("cphi:.*:rank.*")?,
                vt_differs(".*rank_reverse.*")?,
            ]),
    );
    templates.push(
        TemplateBuilder::new()
            .lit("in")
            .slot(SlotSource::Time)
            .lit(",")
            .slot_with(field("location"), &[("case", "gen")])
            .slot_with(field("value"), &[("ord", "true")])
            .slot(field("value_type"))
            .lit("lowest")
            .build(vec![vt_matches("cphi:.*:rank_reverse.*")?]),
    );

    Ok(templates)
}

fn slot_realizers() -> Result<Vec<Box<dyn crate::realizer::slots::SlotRealizerComponent>>, ConfigError>
{
    const MAYBE_RANK_OR_COMP: &str = ":?(rank|rank_reverse|comp_eu|comp_us)?";

    let mut realizers: Vec<Box<dyn crate::realizer::slots::SlotRealizerComponent>> = Vec::new();

    // Change rates mention the rate of the index; plain values mention the
    // index itself. Both expose the category key for the lookup below.
    realizers.push(Box::new(RegexRealizer::new(
        &["en"],
        Regex::new(&format!(
            "^cphi:([^:]*):([^:]*):(rt12?){}$",
            MAYBE_RANK_OR_COMP
        ))?,
        &["{2} of the {0} for the category {1}"],
    )));
    realizers.push(Box::new(RegexRealizer::new(
        &["en"],
        Regex::new(&format!("^cphi:([^:]*):([^:]*){}$", MAYBE_RANK_OR_COMP))?,
        &["{0} for the category {1}"],
    )));

    realizers.push(Box::new(LookupRealizer::new(&["en"], INDEX_CATEGORIES)));

    // Growth rates are percentage points; index levels are plain points.
    realizers.push(Box::new(
        RegexRealizer::new(
            &["en"],
            Regex::new(r"^\[UNIT:cphi:.*\]$")?,
            &["percentage points"],
        )
        .with_slot_requirements(is_rate_unit),
    ));
    realizers.push(Box::new(
        RegexRealizer::new(&["en"], Regex::new(r"^\[UNIT:cphi:.*\]$")?, &["points"])
            .with_slot_requirements(is_level_unit),
    ));

    Ok(realizers)
}

fn is_rate_unit(slot: &Slot) -> bool {
    let value = slot.value();
    let segments: Vec<&str> = value
        .trim_matches(|c| c == '[' || c == ']')
        .split(':')
        .collect();
    segments.contains(&"rt1") || segments.contains(&"rt12")
}

fn is_level_unit(slot: &Slot) -> bool {
    !is_rate_unit(slot)
}

fn date_vocab() -> DateVocab {
    DateVocab {
        months: [
            ("01", "January"),
            ("02", "February"),
            ("03", "March"),
            ("04", "April"),
            ("05", "May"),
            ("06", "June"),
            ("07", "July"),
            ("08", "August"),
            ("09", "September"),
            ("10", "October"),
            ("11", "November"),
            ("12", "December"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
        month_reference_options: vec!["the same month".to_string()],
        year_reference_options: vec!["the same year".to_string()],
        month_expression: "{month}".to_string(),
        month_year_expression: "{month} {year}".to_string(),
        year_expression: "{year}".to_string(),
        attach_attributes: None,
    }
}
