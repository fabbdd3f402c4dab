//! Finnish starter pack. Covers the same present-value and EU-comparison
//! families as the English pack with a reduced category table; morphology
//! is a passthrough until a real analyzer is wired in.

use std::collections::HashMap;

use regex::Regex;

use super::{field, prefix_variants, value_compares, vt_differs, vt_matches};
use crate::error::ConfigError;
use crate::model::{MatcherOp, Slot, SlotSource, Template};
use crate::realizer::{LookupRealizer, PassthroughMorphology, RegexRealizer};
use crate::registry::{
    ConjunctionTable, DateVocab, EntityNames, ErrorStrings, NameVariantSource, OrdinalStyle,
    OrdinalTable, Registry,
};

const INDEX_CATEGORIES: &[(&str, &str)] = &[
    ("hicp2015", "yhdenmukaistettu kuluttajahintaindeksi"),
    ("rt1", "kuukausittainen kasvuvauhti"),
    ("rt12", "vuosittainen kasvuvauhti"),
    ("cp-hi00", "'kaikki'"),
    ("cp-hi01", "'ruoka ja alkoholittomat juomat'"),
    ("cp-hi02", "'alkoholijuomat ja tupakka'"),
    ("cp-hi03", "'vaatteet ja jalkineet'"),
    ("cp-hi06", "'terveys'"),
    ("cp-hi07", "'liikenne'"),
    ("cp-hie", "'energia'"),
    ("cp-hif", "'ruoka'"),
];

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AT", "Itävalta"),
    ("BE", "Belgia"),
    ("DE", "Saksa"),
    ("DK", "Tanska"),
    ("EE", "Viro"),
    ("ES", "Espanja"),
    ("FI", "Suomi"),
    ("FR", "Ranska"),
    ("HR", "Kroatia"),
    ("IT", "Italia"),
    ("NL", "Alankomaat"),
    ("NO", "Norja"),
    ("PT", "Portugali"),
    ("SE", "Ruotsi"),
    ("SI", "Slovenia"),
    ("EU27_2020", "Euroopan unioni"),
    ("EA19", "euroalue"),
];

pub fn register(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.register_templates("fi", body_templates()?);
    registry.register_templates("fi-head", headline_templates()?);

    for realizer in slot_realizers()? {
        registry.register_slot_realizer(realizer);
    }

    registry.register_conjunctions(
        "fi",
        ConjunctionTable {
            default_combiner: "ja".to_string(),
            inverse_combiner: "mutta".to_string(),
            subord_clause_start: ", mikä on".to_string(),
            comparator: "kuin".to_string(),
        },
    );

    registry.register_errors(
        "fi",
        ErrorStrings {
            no_messages_for_selection: "<p>Valinnastasi ei osata kirjoittaa uutista.</p>"
                .to_string(),
            general_error: "<p>Jotain meni vikaan. Yritäthän hetken kuluttua uudelleen.</p>"
                .to_string(),
            no_template: "[<i>Haluaisin ilmaista jotain tässä mutten osaa</i>]".to_string(),
        },
    );

    registry.register_date_vocab("fi", date_vocab());

    let countries: HashMap<String, String> = COUNTRY_NAMES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    registry.register_entity_names(
        "fi",
        "C",
        EntityNames {
            full: NameVariantSource::Dictionary(countries.clone()),
            short: NameVariantSource::Dictionary(countries),
            pronoun: NameVariantSource::Options(vec!["maa".to_string()]),
        },
    );

    registry.register_ordinals(
        "fi",
        OrdinalTable {
            small: [
                ("1", "ensimmäinen"),
                ("2", "toinen"),
                ("3", "kolmas"),
                ("4", "neljäs"),
                ("5", "viides"),
                ("6", "kuudes"),
                ("7", "seitsemäs"),
                ("8", "kahdeksas"),
                ("9", "yhdeksäs"),
                ("10", "kymmenes"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            style: OrdinalStyle::TrailingDot,
        },
    );

    registry.register_morphology("fi", Box::new(PassthroughMorphology));

    Ok(())
}

fn body_templates() -> Result<Vec<Template>, ConfigError> {
    let mut templates = Vec::new();

    let plain = vec![
        vt_matches("cphi:.*")?,
        vt_differs(".*:rank.*")?,
        vt_differs(".*:comp_.*")?,
    ];
    templates.extend(prefix_variants(
        "",
        |b| {
            b.slot(field("value_type"))
                .lit("oli")
                .slot(field("value"))
                .slot(SlotSource::Unit)
        },
        &plain,
    ));
    templates.extend(prefix_variants(
        "",
        |b| b.lit("se oli").slot(field("value")).slot(SlotSource::Unit),
        &plain,
    ));

    let base = vec![
        vt_matches("cphi:.*:comp_eu")?,
        vt_differs(".*:rank.*")?,
    ];

    let mut above = base.clone();
    above.push(value_compares(MatcherOp::Gt, 0.0)?);
    templates.extend(prefix_variants(
        "",
        |b| {
            b.slot(field("value_type"))
                .lit("oli")
                .slot(field("value"))
                .slot(SlotSource::Unit)
                .lit("enemmän kuin EU:n keskiarvo")
        },
        &above,
    ));

    let mut below = base.clone();
    below.push(value_compares(MatcherOp::Lt, 0.0)?);
    templates.extend(prefix_variants(
        "",
        |b| {
            b.slot(field("value_type"))
                .lit("oli")
                .slot_with(field("value"), &[("abs", "true")])
                .slot(SlotSource::Unit)
                .lit("vähemmän kuin EU:n keskiarvo")
        },
        &below,
    ));

    Ok(templates)
}

fn headline_templates() -> Result<Vec<Template>, ConfigError> {
    Ok(vec![super::TemplateBuilder::new()
        .slot(field("location"))
        .lit(":")
        .slot(field("value_type"))
        .lit("oli")
        .slot(field("value"))
        .slot(SlotSource::Unit)
        .slot(SlotSource::Time)
        .build(vec![
            vt_matches("cphi:.*")?,
            vt_differs(".*:rank.*")?,
            vt_differs(".*:comp_.*")?,
        ])])
}

fn slot_realizers() -> Result<Vec<Box<dyn crate::realizer::slots::SlotRealizerComponent>>, ConfigError>
{
    const MAYBE_RANK_OR_COMP: &str = ":?(rank|rank_reverse|comp_eu|comp_us)?";

    let mut realizers: Vec<Box<dyn crate::realizer::slots::SlotRealizerComponent>> = Vec::new();

    realizers.push(Box::new(RegexRealizer::new(
        &["fi"],
        Regex::new(&format!(
            "^cphi:([^:]*):([^:]*):(rt12?){}$",
            MAYBE_RANK_OR_COMP
        ))?,
        &["{0} {2} kategoriassa {1}"],
    )));
    realizers.push(Box::new(RegexRealizer::new(
        &["fi"],
        Regex::new(&format!("^cphi:([^:]*):([^:]*){}$", MAYBE_RANK_OR_COMP))?,
        &["{0} kategoriassa {1}"],
    )));

    realizers.push(Box::new(LookupRealizer::new(&["fi"], INDEX_CATEGORIES)));

    realizers.push(Box::new(
        RegexRealizer::new(
            &["fi"],
            Regex::new(r"^\[UNIT:cphi:.*\]$")?,
            &["prosenttiyksikköä"],
        )
        .with_slot_requirements(is_rate_unit),
    ));
    realizers.push(Box::new(
        RegexRealizer::new(&["fi"], Regex::new(r"^\[UNIT:cphi:.*\]$")?, &["pistettä"])
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
            ("01", "tammikuussa"),
            ("02", "helmikuussa"),
            ("03", "maaliskuussa"),
            ("04", "huhtikuussa"),
            ("05", "toukokuussa"),
            ("06", "kesäkuussa"),
            ("07", "heinäkuussa"),
            ("08", "elokuussa"),
            ("09", "syyskuussa"),
            ("10", "lokakuussa"),
            ("11", "marraskuussa"),
            ("12", "joulukuussa"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
        month_reference_options: vec!["samassa kuussa".to_string()],
        year_reference_options: vec!["samana vuonna".to_string()],
        month_expression: "{month}".to_string(),
        month_year_expression: "{month} {year}".to_string(),
        year_expression: "vuonna {year}".to_string(),
        attach_attributes: Some(
            [
                ("month".to_string(), vec![0usize]),
                ("year".to_string(), vec![0usize]),
            ]
            .into_iter()
            .collect(),
        ),
    }
}
