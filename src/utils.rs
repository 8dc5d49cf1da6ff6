use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::utils::models::{Major, Term};

pub mod models;

/// Get the URL of the schedule index of a major
pub fn get_url(major: Major, term: Term) -> String {
    format!(
        "https://www.fciencias.unam.mx/docencia/horarios/indiceplan/{}/{}",
        term.code(),
        major.plan()
    )
}

/// Where the schedule is written when no file is given,
/// each major other than the default one gets its own file
pub fn get_output(major: Major, term: Term) -> PathBuf {
    if major == Major::default() {
        PathBuf::from(format!("./src/data/horario_{term}.json"))
    } else {
        PathBuf::from(format!("./src/data/horario_{term}_{}.json", major.name()))
    }
}

pub trait Capitalize {
    /// Capitalize string, lowering everything after the first letter
    fn capitalize(&self) -> String;
}

impl Capitalize for str {
    fn capitalize(&self) -> String {
        let mut chars = self.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

/// Text of an element with its whitespace collapsed
pub fn text(element: ElementRef) -> String {
    collapse(&element.text().collect::<String>())
}

/// Collapse every run of whitespace into one space and trim
pub fn collapse(data: &str) -> String {
    data.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First element under `element` matching `css`
pub fn first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next()
}

/// Every element under `element` matching `css`
pub fn all<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => vec![],
    }
}

/// First element under `element` with a text node of its own holding one of `needles`
pub fn first_owning<'a>(element: ElementRef<'a>, needles: &[&str]) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|candidate| {
            candidate
                .children()
                .filter_map(|node| node.value().as_text())
                .any(|own| needles.iter().any(|needle| own.contains(needle)))
        })
}

/// Space the dash of a time range, i.e.: `7:00-8:30` => `7:00 - 8:30`
pub fn normalize_hours(hours: &str) -> String {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d)\s*-\s*(\d)").expect("hardcoded regex"));

    RE.replace_all(hours, "$1 - $2").into_owned()
}

/// First run of digits in a string
pub fn digits(data: &str) -> Option<&str> {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("hardcoded regex"));

    RE.find(data).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn url_and_output() {
        let term = Term::default();
        assert_eq!(
            get_url(Major::default(), term),
            "https://www.fciencias.unam.mx/docencia/horarios/indiceplan/20261/1556"
        );
        assert_eq!(
            get_output(Major::default(), term),
            PathBuf::from("./src/data/horario_2026-1.json")
        );
        assert_eq!(
            get_output(Major::Matematicas, term),
            PathBuf::from("./src/data/horario_2026-1_matematicas.json")
        );
        assert_ne!(
            get_output(Major::Fisica, term),
            get_output(Major::FisicaBiomedica, term)
        );
    }

    #[test]
    fn capitalize() {
        assert_eq!("PRESENCIAL".capitalize(), "Presencial");
        assert_eq!("híbrida".capitalize(), "Híbrida");
        assert_eq!("".capitalize(), "");
    }

    #[test]
    fn hours() {
        assert_eq!(normalize_hours("7:00-8:30"), "7:00 - 8:30");
        assert_eq!(normalize_hours("16:00   -17:00"), "16:00 - 17:00");
        assert_eq!(normalize_hours("7:00 - 8:30"), "7:00 - 8:30");
    }

    #[test]
    fn digits_only() {
        assert_eq!(digits("Grupo 4000"), Some("4000"));
        assert_eq!(digits("sin número"), None);
    }

    #[test]
    fn own_text_lookup() {
        let html = Html::parse_fragment(
            "<div><p>Horario <b>Salón</b></p><span>Salón O134, edificio</span></div>",
        );
        let root = html.root_element();

        let found = first_owning(root, &["O134", "Yelizcalli"]).unwrap();
        assert_eq!(text(found), "Salón O134, edificio");

        // `Salón` only lives in the <b>, not in the <p> text nodes
        let bold = first_owning(root, &["Salón"]).unwrap();
        assert_eq!(bold.value().name(), "b");
    }
}
