use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::{
    timetable::models::{Assistant, Group, Professor, Schedule},
    utils::{self, Capitalize},
};

const TITLE: &str = ".v-expansion-panel-title";

// Column layout of a professor/assistant row
const ROW: &str = "div.v-row.my-1";
const NAME_COL: &str = ".v-col-sm-4.v-col-md-4.v-col-lg-4.v-col-12";
const HOURS_CHIP: &str = ".v-col-sm-5.v-col-md-3.v-col-lg-4.v-col-auto.my-1.py-0 .v-chip__content";
const DAYS_COL: &str = ".v-col-sm-12.v-col-md-5.v-col-lg-4.v-col-auto.my-1.py-0";
/// Days the group meets are highlighted with this class
const ACTIVE_DAY: &str = "bg-blue-lighten-2";

const ROOM_HINTS: [&str; 4] = ["Yelizcalli", "O134", "salón", "Salón"];
const NOTE_HINTS: [&str; 2] = ["Nota", "nota"];

/// Extract every group panel of a course page
pub fn groups(document: &Html) -> Vec<Group> {
    let Ok(sel_panel) = Selector::parse(".v-expansion-panel") else {
        return vec![];
    };

    let panels = document.select(&sel_panel).collect::<Vec<_>>();
    debug!("{} group panels found", panels.len());

    panels
        .into_iter()
        .filter_map(|panel| {
            // A panel without title isn't a group
            if utils::first(panel, TITLE).is_none() {
                warn!("Can't extract a group: panel without title");
                return None;
            }

            let group = group(panel);
            info!(
                "Group: {} | Professor: {} | Modality: {}",
                group.number,
                group.professor.name.as_deref().unwrap_or("-"),
                group.modality.as_deref().unwrap_or("-")
            );
            Some(group)
        })
        .collect()
}

/// Extract a single group panel, every missing piece is left empty
pub fn group(panel: ElementRef) -> Group {
    let (number, mut modality) = header(panel);

    // The modality can also be found in a chip
    if let Some(chip) = utils::first(panel, ".v-chip__content").map(utils::text) {
        if !chip.is_empty() {
            modality = Some(clean_modality(&chip));
        }
    }

    let rows = utils::all(panel, ROW);
    let professor = rows.first().map(|row| professor(*row)).unwrap_or_default();
    let assistants = rows.iter().skip(1).filter_map(|row| assistant(*row)).collect();

    if number.is_empty() {
        warn!("Group panel without number, recorded under an empty key");
    }

    Group {
        number,
        professor,
        assistants,
        note: utils::first_owning(panel, &NOTE_HINTS).map(utils::text),
        room: utils::first_owning(panel, &ROOM_HINTS).map(utils::text),
        modality,
    }
}

/// Group's number and modality from the title spans,
/// i.e.: `Grupo 4000` `65 lugares` `Modalidad presencial`
fn header(panel: ElementRef) -> (String, Option<String>) {
    let mut number = None;
    let mut modality = None;

    for span in utils::all(panel, "span") {
        let data = utils::text(span);
        if let Some(rest) = data.strip_prefix("Grupo") {
            if number.is_none() {
                let rest = rest.trim();
                number = Some(utils::digits(rest).unwrap_or(rest).to_owned());
            }
        } else if data.contains("Modalidad") {
            modality = Some(clean_modality(&data));
        }
    }

    (number.unwrap_or_default(), modality)
}

fn clean_modality(data: &str) -> String {
    data.replace("Modalidad", "").trim().capitalize()
}

fn name(row: ElementRef) -> Option<String> {
    let column = utils::first(row, NAME_COL)?;
    let name = utils::text(utils::first(column, "a.profesor_a")?);

    (!name.is_empty()).then_some(name)
}

fn schedule(row: ElementRef) -> Option<Schedule> {
    let hours = utils::first(row, HOURS_CHIP).map(utils::text)?;

    let days = utils::first(row, DAYS_COL)
        .map(|column| {
            utils::all(column, ".v-avatar")
                .into_iter()
                .filter(|avatar| avatar.value().classes().any(|class| class == ACTIVE_DAY))
                .map(utils::text)
                .filter(|day| !day.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if hours.is_empty() || days.is_empty() {
        return None;
    }

    Some(Schedule {
        hours: utils::normalize_hours(&hours),
        days,
    })
}

fn professor(row: ElementRef) -> Professor {
    Professor {
        name: name(row),
        schedules: schedule(row).into_iter().collect(),
    }
}

fn assistant(row: ElementRef) -> Option<Assistant> {
    Some(Assistant {
        name: name(row),
        schedule: schedule(row)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, hours: &str, days: &[(&str, bool)]) -> String {
        let avatars: String = days
            .iter()
            .map(|(day, active)| {
                let color = if *active { ACTIVE_DAY } else { "bg-grey" };
                format!(r#"<div class="v-avatar {color}">{day}</div>"#)
            })
            .collect();

        format!(
            r#"<div class="v-row my-1">
                <div class="v-col-sm-4 v-col-md-4 v-col-lg-4 v-col-12"><a class="profesor_a" href="/p/1">{name}</a></div>
                <div class="v-col-sm-5 v-col-md-3 v-col-lg-4 v-col-auto my-1 py-0"><span class="v-chip"><div class="v-chip__content">{hours}</div></span></div>
                <div class="v-col-sm-12 v-col-md-5 v-col-lg-4 v-col-auto my-1 py-0">{avatars}</div>
            </div>"#
        )
    }

    fn page(panels: &[String]) -> Html {
        let body: String = panels
            .iter()
            .map(|panel| format!(r#"<div class="v-expansion-panel">{panel}</div>"#))
            .collect();
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    fn title(number: &str, modality: &str) -> String {
        format!(
            r#"<button class="v-expansion-panel-title"><span>Grupo {number}</span> <span>65 lugares</span> <span>Modalidad {modality}</span></button>"#
        )
    }

    #[test]
    fn full_group() {
        let header = r#"<button class="v-expansion-panel-title"><span>Grupo 4000</span> <span>65 lugares</span> <span class="v-chip"><div class="v-chip__content">Modalidad PRESENCIAL</div></span></button>"#;
        let panel = format!(
            "{header}<div class=\"v-expansion-panel-text\">{}{}<p>Salón O134</p><p>Nota: traer laptop</p></div>",
            row("Ana Pérez", "7:00-8:00", &[("Lu", true), ("Ma", false), ("Mi", true)]),
            row("Luis Gómez", "12:00 - 13:00", &[("Vi", true)]),
        );
        let groups = groups(&page(&[panel]));

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.number, "4000");
        assert_eq!(group.professor.name.as_deref(), Some("Ana Pérez"));
        assert_eq!(
            group.professor.schedules,
            vec![Schedule {
                hours: "7:00 - 8:00".to_owned(),
                days: vec!["Lu".to_owned(), "Mi".to_owned()],
            }]
        );
        assert_eq!(group.assistants.len(), 1);
        assert_eq!(group.assistants[0].name.as_deref(), Some("Luis Gómez"));
        assert_eq!(group.room.as_deref(), Some("Salón O134"));
        assert_eq!(group.note.as_deref(), Some("Nota: traer laptop"));
        assert_eq!(group.modality.as_deref(), Some("Presencial"));
    }

    #[test]
    fn modality_from_title_without_chip() {
        let groups = groups(&page(&[title("4001", "EN LÍNEA")]));

        assert_eq!(groups[0].number, "4001");
        assert_eq!(groups[0].modality.as_deref(), Some("En línea"));
        assert!(groups[0].assistants.is_empty());
        assert_eq!(groups[0].professor, Professor::default());
        assert_eq!(groups[0].room, None);
        assert_eq!(groups[0].note, None);
    }

    #[test]
    fn incomplete_rows_are_dropped_or_emptied() {
        let panel = format!(
            "{}{}{}",
            title("4002", "presencial"),
            // Professor without any active day
            row("Ana Pérez", "7:00 - 8:00", &[("Lu", false)]),
            // Assistant without hours
            row("Luis Gómez", "", &[("Vi", true)]),
        );
        let group = &groups(&page(&[panel]))[0];

        assert_eq!(group.professor.name.as_deref(), Some("Ana Pérez"));
        assert!(group.professor.schedules.is_empty());
        assert!(group.assistants.is_empty());

        let value = serde_json::to_value(group).unwrap();
        assert!(value.get("ayudantes").is_none());
    }

    #[test]
    fn panel_without_number() {
        let titled = r#"<button class="v-expansion-panel-title"><span>Sin grupo</span></button>"#;
        let groups = groups(&page(&[titled.to_owned()]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].number, "");
    }

    #[test]
    fn panel_without_title_is_skipped() {
        let groups = groups(&page(&[
            title("4000", "presencial"),
            "<span>Grupo 4001</span>".to_owned(),
            "<div>Avisos</div>".to_owned(),
        ]));

        let numbers: Vec<_> = groups.iter().map(|g| g.number.as_str()).collect();
        assert_eq!(numbers, ["4000"]);
    }
}
