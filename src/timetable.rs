use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    browser::Navigator,
    error::Error,
    group,
    timetable::models::{Course, Timetable},
    utils,
};

pub mod models;

/// Every semester and group is one of these panels
pub const PANEL: &str = ".v-expansion-panel";
/// Course links, only found on the index
const COURSE_LINK: &str = "a.grupoplan_a";

/// How long to wait for the pages
#[derive(Clone, Copy, Debug)]
pub struct Waits {
    /// Deadline for the panels to show up
    pub timeout: Duration,
    /// Fixed pause after each navigation, for the panels to fill up
    pub settle: Duration,
}

/// A semester panel of the index and the course links it contains
#[derive(Debug, PartialEq)]
pub struct SemesterLinks {
    pub name: String,
    /// Course's name and absolute link to its page
    pub courses: Vec<(String, Option<Url>)>,
}

/// Fetch the timetable of the index page at `url`
///
/// Only the loading of the index itself can leave the timetable empty,
/// everything else is skipped piece by piece.
pub async fn timetable<N: Navigator + ?Sized>(nav: &mut N, url: &Url, waits: Waits) -> Timetable {
    let mut timetable = Timetable::default();

    let semesters = match load(nav, url.as_str(), waits).await {
        Ok(document) => semesters(&document, url),
        Err(e) => {
            warn!("Can't load the index {url}: {e}");
            return timetable;
        }
    };
    debug!("{} semester panels found", semesters.len());

    for semester in semesters {
        info!("Semester: {}", semester.name);
        timetable.semester(&semester.name);
        debug!("{} courses found in '{}'", semester.courses.len(), semester.name);

        for (name, link) in semester.courses {
            info!(
                "Semester: {} | Course: {name} | Link: {}",
                semester.name,
                link.as_ref().map_or("-", Url::as_str)
            );
            let course = timetable.semester(&semester.name).course(&name);

            let Some(link) = link else {
                continue;
            };

            if let Err(e) = course_groups(nav, &link, waits, course).await {
                warn!("Can't extract groups of '{name}': {e}");
            }

            // Back to the course list
            if let Err(e) = back(nav, waits).await {
                warn!("Can't go back to the index: {e}");
            }
        }
    }

    timetable
}

/// Read the semester panels of the index
pub fn semesters(document: &Html, base: &Url) -> Vec<SemesterLinks> {
    let (Ok(sel_panel), Ok(sel_link)) = (Selector::parse(PANEL), Selector::parse(COURSE_LINK))
    else {
        return vec![];
    };

    document
        .select(&sel_panel)
        .filter_map(|panel| {
            let Some(name) = utils::first(panel, ".v-expansion-panel-title").map(utils::text)
            else {
                warn!("Can't find the name of a semester");
                return None;
            };
            if name.is_empty() {
                return None;
            }

            let courses = panel
                .select(&sel_link)
                .map(|link| {
                    let name = utils::text(link);
                    let target = match link.value().attr("href") {
                        Some(href) if !href.is_empty() => base
                            .join(href)
                            .map_err(|source| {
                                let e = Error::Link {
                                    href: href.to_owned(),
                                    source,
                                };
                                warn!("Can't extract groups of '{name}': {e}");
                            })
                            .ok(),
                        _ => {
                            warn!("Can't extract groups of '{name}': course without link");
                            None
                        }
                    };
                    (name, target)
                })
                .collect();

            Some(SemesterLinks { name, courses })
        })
        .collect()
}

/// Open a course page and add its groups to `course`
async fn course_groups<N: Navigator + ?Sized>(
    nav: &mut N,
    link: &Url,
    waits: Waits,
    course: &mut Course,
) -> Result<(), Error> {
    nav.goto(link.as_str()).await?;
    nav.wait_for(PANEL, waits.timeout).await?;
    tokio::time::sleep(waits.settle).await;

    let document = Html::parse_document(&nav.html().await?);
    for group in group::groups(&document) {
        course.insert(group);
    }

    Ok(())
}

/// Open a page and parse it once its panels are there
async fn load<N: Navigator + ?Sized>(nav: &mut N, url: &str, waits: Waits) -> Result<Html, Error> {
    nav.goto(url).await?;
    nav.wait_for(PANEL, waits.timeout).await?;

    Ok(Html::parse_document(&nav.html().await?))
}

/// Go back to the index, the course page has panels too so wait for its links
async fn back<N: Navigator + ?Sized>(nav: &mut N, waits: Waits) -> Result<(), Error> {
    nav.back().await?;
    nav.wait_for(COURSE_LINK, waits.timeout).await?;
    tokio::time::sleep(waits.settle).await;

    Ok(())
}
