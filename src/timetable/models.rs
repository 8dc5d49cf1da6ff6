use serde::{ser::SerializeMap, Serialize, Serializer};

/// One time range and the days it applies to
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Schedule {
    /// Time range, i.e.: `7:00 - 8:30`
    #[serde(rename = "horario")]
    pub hours: String,

    /// Days of the week the range applies to
    #[serde(rename = "dias")]
    pub days: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Professor {
    /// Professor's name
    #[serde(rename = "nombre")]
    pub name: Option<String>,

    /// Professor's schedules, may be empty
    #[serde(rename = "horarios")]
    pub schedules: Vec<Schedule>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assistant {
    /// Assistant's name
    #[serde(rename = "nombre")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub schedule: Schedule,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Group {
    /// Group's number, also used as its key in the course
    #[serde(rename = "grupo")]
    pub number: String,

    #[serde(rename = "profesor")]
    pub professor: Professor,

    /// Teaching assistants, left out of the output when there is none
    #[serde(rename = "ayudantes", skip_serializing_if = "Vec::is_empty")]
    pub assistants: Vec<Assistant>,

    #[serde(rename = "nota")]
    pub note: Option<String>,

    #[serde(rename = "salon")]
    pub room: Option<String>,

    /// Delivery mode, i.e.: `Presencial`
    #[serde(rename = "modalidad")]
    pub modality: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Course {
    /// Course's name
    pub name: String,
    /// Groups in the order they appear on the course's page
    pub groups: Vec<Group>,
}

impl Course {
    /// Add a group, replacing the one already using the same number
    pub fn insert(&mut self, group: Group) {
        match self.groups.iter_mut().find(|g| g.number == group.number) {
            Some(old) => *old = group,
            None => self.groups.push(group),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Semester {
    /// Semester's name as shown in its panel title
    pub name: String,
    pub courses: Vec<Course>,
}

impl Semester {
    /// Get the course with this name, creating it if needed
    pub fn course(&mut self, name: &str) -> &mut Course {
        let idx = match self.courses.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.courses.push(Course {
                    name: name.to_owned(),
                    groups: vec![],
                });
                self.courses.len() - 1
            }
        };

        &mut self.courses[idx]
    }
}

/// Whole extracted tree: semester → course → group number → group
#[derive(Debug, Default, PartialEq)]
pub struct Timetable {
    pub semesters: Vec<Semester>,
}

impl Timetable {
    /// Get the semester with this name, creating it if needed
    pub fn semester(&mut self, name: &str) -> &mut Semester {
        let idx = match self.semesters.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.semesters.push(Semester {
                    name: name.to_owned(),
                    courses: vec![],
                });
                self.semesters.len() - 1
            }
        };

        &mut self.semesters[idx]
    }

    /// Number of courses and groups in the tree
    pub fn count(&self) -> (usize, usize) {
        self.semesters
            .iter()
            .flat_map(|semester| &semester.courses)
            .fold((0, 0), |(courses, groups), course| {
                (courses + 1, groups + course.groups.len())
            })
    }
}

// The tree keeps the page order, so it is written as maps by hand
// instead of going through a sorted map.

impl Serialize for Course {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.number, group)?;
        }
        map.end()
    }
}

impl Serialize for Semester {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.courses.len()))?;
        for course in &self.courses {
            map.serialize_entry(&course.name, course)?;
        }
        map.end()
    }
}

impl Serialize for Timetable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.semesters.len()))?;
        for semester in &self.semesters {
            map.serialize_entry(&semester.name, semester)?;
        }
        map.end()
    }
}
