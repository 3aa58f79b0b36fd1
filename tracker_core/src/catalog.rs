//! Exercise catalog lookup across the supported workout sources.
//!
//! A workout is started from exactly one of five catalog shapes, each filing
//! exercises under a category key differently:
//! - machine catalog: flat list, flags on every exercise record
//! - QR-shared template and saved personal template: category → group, flags on the group
//! - default program: day → category → group, flags on the group
//! - flat muscle-group list: a single selected bucket carrying the flags
//!
//! Lookups walk the sources in a fixed precedence and stop at the first match.

use crate::{Exercise, ExerciseFlags, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Category used when no source can classify an exercise
pub const GENERAL_CATEGORY: &str = "General";

/// Exercise reference inside a grouped source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TemplateExercise {
    pub name: String,
}

/// Exercises sharing one category; flags apply to every member
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryGroup {
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    #[serde(flatten)]
    pub flags: ExerciseFlags,
}

impl CategoryGroup {
    fn contains(&self, name: &str) -> bool {
        self.exercises.iter().any(|e| e.name == name)
    }
}

/// Category key to group
pub type CategoryMap = BTreeMap<String, CategoryGroup>;

/// Program keyed by training day; only the selected day is searched
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultProgram {
    pub selected_day: String,
    #[serde(default)]
    pub days: BTreeMap<String, CategoryMap>,
}

/// The single muscle group chosen from the flat list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupBucket {
    pub muscle_group: String,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    #[serde(flatten)]
    pub flags: ExerciseFlags,
}

/// Which source shape resolved an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Machine,
    QrTemplate,
    PersonalTemplate,
    DefaultProgram,
    MuscleGroup,
}

impl SourceKind {
    /// Lookup order shared by classification and aggregation
    pub const PRECEDENCE: [SourceKind; 5] = [
        SourceKind::Machine,
        SourceKind::QrTemplate,
        SourceKind::PersonalTemplate,
        SourceKind::DefaultProgram,
        SourceKind::MuscleGroup,
    ];
}

/// Result of a successful lookup
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub source: SourceKind,
    pub category: String,
    pub flags: ExerciseFlags,
}

/// All catalog sources available to the current workout screen
///
/// Sources are resolved once per screen entry and treated as read-only.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContext {
    #[serde(default)]
    pub machine: Option<Vec<Exercise>>,
    #[serde(default)]
    pub qr_template: Option<CategoryMap>,
    #[serde(default)]
    pub personal_template: Option<CategoryMap>,
    #[serde(default)]
    pub default_program: Option<DefaultProgram>,
    #[serde(default)]
    pub muscle_group: Option<MuscleGroupBucket>,
}

impl CatalogContext {
    /// Load a catalog context from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let context: CatalogContext = serde_json::from_str(&contents)?;
        tracing::info!("Loaded catalog context from {:?}", path);
        Ok(context)
    }

    /// Resolve an exercise by walking the sources in precedence order
    pub fn resolve(&self, name: &str) -> Option<Classification> {
        let found = SourceKind::PRECEDENCE
            .iter()
            .find_map(|kind| self.resolve_in(*kind, name));

        match &found {
            Some(c) => tracing::debug!(
                "Resolved '{}' via {:?} under '{}'",
                name,
                c.source,
                c.category
            ),
            None => tracing::debug!("'{}' not found in any catalog source", name),
        }
        found
    }

    /// Classification flags for an exercise, all-false when unknown
    pub fn flags_for(&self, name: &str) -> ExerciseFlags {
        self.resolve(name).map(|c| c.flags).unwrap_or_default()
    }

    /// Category key for an exercise, if any source files it
    pub fn category_for(&self, name: &str) -> Option<String> {
        self.resolve(name).map(|c| c.category)
    }

    /// The exercise as seen by the engine, filed under "General" when unknown
    pub fn exercise(&self, name: &str) -> Exercise {
        let (muscle_group, flags) = match self.resolve(name) {
            Some(c) => (c.category, c.flags),
            None => (GENERAL_CATEGORY.to_string(), ExerciseFlags::default()),
        };
        Exercise {
            name: name.to_string(),
            muscle_group,
            flags,
        }
    }

    /// True when no source holds any exercise
    pub fn is_empty(&self) -> bool {
        SourceKind::PRECEDENCE
            .iter()
            .all(|kind| !self.has_source(*kind))
    }

    /// Whether a source is present and non-empty
    pub fn has_source(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Machine => self.machine.as_ref().is_some_and(|m| !m.is_empty()),
            SourceKind::QrTemplate => self.qr_template.as_ref().is_some_and(|t| !t.is_empty()),
            SourceKind::PersonalTemplate => self
                .personal_template
                .as_ref()
                .is_some_and(|t| !t.is_empty()),
            SourceKind::DefaultProgram => self
                .selected_program_day()
                .is_some_and(|day| !day.is_empty()),
            SourceKind::MuscleGroup => self
                .muscle_group
                .as_ref()
                .is_some_and(|b| !b.exercises.is_empty()),
        }
    }

    fn selected_program_day(&self) -> Option<&CategoryMap> {
        let program = self.default_program.as_ref()?;
        program.days.get(&program.selected_day)
    }

    fn resolve_in(&self, kind: SourceKind, name: &str) -> Option<Classification> {
        match kind {
            SourceKind::Machine => self
                .machine
                .as_ref()?
                .iter()
                .find(|e| e.name == name)
                .map(|e| Classification {
                    source: kind,
                    category: e.muscle_group.clone(),
                    flags: e.flags,
                }),
            SourceKind::QrTemplate => find_in_groups(self.qr_template.as_ref()?, kind, name),
            SourceKind::PersonalTemplate => {
                find_in_groups(self.personal_template.as_ref()?, kind, name)
            }
            SourceKind::DefaultProgram => {
                find_in_groups(self.selected_program_day()?, kind, name)
            }
            SourceKind::MuscleGroup => {
                let bucket = self.muscle_group.as_ref()?;
                bucket
                    .exercises
                    .iter()
                    .any(|e| e.name == name)
                    .then(|| Classification {
                        source: kind,
                        category: bucket.muscle_group.clone(),
                        flags: bucket.flags,
                    })
            }
        }
    }

    /// Check the context for obviously broken entries
    ///
    /// Returns a list of problems, or empty Vec if the context is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(machine) = &self.machine {
            for exercise in machine {
                if exercise.name.is_empty() {
                    errors.push("Machine catalog has an exercise with empty name".to_string());
                }
            }
        }

        let grouped = [
            ("QR template", self.qr_template.as_ref()),
            ("Personal template", self.personal_template.as_ref()),
        ];
        for (label, groups) in grouped {
            if let Some(groups) = groups {
                check_groups(label, groups, &mut errors);
            }
        }

        if let Some(program) = &self.default_program {
            if !program.days.contains_key(&program.selected_day) {
                errors.push(format!(
                    "Default program has no day '{}'",
                    program.selected_day
                ));
            }
            for (day, groups) in &program.days {
                check_groups(&format!("Default program day '{}'", day), groups, &mut errors);
            }
        }

        if let Some(bucket) = &self.muscle_group {
            if bucket.muscle_group.is_empty() {
                errors.push("Selected muscle group has empty name".to_string());
            }
        }

        errors
    }
}

fn find_in_groups(groups: &CategoryMap, kind: SourceKind, name: &str) -> Option<Classification> {
    groups
        .iter()
        .find(|(_, group)| group.contains(name))
        .map(|(category, group)| Classification {
            source: kind,
            category: category.clone(),
            flags: group.flags,
        })
}

fn check_groups(label: &str, groups: &CategoryMap, errors: &mut Vec<String>) {
    for (category, group) in groups {
        if category.is_empty() {
            errors.push(format!("{} has a category with empty key", label));
        }
        if group.exercises.iter().any(|e| e.name.is_empty()) {
            errors.push(format!(
                "{} category '{}' has an exercise with empty name",
                label, category
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(names: &[&str], flags: ExerciseFlags) -> CategoryGroup {
        CategoryGroup {
            exercises: names
                .iter()
                .map(|n| TemplateExercise {
                    name: n.to_string(),
                })
                .collect(),
            flags,
        }
    }

    fn machine(name: &str, muscle_group: &str, flags: ExerciseFlags) -> Exercise {
        Exercise {
            name: name.into(),
            muscle_group: muscle_group.into(),
            flags,
        }
    }

    #[test]
    fn test_machine_flags_live_on_each_record() {
        let ctx = CatalogContext {
            machine: Some(vec![
                machine("Treadmill", "Cardio", ExerciseFlags::CARDIO),
                machine("Leg Press", "Legs", ExerciseFlags::STRENGTH),
            ]),
            ..Default::default()
        };

        let c = ctx.resolve("Leg Press").unwrap();
        assert_eq!(c.source, SourceKind::Machine);
        assert_eq!(c.category, "Legs");
        assert_eq!(c.flags, ExerciseFlags::STRENGTH);
        assert!(ctx.flags_for("Treadmill").is_cardio);
    }

    #[test]
    fn test_template_flags_apply_to_whole_category() {
        let mut groups = CategoryMap::new();
        groups.insert(
            "Chest".into(),
            group(&["Push Up", "Dips"], ExerciseFlags::BODY_WEIGHT),
        );
        let ctx = CatalogContext {
            personal_template: Some(groups),
            ..Default::default()
        };

        let c = ctx.resolve("Dips").unwrap();
        assert_eq!(c.source, SourceKind::PersonalTemplate);
        assert_eq!(c.category, "Chest");
        assert!(c.flags.is_body_weight);
    }

    #[test]
    fn test_precedence_machine_before_templates() {
        let mut qr = CategoryMap::new();
        qr.insert("Back".into(), group(&["Row"], ExerciseFlags::STRENGTH));
        let ctx = CatalogContext {
            machine: Some(vec![machine("Row", "Cardio", ExerciseFlags::CARDIO)]),
            qr_template: Some(qr),
            ..Default::default()
        };

        let c = ctx.resolve("Row").unwrap();
        assert_eq!(c.source, SourceKind::Machine);
        assert_eq!(c.category, "Cardio");
    }

    #[test]
    fn test_falls_through_to_later_source_when_earlier_misses() {
        let mut qr = CategoryMap::new();
        qr.insert("Back".into(), group(&["Row"], ExerciseFlags::STRENGTH));
        let ctx = CatalogContext {
            qr_template: Some(qr),
            muscle_group: Some(MuscleGroupBucket {
                muscle_group: "Shoulders".into(),
                exercises: vec![TemplateExercise {
                    name: "Lateral Raise".into(),
                }],
                flags: ExerciseFlags::STRENGTH,
            }),
            ..Default::default()
        };

        let c = ctx.resolve("Lateral Raise").unwrap();
        assert_eq!(c.source, SourceKind::MuscleGroup);
        assert_eq!(c.category, "Shoulders");
    }

    #[test]
    fn test_default_program_searches_selected_day_only() {
        let mut monday = CategoryMap::new();
        monday.insert("Legs".into(), group(&["Squat"], ExerciseFlags::STRENGTH));
        let mut tuesday = CategoryMap::new();
        tuesday.insert("Cardio".into(), group(&["Bike"], ExerciseFlags::CARDIO));
        let mut days = BTreeMap::new();
        days.insert("monday".to_string(), monday);
        days.insert("tuesday".to_string(), tuesday);

        let ctx = CatalogContext {
            default_program: Some(DefaultProgram {
                selected_day: "monday".into(),
                days,
            }),
            ..Default::default()
        };

        assert_eq!(ctx.category_for("Squat").as_deref(), Some("Legs"));
        assert!(ctx.resolve("Bike").is_none());
    }

    #[test]
    fn test_unknown_exercise_is_permissive() {
        let ctx = CatalogContext::default();

        assert!(ctx.is_empty());
        assert_eq!(ctx.flags_for("Mystery"), ExerciseFlags::default());
        let exercise = ctx.exercise("Mystery");
        assert_eq!(exercise.muscle_group, GENERAL_CATEGORY);
    }

    #[test]
    fn test_deserialize_camel_case_shapes() {
        let json = r#"{
            "qrTemplate": {
                "Cardio": { "exercises": [{ "name": "Rower" }], "isCardio": true }
            },
            "muscleGroup": {
                "muscleGroup": "Arms",
                "exercises": [{ "name": "Curl" }],
                "isMuscleGroup": true
            }
        }"#;

        let ctx: CatalogContext = serde_json::from_str(json).unwrap();
        assert!(ctx.flags_for("Rower").is_cardio);
        assert!(ctx.flags_for("Curl").is_muscle_group);
        assert!(ctx.has_source(SourceKind::QrTemplate));
        assert!(!ctx.has_source(SourceKind::Machine));
    }

    #[test]
    fn test_validate_reports_missing_program_day() {
        let ctx = CatalogContext {
            default_program: Some(DefaultProgram {
                selected_day: "friday".into(),
                days: BTreeMap::new(),
            }),
            ..Default::default()
        };

        let errors = ctx.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("friday"));
    }
}
