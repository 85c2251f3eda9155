//! Assigning catalog models to the four roles.

use crate::catalog::Model;
use crate::prompt::{Choice, Prompter};
use crate::setup::SetupError;
use config::{Role, RoleAssignment};

/// Model ids grouped by family, in catalog order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Categories {
    pub opus: Vec<String>,
    pub sonnet: Vec<String>,
    pub haiku: Vec<String>,
    pub other: Vec<String>,
}

impl Categories {
    fn groups(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Opus", self.opus.as_slice()),
            ("Sonnet", self.sonnet.as_slice()),
            ("Haiku", self.haiku.as_slice()),
            ("Other", self.other.as_slice()),
        ]
    }
}

/// Groups ids by case-insensitive substring match. The checks run in the
/// order opus, sonnet, haiku; anything else lands in `other`.
pub fn categorize<S: AsRef<str>>(model_ids: &[S]) -> Categories {
    let mut categories = Categories::default();
    for id in model_ids {
        let id = id.as_ref();
        let lower = id.to_lowercase();
        let bucket = if lower.contains("opus") {
            &mut categories.opus
        } else if lower.contains("sonnet") {
            &mut categories.sonnet
        } else if lower.contains("haiku") {
            &mut categories.haiku
        } else {
            &mut categories.other
        };
        bucket.push(id.to_string());
    }
    categories
}

/// Lines describing the catalog, grouped by family. Empty groups are skipped.
pub fn catalog_overview(models: &[Model]) -> Vec<String> {
    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    let categories = categorize(&ids);
    let mut lines = Vec::new();
    for (title, ids) in categories.groups() {
        if ids.is_empty() {
            continue;
        }
        lines.push(format!("{title} ({}):", ids.len()));
        lines.extend(ids.iter().map(|id| format!("  - {id}")));
    }
    lines
}

pub fn choice_label(model: &Model) -> String {
    match model.owned_by.as_deref().filter(|owner| !owner.is_empty()) {
        Some(owner) => format!("{} ({owner})", model.id),
        None => model.id.clone(),
    }
}

fn role_question(role: Role) -> String {
    match role.description() {
        Some(description) => format!("Select the {} model ({description}):", role.label()),
        None => format!("Select the {} model:", role.label()),
    }
}

/// Index preselected for `role`.
///
/// A previous value still present in the catalog wins. A stale previous
/// value falls back to the first model. Without a previous value the
/// subagent role starts on the second model so it differs from the others.
pub fn default_index(models: &[Model], role: Role, previous: Option<&str>) -> usize {
    match previous.filter(|id| !id.trim().is_empty()) {
        Some(previous) => models.iter().position(|m| m.id == previous).unwrap_or(0),
        None if role == Role::Subagent && models.len() > 1 => 1,
        None => 0,
    }
}

/// Asks for each role in turn. The whole list is offered every time; the
/// role name is only a label.
pub fn select_roles(
    prompter: &mut dyn Prompter,
    models: &[Model],
    previous: Option<&RoleAssignment>,
) -> Result<RoleAssignment, SetupError> {
    if models.is_empty() {
        return Err(SetupError::EmptyCatalog);
    }

    let choices: Vec<Choice> = models
        .iter()
        .map(|model| Choice {
            label: choice_label(model),
            value: model.id.clone(),
        })
        .collect();

    let mut roles = RoleAssignment::default();
    for role in Role::ALL {
        let default = default_index(models, role, previous.map(|p| p.get(role)));
        let picked = prompter.select(&role_question(role), &choices, default)?;
        let choice = choices.get(picked).unwrap_or(&choices[default]);
        log::debug!("{role} model: {}", choice.value);
        roles.set(role, choice.value.clone());
    }
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::{Answer, ScriptedPrompter};

    fn catalog(ids: &[&str]) -> Vec<Model> {
        ids.iter().map(|id| Model::new(*id)).collect()
    }

    #[test]
    fn categorizes_by_family() {
        let categories = categorize(&[
            "gpt-4",
            "claude-3-opus",
            "claude-3-sonnet",
            "claude-3-haiku",
            "mystery",
        ]);
        assert_eq!(
            categories,
            Categories {
                opus: vec!["claude-3-opus".into()],
                sonnet: vec!["claude-3-sonnet".into()],
                haiku: vec!["claude-3-haiku".into()],
                other: vec!["gpt-4".into(), "mystery".into()],
            }
        );
    }

    #[test]
    fn categorization_ignores_case() {
        let categories = categorize(&["OPUS-X", "Claude-Sonnet-4"]);
        assert_eq!(categories.opus, vec!["OPUS-X"]);
        assert_eq!(categories.sonnet, vec!["Claude-Sonnet-4"]);
    }

    #[test]
    fn opus_wins_over_later_families() {
        let categories = categorize(&["opus-sonnet-haiku-merge"]);
        assert_eq!(categories.opus.len(), 1);
        assert!(categories.sonnet.is_empty());
    }

    #[test]
    fn overview_skips_empty_groups() {
        let lines = catalog_overview(&catalog(&["claude-opus-4", "gpt-4o"]));
        assert_eq!(
            lines,
            vec!["Opus (1):", "  - claude-opus-4", "Other (1):", "  - gpt-4o"]
        );
    }

    #[test]
    fn label_includes_owner_when_known() {
        let mut model = Model::new("claude-3-opus");
        assert_eq!(choice_label(&model), "claude-3-opus");
        model.owned_by = Some("anthropic".into());
        assert_eq!(choice_label(&model), "claude-3-opus (anthropic)");
    }

    #[test]
    fn subagent_defaults_to_second_model() {
        let models = catalog(&["a", "b", "c"]);
        assert_eq!(default_index(&models, Role::Opus, None), 0);
        assert_eq!(default_index(&models, Role::Subagent, None), 1);
    }

    #[test]
    fn single_model_catalog_defaults_every_role_to_it() {
        let models = catalog(&["only"]);
        for role in Role::ALL {
            assert_eq!(default_index(&models, role, None), 0);
        }
    }

    #[test]
    fn previous_choice_is_preselected_when_still_offered() {
        let models = catalog(&["a", "b", "c"]);
        assert_eq!(default_index(&models, Role::Haiku, Some("c")), 2);
        assert_eq!(default_index(&models, Role::Subagent, Some("a")), 0);
    }

    #[test]
    fn stale_previous_choice_falls_back_to_first_model() {
        let models = catalog(&["a", "b"]);
        assert_eq!(default_index(&models, Role::Sonnet, Some("retired")), 0);
        assert_eq!(default_index(&models, Role::Subagent, Some("retired")), 0);
    }

    #[test]
    fn blank_previous_choice_counts_as_missing() {
        let models = catalog(&["a", "b"]);
        assert_eq!(default_index(&models, Role::Subagent, Some("")), 1);
    }

    #[test]
    fn every_role_is_offered_the_full_catalog() {
        let models = catalog(&["claude-3-opus", "claude-3-haiku", "gpt-4"]);
        let mut prompter = ScriptedPrompter::new([
            Answer::Pick(2),
            Answer::Default,
            Answer::Pick(1),
            Answer::Default,
        ]);

        let roles = select_roles(&mut prompter, &models, None).expect("select");

        assert_eq!(
            roles,
            RoleAssignment {
                opus: "gpt-4".into(),
                sonnet: "claude-3-opus".into(),
                haiku: "claude-3-haiku".into(),
                subagent: "claude-3-haiku".into(),
            }
        );
        assert_eq!(prompter.select_defaults, vec![0, 0, 0, 1]);
        assert!(prompter.questions[0].contains("Opus"));
        assert!(prompter.questions[3].contains("Subagent"));
    }

    #[test]
    fn previous_assignment_drives_defaults() {
        let models = catalog(&["a", "b", "c"]);
        let previous = RoleAssignment {
            opus: "c".into(),
            sonnet: "gone".into(),
            haiku: "b".into(),
            subagent: "".into(),
        };
        let mut prompter = ScriptedPrompter::new(vec![Answer::Default; 4]);

        let roles = select_roles(&mut prompter, &models, Some(&previous)).expect("select");

        assert_eq!(prompter.select_defaults, vec![2, 0, 1, 1]);
        assert_eq!(roles.opus, "c");
        assert_eq!(roles.sonnet, "a");
        assert_eq!(roles.subagent, "b");
    }

    #[test]
    fn empty_catalog_is_rejected_before_prompting() {
        let mut prompter = ScriptedPrompter::new([]);
        let err = select_roles(&mut prompter, &[], None).unwrap_err();
        assert!(matches!(err, SetupError::EmptyCatalog));
        assert!(prompter.questions.is_empty());
    }

    #[test]
    fn cancelling_a_role_aborts_selection() {
        let models = catalog(&["a"]);
        let mut prompter = ScriptedPrompter::new([Answer::Default, Answer::Cancel]);
        let err = select_roles(&mut prompter, &models, None).unwrap_err();
        assert!(matches!(err, SetupError::Prompt(_)));
    }
}
