use serde::Serialize;

use crate::ENV_PREFIX;
use crate::env::EnvSource;
use crate::error::SettingsError;
use crate::resolve::{FailFast, MissingValueResolver};

/// A settings field: its name and the question asked when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
  pub name: &'static str,
  pub prompt: &'static str,
}

impl Field {
  pub const fn new(name: &'static str, prompt: &'static str) -> Self {
    Self { name, prompt }
  }

  /// Environment variable the field is read from, e.g. `DS_BK_PROJ_KEY`.
  pub fn env_var(&self) -> String {
    format!("{}{}", ENV_PREFIX, self.name.to_ascii_uppercase())
  }

  pub(crate) fn missing(&self) -> SettingsError {
    SettingsError::Missing {
      field: self.name,
      var: self.env_var(),
    }
  }

  /// Unset and empty values are treated the same.
  fn read(&self, env: &dyn EnvSource) -> Option<String> {
    env.get(&self.env_var()).filter(|v| !v.trim().is_empty())
  }

  fn required(
    &self,
    env: &dyn EnvSource,
    resolver: &mut dyn MissingValueResolver,
  ) -> Result<String, SettingsError> {
    match self.read(env) {
      Some(value) => Ok(value),
      None => resolver.resolve(self),
    }
  }

  fn flag(&self, env: &dyn EnvSource, default: bool) -> Result<bool, SettingsError> {
    let Some(raw) = self.read(env) else {
      return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
      "1" | "true" | "yes" | "on" | "y" | "t" => Ok(true),
      "0" | "false" | "no" | "off" | "n" | "f" => Ok(false),
      _ => Err(SettingsError::InvalidBool {
        var: self.env_var(),
        value: raw,
      }),
    }
  }
}

/// Settings every notebook understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotebookSettings {
  pub profile: Option<String>,
}

impl NotebookSettings {
  pub const PROFILE: Field = Field::new("profile", "Profile");

  pub fn from_env(env: &dyn EnvSource) -> Self {
    Self {
      profile: Self::PROFILE.read(env),
    }
  }
}

/// Settings for notebooks that work against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectNotebookSettings {
  #[serde(flatten)]
  pub base: NotebookSettings,
  pub proj_key: String,
  pub cleanup: bool,
}

impl ProjectNotebookSettings {
  pub const PROJ_KEY: Field = Field::new("proj_key", "Project key");
  pub const CLEANUP: Field = Field::new("cleanup", "Clean up");

  pub fn load(
    env: &dyn EnvSource,
    resolver: &mut dyn MissingValueResolver,
  ) -> Result<Self, SettingsError> {
    Ok(Self {
      base: NotebookSettings::from_env(env),
      proj_key: Self::PROJ_KEY.required(env, resolver)?,
      cleanup: Self::CLEANUP.flag(env, true)?,
    })
  }

  pub fn from_env(env: &dyn EnvSource) -> Result<Self, SettingsError> {
    Self::load(env, &mut FailFast)
  }
}

/// Settings for notebooks that work against a project's knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KgProjectNotebookSettings {
  #[serde(flatten)]
  pub project: ProjectNotebookSettings,
  pub kg_key: String,
}

impl KgProjectNotebookSettings {
  pub const KG_KEY: Field = Field::new("kg_key", "Knowledge graph key");

  pub fn load(
    env: &dyn EnvSource,
    resolver: &mut dyn MissingValueResolver,
  ) -> Result<Self, SettingsError> {
    Ok(Self {
      project: ProjectNotebookSettings::load(env, resolver)?,
      kg_key: Self::KG_KEY.required(env, resolver)?,
    })
  }

  pub fn from_env(env: &dyn EnvSource) -> Result<Self, SettingsError> {
    Self::load(env, &mut FailFast)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::resolve::Prompt;

  fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[test]
  fn test_env_var_names() {
    assert_eq!(NotebookSettings::PROFILE.env_var(), "DS_BK_PROFILE");
    assert_eq!(ProjectNotebookSettings::PROJ_KEY.env_var(), "DS_BK_PROJ_KEY");
    assert_eq!(KgProjectNotebookSettings::KG_KEY.env_var(), "DS_BK_KG_KEY");
  }

  #[test]
  fn test_base_profile_is_optional() {
    assert_eq!(NotebookSettings::from_env(&env(&[])).profile, None);
    assert_eq!(
      NotebookSettings::from_env(&env(&[("DS_BK_PROFILE", "dev")])).profile,
      Some("dev".to_string())
    );
  }

  #[test]
  fn test_project_from_env() {
    let settings = ProjectNotebookSettings::from_env(&env(&[
      ("DS_BK_PROFILE", "prod"),
      ("DS_BK_PROJ_KEY", "p-1"),
    ]))
    .unwrap();

    assert_eq!(settings.base.profile.as_deref(), Some("prod"));
    assert_eq!(settings.proj_key, "p-1");
    assert!(settings.cleanup);
  }

  #[test]
  fn test_project_missing_key_fails_fast() {
    let err = ProjectNotebookSettings::from_env(&env(&[("DS_BK_PROJ_KEY", "  ")])).unwrap_err();
    match err {
      SettingsError::Missing { field, var } => {
        assert_eq!(field, "proj_key");
        assert_eq!(var, "DS_BK_PROJ_KEY");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_cleanup_parsing() {
    let off = ProjectNotebookSettings::from_env(&env(&[
      ("DS_BK_PROJ_KEY", "p"),
      ("DS_BK_CLEANUP", "False"),
    ]))
    .unwrap();
    assert!(!off.cleanup);

    let bad = ProjectNotebookSettings::from_env(&env(&[
      ("DS_BK_PROJ_KEY", "p"),
      ("DS_BK_CLEANUP", "maybe"),
    ]));
    assert!(matches!(bad, Err(SettingsError::InvalidBool { .. })));
  }

  #[test]
  fn test_kg_prompts_for_missing_keys() {
    let mut out = Vec::new();
    let mut prompt = Prompt::new("p-9\nkg-3\n".as_bytes(), &mut out);

    let settings = KgProjectNotebookSettings::load(&env(&[]), &mut prompt).unwrap();
    assert_eq!(settings.project.proj_key, "p-9");
    assert_eq!(settings.kg_key, "kg-3");
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "Project key: Knowledge graph key: "
    );
  }

  #[test]
  fn test_kg_only_prompts_for_what_is_missing() {
    let mut prompt = Prompt::new("kg-1\n".as_bytes(), Vec::new());
    let settings =
      KgProjectNotebookSettings::load(&env(&[("DS_BK_PROJ_KEY", "p-1")]), &mut prompt).unwrap();
    assert_eq!(settings.project.proj_key, "p-1");
    assert_eq!(settings.kg_key, "kg-1");
  }

  #[test]
  fn test_kg_serializes_flat() {
    let settings = KgProjectNotebookSettings::from_env(&env(&[
      ("DS_BK_PROJ_KEY", "p"),
      ("DS_BK_KG_KEY", "k"),
    ]))
    .unwrap();

    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(
      json,
      serde_json::json!({"profile": null, "proj_key": "p", "cleanup": true, "kg_key": "k"})
    );
  }
}
