use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;

/// Import aliases such as `@` -> `<root>/src`.
pub struct AliasTable {
  entries: Box<[(Box<str>, PathBuf)]>,
}

impl AliasTable {
  pub fn from_config(aliases: &BTreeMap<String, PathBuf>, root: &Path) -> AliasTable {
    let mut entries: Vec<(Box<str>, PathBuf)> = aliases
      .iter()
      .map(|(key, target)| {
        let target = if target.is_absolute() {
          target.clone()
        } else {
          root.join(target)
        };
        info!("Alias '{}' resolves to '{}'.", key, target.display());
        (Box::from(key.as_str()), target)
      })
      .collect();

    // longer keys first so `@lib` is not shadowed by `@`
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

    AliasTable {
      entries: entries.into_boxed_slice(),
    }
  }

  pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
    self.entries.iter().find_map(|(key, target)| {
      if specifier == key.as_ref() {
        return Some(target.clone());
      }

      specifier
        .strip_prefix(key.as_ref())
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| target.join(rest))
    })
  }
}
