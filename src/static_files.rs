use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use actix_files::NamedFile;
use actix_web::{error, web, HttpRequest};

use crate::alias::AliasTable;

const INDEX_FILE: &str = "index.html";

/// Files served for every path no proxy rule claims.
pub struct StaticSite {
  root: PathBuf,
  aliases: AliasTable,
}

impl StaticSite {
  pub fn new(root: &Path, aliases: &BTreeMap<String, PathBuf>) -> StaticSite {
    StaticSite {
      root: root.to_path_buf(),
      aliases: AliasTable::from_config(aliases, root),
    }
  }

  pub fn locate(&self, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');

    if relative.split('/').any(|segment| segment == ".." || segment.contains('\\')) {
      return None;
    }

    let path = self
      .aliases
      .resolve(relative)
      .unwrap_or_else(|| self.root.join(relative));

    if path.is_dir() {
      Some(path.join(INDEX_FILE))
    } else {
      Some(path)
    }
  }
}

pub async fn serve(req: HttpRequest, site: web::Data<StaticSite>) -> actix_web::Result<NamedFile> {
  let path = site
    .locate(req.path())
    .ok_or_else(|| error::ErrorNotFound("not found"))?;

  Ok(NamedFile::open_async(path).await?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn parent_segments_are_refused() {
    let site = StaticSite::new(Path::new("/srv/site"), &BTreeMap::new());

    assert_eq!(site.locate("/../etc/passwd"), None);
    assert_eq!(site.locate("/src/../../secret"), None);
    assert_eq!(site.locate("/assets/app.css"), Some(PathBuf::from("/srv/site/assets/app.css")));
  }

  #[test]
  fn directories_map_to_index() {
    let root = std::env::temp_dir().join(format!("dev_proxy_locate_{}", std::process::id()));
    fs::create_dir_all(root.join("docs")).unwrap();

    let site = StaticSite::new(&root, &BTreeMap::new());

    assert_eq!(site.locate("/"), Some(root.join("index.html")));
    assert_eq!(site.locate("/docs"), Some(root.join("docs").join("index.html")));

    fs::remove_dir_all(&root).unwrap();
  }
}
