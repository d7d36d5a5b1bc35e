#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use ologstyle::core::olog::{
    AttributeAxis, AxisValue, SpecCache, SpecLoader, SpecModel, StructuredAttributeSet,
};

pub fn bundled_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/ologs/cereal_box_styles.olog.yaml")
}

pub fn bundled() -> SpecModel {
    SpecLoader::new()
        .load_path(&bundled_path())
        .expect("bundled olog must load")
}

pub fn attrs(pairs: &[(AttributeAxis, &str)]) -> StructuredAttributeSet {
    pairs
        .iter()
        .map(|(axis, value)| (*axis, AxisValue::from(*value)))
        .collect()
}

/// Small two-category olog. `{rules}` is spliced into `morphisms`.
const SMALL_TEMPLATE: &str = r#"olog:
  metadata:
    name: small
    version: "0.1"
  types:
    category:
      instances:
        - name: mascot_theater
          triggers: [mascot]
        - name: kid_chaos
          triggers: [wild]
    subject:
      default: abstract
      instances: [abstract, animal, human]
    energy:
      default: low
      instances:
        - low
        - medium
        - { name: high, keywords: [wild, energetic] }
        - { name: extreme, keywords: [] }
    palette:
      default: muted
      instances: [muted, bright]
  morphisms:
{rules}
  commutative_diagrams:
    animals_are_bright:
      category: kid_chaos
      assertion: "subject=animal implies palette=bright"
"#;

pub const CATCH_ALL_RULE: &str = r#"    - name: settle_down
      category: kid_chaos
      source: energy
      target: energy
      when: "*"
      output: low
"#;

pub const EXACT_RULE: &str = r"    - name: crank_it
      category: kid_chaos
      source: energy
      target: energy
      when: high
      output: extreme
";

pub const MASCOT_RULE: &str = r"    - name: mascot_energy
      category: mascot_theater
      source: energy
      target: energy
      when: medium|high
      output: high
";

pub fn small_olog(rules: &[&str]) -> String {
    let rules = if rules.is_empty() {
        "    []\n".to_string()
    } else {
        rules.concat()
    };
    SMALL_TEMPLATE.replace("{rules}\n", &rules)
}

/// An olog written to a private temp directory.
pub struct OlogDir {
    _dir: TempDir,
    path: PathBuf,
}

impl OlogDir {
    pub fn new(document: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("styles.olog.yaml");
        std::fs::write(&path, document).expect("write olog");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rewrite(&self, document: &str) {
        std::fs::write(&self.path, document).expect("rewrite olog");
    }

    pub fn write_sibling(&self, name: &str, document: &str) -> PathBuf {
        let path = self.path.with_file_name(name);
        std::fs::write(&path, document).expect("write sibling");
        path
    }

    pub fn cached(&self, cache: &SpecCache) -> Arc<SpecModel> {
        cache.get_or_load(&self.path).expect("olog loads")
    }
}
