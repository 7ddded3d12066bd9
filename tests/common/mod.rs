//! Shared test bibliographies and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Aggregate bibliography covering every category, topic overlap, an
/// undated entry and an entry without any category keyword.
///
/// Input positions: 0 `pub_a`, 1 `sub_a`, 2 `pub_b`, 3 `prep_a`,
/// 4 `pub_undated`, 5 `untagged`, 6 `pub_c`.
pub const AGGREGATE_BIB: &str = r#"@article{pub_a,
  author = {Bao, Xiyuan and Smith, John},
  title = {Plume Heads.},
  journal = {Nature},
  year = {2021},
  doi = {10.1/a},
  keywords = {published},
  topic = {mantle dynamics; geodynamical methods}
}

@article{sub_a,
  author = {Xiyuan Bao},
  title = {Slab Rollback},
  year = {2024},
  howpublished = {Submitted to Geophysical Journal},
  keywords = {submitted, published},
  topic = {mantle dynamics}
}

@article{pub_b,
  author = {Doe, Jane and Bao, Xiyuan},
  title = {Older Work},
  journal = {JGR},
  year = {2019},
  url = {https://example.org/older},
  keywords = {published},
  topic = {interior–surface coupling}
}

@article{prep_a,
  author = {Bao, Xiyuan},
  title = {Future Work},
  keywords = {inprep}
}

@article{pub_undated,
  author = {Roe, Richard},
  title = {Undated Work},
  journal = {EPSL},
  keywords = {published}
}

@misc{untagged,
  title = {Untagged Note},
  year = {2020},
  topic = {geodynamical methods}
}

@article{pub_c,
  author = {Smith, John},
  title = {Same Year},
  journal = {G3},
  year = {2021},
  keywords = {published}
}
"#;

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Returns the citation keys of the entries in a split file, in order.
pub fn keys_in(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix('@'))
        .filter_map(|rest| rest.split_once('{'))
        .map(|(_, tail)| tail.split(',').next().unwrap_or("").trim().to_string())
        .collect()
}
