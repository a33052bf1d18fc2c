use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarvestError;
use crate::model::Recipe;
use crate::text::{slugify, FALLBACK_SLUG};

/// Output document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    /// Nested, full-fidelity document.
    #[default]
    Rich,
    /// Flattened document with a single time figure.
    Simple,
}

/// Serializes a recipe to `<slug>.yml` in `out_dir` and returns the path.
///
/// Without `overwrite`, an occupied path is resolved by probing `-2`, `-3`,
/// ... until a free name is found; with it, the base path is clobbered.
/// `per_person` only affects the simple schema.
pub fn write_recipe(
    recipe: &Recipe,
    out_dir: &Path,
    schema: Schema,
    overwrite: bool,
    per_person: bool,
) -> Result<PathBuf, HarvestError> {
    fs::create_dir_all(out_dir)?;

    let stem = slugify(recipe.title.as_deref().unwrap_or(FALLBACK_SLUG));
    let mut out_path = out_dir.join(format!("{stem}.yml"));
    if !overwrite && out_path.exists() {
        let mut suffix = 2;
        loop {
            let candidate = out_dir.join(format!("{stem}-{suffix}.yml"));
            if !candidate.exists() {
                out_path = candidate;
                break;
            }
            suffix += 1;
        }
    }

    let yaml = match schema {
        Schema::Rich => serde_yaml::to_string(&recipe.to_rich_doc())?,
        Schema::Simple => serde_yaml::to_string(&recipe.to_simple_doc(per_person))?,
    };
    fs::write(&out_path, yaml)?;
    Ok(out_path)
}
