use serde::Serialize;

use crate::text::parse_ingredient_line;

/// Canonical recipe record extracted from one page.
///
/// `ingredients` and `instructions` are always present, possibly empty. All
/// text fields are whitespace-normalized before they land here. A record is
/// built once per page, serialized, and dropped — the crawl never holds more
/// than one in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub title: Option<String>,
    pub servings: Option<u32>,
    pub time_prep_min: Option<u32>,
    pub time_cook_min: Option<u32>,
    pub time_total_min: Option<u32>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub author: Option<String>,
    pub source_url: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub cuisine: Option<String>,
}

/// Full-fidelity output document. Key names are Danish and mirror the
/// documents already in circulation; readers of the output directory depend
/// on them.
#[derive(Debug, Serialize)]
pub struct RichDoc {
    pub titel: Option<String>,
    pub portioner: Option<u32>,
    pub tid: RichTiming,
    pub ingredienser: Vec<String>,
    pub fremgangsmaade: Vec<String>,
    pub metadata: RichMetadata,
}

#[derive(Debug, Serialize)]
pub struct RichTiming {
    pub forberedelse_min: Option<u32>,
    pub tilberedning_min: Option<u32>,
    pub total_min: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RichMetadata {
    pub forfatter: Option<String>,
    pub kilde_url: String,
    pub billede: Option<String>,
    pub kategorier: Vec<String>,
    #[serde(rename = "køkken")]
    pub koekken: Option<String>,
}

/// Flattened output document: one time figure, ingredients either as the raw
/// lines or as a per-serving mapping.
#[derive(Debug, Serialize)]
pub struct SimpleDoc {
    pub titel: Option<String>,
    pub tid: Option<u32>,
    pub ingredienser: SimpleIngredients,
    // The rich schema spells this key without the å; existing documents
    // disagree between the two shapes, so both spellings stay.
    #[serde(rename = "fremgangsmåde")]
    pub fremgangsmaade: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SimpleIngredients {
    Lines(Vec<String>),
    PerPerson(serde_yaml::Mapping),
}

impl Recipe {
    pub fn to_rich_doc(&self) -> RichDoc {
        RichDoc {
            titel: self.title.clone(),
            portioner: self.servings,
            tid: RichTiming {
                forberedelse_min: self.time_prep_min,
                tilberedning_min: self.time_cook_min,
                total_min: self.time_total_min,
            },
            ingredienser: self.ingredients.clone(),
            fremgangsmaade: self.instructions.clone(),
            metadata: RichMetadata {
                forfatter: self.author.clone(),
                kilde_url: self.source_url.clone(),
                billede: self.image.clone(),
                kategorier: self.categories.clone(),
                koekken: self.cuisine.clone(),
            },
        }
    }

    pub fn to_simple_doc(&self, per_person: bool) -> SimpleDoc {
        let tid = self
            .time_total_min
            .or(self.time_cook_min)
            .or(self.time_prep_min);

        let ingredienser = match self.servings {
            Some(servings) if per_person && servings > 0 && !self.ingredients.is_empty() => {
                SimpleIngredients::PerPerson(per_person_mapping(&self.ingredients, servings))
            }
            _ => SimpleIngredients::Lines(self.ingredients.clone()),
        };

        SimpleDoc {
            titel: self.title.clone(),
            tid,
            ingredienser,
            fremgangsmaade: self.instructions.clone(),
        }
    }
}

/// Rewrites ingredient lines as `name -> per-serving quantity`. Lines whose
/// quantity cannot be parsed keep their raw text, keyed by themselves.
fn per_person_mapping(ingredients: &[String], servings: u32) -> serde_yaml::Mapping {
    let mut mapping = serde_yaml::Mapping::new();
    for line in ingredients {
        let parsed = parse_ingredient_line(line);
        let name = if parsed.name.is_empty() {
            line.clone()
        } else {
            parsed.name.clone()
        };
        let value = match parsed.amount {
            Some(amount) => {
                let per = amount / f64::from(servings);
                match &parsed.unit {
                    Some(unit) => format!("{} {}", format_amount(per), unit),
                    None => format_amount(per),
                }
            }
            None => line.clone(),
        };
        mapping.insert(name.into(), value.into());
    }
    mapping
}

/// Compact decimal formatting: whole numbers without a fraction, everything
/// else trimmed of trailing zeros.
fn format_amount(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let mut formatted = format!("{value:.6}");
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            title: Some("Pasta".to_string()),
            servings: Some(4),
            time_prep_min: Some(10),
            time_cook_min: Some(20),
            time_total_min: Some(30),
            ingredients: vec!["400 g pasta".to_string(), "salt efter smag".to_string()],
            instructions: vec!["Kog pastaen".to_string()],
            author: Some("Mor".to_string()),
            source_url: "https://example.dk/opskrifter/pasta/".to_string(),
            image: None,
            categories: vec!["Aftensmad".to_string()],
            cuisine: Some("Italiensk".to_string()),
        }
    }

    #[test]
    fn simple_doc_prefers_total_time() {
        let doc = recipe().to_simple_doc(false);
        assert_eq!(doc.tid, Some(30));

        let mut r = recipe();
        r.time_total_min = None;
        assert_eq!(r.to_simple_doc(false).tid, Some(20));
        r.time_cook_min = None;
        assert_eq!(r.to_simple_doc(false).tid, Some(10));
        r.time_prep_min = None;
        assert_eq!(r.to_simple_doc(false).tid, None);
    }

    #[test]
    fn per_person_divides_parsed_amounts() {
        let doc = recipe().to_simple_doc(true);
        let SimpleIngredients::PerPerson(mapping) = doc.ingredienser else {
            panic!("expected per-person mapping");
        };
        assert_eq!(mapping.get("pasta"), Some(&serde_yaml::Value::from("100 g")));
        // unparseable line keeps its raw text, keyed by itself
        assert_eq!(
            mapping.get("salt efter smag"),
            Some(&serde_yaml::Value::from("salt efter smag"))
        );
    }

    #[test]
    fn per_person_needs_servings() {
        let mut r = recipe();
        r.servings = None;
        assert!(matches!(
            r.to_simple_doc(true).ingredienser,
            SimpleIngredients::Lines(_)
        ));
        r.servings = Some(0);
        assert!(matches!(
            r.to_simple_doc(true).ingredienser,
            SimpleIngredients::Lines(_)
        ));
    }

    #[test]
    fn per_person_keeps_fractions_readable() {
        let r = Recipe {
            servings: Some(3),
            ingredients: vec!["2 dl fløde".to_string()],
            ..Recipe::default()
        };
        let SimpleIngredients::PerPerson(mapping) = r.to_simple_doc(true).ingredienser else {
            panic!("expected per-person mapping");
        };
        assert_eq!(
            mapping.get("fløde"),
            Some(&serde_yaml::Value::from("0.666667 dl"))
        );
    }

    #[test]
    fn rich_doc_groups_timing() {
        let doc = recipe().to_rich_doc();
        assert_eq!(doc.tid.forberedelse_min, Some(10));
        assert_eq!(doc.tid.tilberedning_min, Some(20));
        assert_eq!(doc.tid.total_min, Some(30));
        assert_eq!(
            doc.metadata.kilde_url,
            "https://example.dk/opskrifter/pasta/"
        );
    }
}
