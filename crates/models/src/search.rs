//! Recipe lookup by attached metadata. Recipes link to metadata through one
//! join table per kind; every recipe carries at least one category link, so
//! `recipe_categories` is the candidate set.
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Category,
    Tag,
    DifficultyLevel,
    PreparationTime,
    CuisineType,
}

impl LinkKind {
    pub const ALL: [LinkKind; 5] = [
        LinkKind::Category,
        LinkKind::Tag,
        LinkKind::DifficultyLevel,
        LinkKind::PreparationTime,
        LinkKind::CuisineType,
    ];

    pub fn table(self) -> &'static str {
        match self {
            LinkKind::Category => "recipe_categories",
            LinkKind::Tag => "recipe_tags",
            LinkKind::DifficultyLevel => "recipe_difficulty_levels",
            LinkKind::PreparationTime => "recipe_preparation_times",
            LinkKind::CuisineType => "recipe_cuisine_types",
        }
    }

    /// Column holding the metadata id.
    pub fn column(self) -> &'static str {
        match self {
            LinkKind::Category => "category_id",
            LinkKind::Tag => "tag_id",
            LinkKind::DifficultyLevel => "difficulty_level_id",
            LinkKind::PreparationTime => "preparation_time_id",
            LinkKind::CuisineType => "cuisine_type_id",
        }
    }
}

/// Every filter is optional; a nil id is the same as no filter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_id: Option<Uuid>,
    #[serde(default, alias = "difficulty_level")]
    pub difficulty_level_id: Option<Uuid>,
    #[serde(default, alias = "cuisine_type")]
    pub cuisine_type_id: Option<Uuid>,
    /// Minutes, inclusive.
    #[serde(default)]
    pub min_prep_time: Option<i32>,
    #[serde(default)]
    pub max_prep_time: Option<i32>,
}

impl SearchRequest {
    pub fn id_filters(&self) -> Vec<(LinkKind, Uuid)> {
        [
            (LinkKind::Category, self.category_id),
            (LinkKind::Tag, self.tag_id),
            (LinkKind::DifficultyLevel, self.difficulty_level_id),
            (LinkKind::CuisineType, self.cuisine_type_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.filter(|id| !id.is_nil()).map(|id| (kind, id)))
        .collect()
    }

    pub fn has_prep_range(&self) -> bool {
        self.min_prep_time.is_some() || self.max_prep_time.is_some()
    }

    pub fn prep_in_range(&self, minutes: i32) -> bool {
        self.min_prep_time.map_or(true, |min| minutes >= min)
            && self.max_prep_time.map_or(true, |max| minutes <= max)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (field, value) in [("min_prep_time", self.min_prep_time), ("max_prep_time", self.max_prep_time)] {
            if value.is_some_and(|v| v < 0) {
                return Err(ModelError::Validation(format!("{field} must not be negative")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_prep_time, self.max_prep_time) {
            if min > max {
                return Err(ModelError::Validation("min_prep_time must not exceed max_prep_time".into()));
            }
        }
        Ok(())
    }
}

/// Metadata attached to one matching recipe.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub recipe_id: Uuid,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub difficulty_level: Option<Uuid>,
    pub preparation_time: Option<Uuid>,
    pub cuisine_type: Option<Uuid>,
}

/// One live join-table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecipeLink {
    pub kind: LinkKind,
    pub recipe_id: Uuid,
    pub target_id: Uuid,
}

/// Group `links` per recipe, in the order of `recipe_ids`.
pub fn assemble(recipe_ids: &[Uuid], links: &[RecipeLink]) -> Vec<SearchResult> {
    recipe_ids
        .iter()
        .map(|&recipe_id| {
            let mut result = SearchResult { recipe_id, ..Default::default() };
            for link in links.iter().filter(|l| l.recipe_id == recipe_id) {
                match link.kind {
                    LinkKind::Category => result.category_ids.push(link.target_id),
                    LinkKind::Tag => result.tag_ids.push(link.target_id),
                    LinkKind::DifficultyLevel => {
                        result.difficulty_level.get_or_insert(link.target_id);
                    }
                    LinkKind::PreparationTime => {
                        result.preparation_time.get_or_insert(link.target_id);
                    }
                    LinkKind::CuisineType => {
                        result.cuisine_type.get_or_insert(link.target_id);
                    }
                }
            }
            result
        })
        .collect()
}

/// Recipe ids matching `req`, ascending. `durations` maps live preparation
/// time ids to minutes.
pub fn matching(req: &SearchRequest, links: &[RecipeLink], durations: &HashMap<Uuid, i32>) -> Vec<Uuid> {
    let linked = |recipe: Uuid, kind: LinkKind, pred: &dyn Fn(Uuid) -> bool| {
        links.iter().any(|l| l.recipe_id == recipe && l.kind == kind && pred(l.target_id))
    };
    let filters = req.id_filters();

    let candidates: BTreeSet<Uuid> = links
        .iter()
        .filter(|l| l.kind == LinkKind::Category)
        .map(|l| l.recipe_id)
        .collect();

    candidates
        .into_iter()
        .filter(|&recipe| filters.iter().all(|&(kind, id)| linked(recipe, kind, &|t| t == id)))
        .filter(|&recipe| {
            !req.has_prep_range()
                || linked(recipe, LinkKind::PreparationTime, &|t| {
                    durations.get(&t).is_some_and(|&m| req.prep_in_range(m))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(kind: LinkKind, recipe_id: Uuid, target_id: Uuid) -> RecipeLink {
        RecipeLink { kind, recipe_id, target_id }
    }

    struct Fixture {
        soup: Uuid,
        cake: Uuid,
        dinner: Uuid,
        dessert: Uuid,
        vegan: Uuid,
        quick: Uuid,
        slow: Uuid,
        links: Vec<RecipeLink>,
        durations: HashMap<Uuid, i32>,
    }

    fn fixture() -> Fixture {
        let (soup, cake) = (Uuid::new_v4(), Uuid::new_v4());
        let (dinner, dessert, vegan) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let (quick, slow) = (Uuid::new_v4(), Uuid::new_v4());
        let links = vec![
            link(LinkKind::Category, soup, dinner),
            link(LinkKind::Tag, soup, vegan),
            link(LinkKind::PreparationTime, soup, quick),
            link(LinkKind::Category, cake, dessert),
            link(LinkKind::PreparationTime, cake, slow),
        ];
        let durations = HashMap::from([(quick, 15), (slow, 90)]);
        Fixture { soup, cake, dinner, dessert, vegan, quick, slow, links, durations }
    }

    fn sorted(mut ids: Vec<Uuid>) -> Vec<Uuid> {
        ids.sort();
        ids
    }

    #[test]
    fn no_filters_returns_every_categorised_recipe() {
        let f = fixture();
        let ids = matching(&SearchRequest::default(), &f.links, &f.durations);
        assert_eq!(ids, sorted(vec![f.soup, f.cake]));
    }

    #[test]
    fn id_filters_must_all_match() {
        let f = fixture();
        let req = SearchRequest { category_id: Some(f.dinner), tag_id: Some(f.vegan), ..Default::default() };
        assert_eq!(matching(&req, &f.links, &f.durations), vec![f.soup]);

        let req = SearchRequest { category_id: Some(f.dessert), tag_id: Some(f.vegan), ..Default::default() };
        assert!(matching(&req, &f.links, &f.durations).is_empty());
    }

    #[test]
    fn nil_ids_do_not_filter() {
        let f = fixture();
        let req = SearchRequest { tag_id: Some(Uuid::nil()), ..Default::default() };
        assert_eq!(matching(&req, &f.links, &f.durations).len(), 2);
    }

    #[test]
    fn prep_range_is_inclusive() {
        let f = fixture();
        let req = SearchRequest { max_prep_time: Some(15), ..Default::default() };
        assert_eq!(matching(&req, &f.links, &f.durations), vec![f.soup]);
        let req = SearchRequest { min_prep_time: Some(16), max_prep_time: Some(90), ..Default::default() };
        assert_eq!(matching(&req, &f.links, &f.durations), vec![f.cake]);
    }

    #[test]
    fn assemble_groups_links_per_recipe() {
        let f = fixture();
        let results = assemble(&[f.soup], &f.links);
        assert_eq!(
            results,
            vec![SearchResult {
                recipe_id: f.soup,
                category_ids: vec![f.dinner],
                tag_ids: vec![f.vegan],
                preparation_time: Some(f.quick),
                ..Default::default()
            }]
        );
        assert_ne!(results[0].preparation_time, Some(f.slow));
    }

    #[test]
    fn request_accepts_short_keys_and_rejects_inverted_range() {
        let id = Uuid::new_v4();
        let req: SearchRequest =
            serde_json::from_value(json!({"difficulty_level": id, "cuisine_type": id})).unwrap();
        assert_eq!(req.difficulty_level_id, Some(id));
        assert_eq!(req.cuisine_type_id, Some(id));

        let inverted = SearchRequest { min_prep_time: Some(30), max_prep_time: Some(10), ..Default::default() };
        assert!(inverted.validate().is_err());
        let negative = SearchRequest { min_prep_time: Some(-1), ..Default::default() };
        assert!(negative.validate().is_err());
    }
}
