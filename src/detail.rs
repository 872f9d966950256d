//! Presentation fields derived from the selected entity.

use crate::state::{Entity, Language};

/// Stat keys in display order with their short labels.
pub const STAT_ORDER: [(&str, &str); 6] = [
    ("hp", "HP"),
    ("attack", "Attack"),
    ("defense", "Defense"),
    ("special-attack", "Sp.Atk"),
    ("special-defense", "Sp.Def"),
    ("speed", "Speed"),
];

pub fn decimetres_to_metres(decimetres: u16) -> f32 {
    f32::from(decimetres) / 10.0
}

pub fn hectograms_to_kilograms(hectograms: u32) -> f32 {
    hectograms as f32 / 10.0
}

pub fn no_translation_message(language: Language) -> &'static str {
    match language {
        Language::En => "No description available in this language.",
        Language::De => "Keine Beschreibung in dieser Sprache verfügbar.",
        Language::Fr => "Aucune description disponible dans cette langue.",
        Language::Es => "No hay descripción disponible en este idioma.",
        Language::It => "Nessuna descrizione disponibile in questa lingua.",
        Language::Ja => "この言語の説明はありません。",
        Language::Ko => "이 언어로 된 설명이 없습니다.",
        Language::Pt => "Nenhuma descrição disponível neste idioma.",
    }
}

/// Collapses the form feeds, soft hyphens and line breaks PokeAPI flavor
/// texts carry into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace('\u{00AD}', "")
        .split(char::is_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemLine {
    pub name: String,
    /// Highest rarity across versions, in percent.
    pub rarity: u16,
    pub versions: usize,
    pub sprite: Option<String>,
    pub cost: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub id: u32,
    pub display_name: String,
    pub description: String,
    pub translated: bool,
    pub genus: Option<String>,
    pub height_m: f32,
    pub weight_kg: f32,
    pub stats: Vec<StatLine>,
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub abilities: Vec<String>,
    pub items: Vec<ItemLine>,
    pub sprite_url: Option<String>,
    pub cry_url: Option<String>,
}

impl DetailView {
    /// `roll` picks one of the matching flavor texts uniformly.
    pub fn derive(entity: &Entity, language: Language, roll: u64) -> Self {
        let texts = entity.flavor_texts(language);
        let (description, translated) = if texts.is_empty() {
            (no_translation_message(language).to_string(), false)
        } else {
            let pick = (roll % texts.len() as u64) as usize;
            (normalize_whitespace(&texts[pick].text), true)
        };

        let stats = STAT_ORDER
            .iter()
            .map(|&(key, label)| StatLine {
                label,
                value: entity.stat(key).unwrap_or(0),
            })
            .collect();

        let abilities = entity
            .abilities
            .iter()
            .map(|ability| {
                if ability.hidden {
                    format!("{} (hidden)", ability.name)
                } else {
                    ability.name.clone()
                }
            })
            .collect();

        let items = entity
            .held_items
            .iter()
            .map(|item| ItemLine {
                name: item.localized_name(language).to_string(),
                rarity: item
                    .rarity_by_version
                    .iter()
                    .map(|entry| entry.rarity)
                    .max()
                    .unwrap_or(0),
                versions: item.rarity_by_version.len(),
                sprite: item.detail.as_ref().and_then(|detail| detail.sprite.clone()),
                cost: item.detail.as_ref().and_then(|detail| detail.cost),
            })
            .collect();

        Self {
            id: entity.id,
            display_name: entity.localized_name(language).to_string(),
            description,
            translated,
            genus: entity.genus(language).map(str::to_string),
            height_m: decimetres_to_metres(entity.height),
            weight_kg: hectograms_to_kilograms(entity.weight),
            stats,
            types: entity.types.clone(),
            primary_type: entity.primary_type().map(str::to_string),
            abilities,
            items,
            sprite_url: entity.sprite_url().map(str::to_string),
            cry_url: entity.cry_url().map(str::to_string),
        }
    }

    pub fn stat_total(&self) -> u32 {
        self.stats.iter().map(|stat| u32::from(stat.value)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityStat, FlavorText, HeldItem, ItemDetail, LocalizedName, VersionRarity};

    fn flavor(text: &str, language: &str) -> FlavorText {
        FlavorText {
            text: text.to_string(),
            language: language.to_string(),
            version: None,
        }
    }

    fn sample() -> Entity {
        Entity {
            id: 1,
            name: "bulbasaur".to_string(),
            names: vec![LocalizedName {
                name: "Bisasam".to_string(),
                language: "de".to_string(),
            }],
            stats: vec![
                EntityStat {
                    name: "speed".to_string(),
                    base: 45,
                },
                EntityStat {
                    name: "hp".to_string(),
                    base: 45,
                },
            ],
            types: vec!["grass".to_string(), "poison".to_string()],
            height: 7,
            weight: 69,
            flavor_text_entries: vec![
                flavor("A strange seed was\nplanted on its\u{000C}back", "en"),
                flavor("Second entry", "en"),
                flavor("Ein Samen", "de"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn item_lines_carry_detail_fields() {
        let entity = Entity {
            held_items: vec![HeldItem {
                name: "light-ball".to_string(),
                rarity_by_version: vec![
                    VersionRarity {
                        version: "red".to_string(),
                        rarity: 5,
                    },
                    VersionRarity {
                        version: "yellow".to_string(),
                        rarity: 50,
                    },
                ],
                detail: Some(ItemDetail {
                    name: "light-ball".to_string(),
                    names: Vec::new(),
                    sprite: Some("light-ball.png".to_string()),
                    cost: Some(1000),
                }),
            }],
            ..Default::default()
        };

        let view = DetailView::derive(&entity, Language::En, 0);
        assert_eq!(
            view.items,
            vec![ItemLine {
                name: "light-ball".to_string(),
                rarity: 50,
                versions: 2,
                sprite: Some("light-ball.png".to_string()),
                cost: Some(1000),
            }]
        );
    }

    #[test]
    fn converts_units() {
        assert_eq!(decimetres_to_metres(10), 1.0);
        assert_eq!(decimetres_to_metres(7), 0.7);
        assert_eq!(hectograms_to_kilograms(100), 10.0);
        assert_eq!(hectograms_to_kilograms(69), 6.9);
    }

    #[test]
    fn stats_follow_fixed_order_with_zero_for_missing() {
        let view = DetailView::derive(&sample(), Language::En, 0);
        let labels: Vec<_> = view.stats.iter().map(|stat| stat.label).collect();
        assert_eq!(
            labels,
            vec!["HP", "Attack", "Defense", "Sp.Atk", "Sp.Def", "Speed"]
        );
        let values: Vec<_> = view.stats.iter().map(|stat| stat.value).collect();
        assert_eq!(values, vec![45, 0, 0, 0, 0, 45]);
        assert_eq!(view.stat_total(), 90);
    }

    #[test]
    fn description_is_normalized_and_picked_by_roll() {
        let first = DetailView::derive(&sample(), Language::En, 0);
        assert_eq!(first.description, "A strange seed was planted on its back");
        let second = DetailView::derive(&sample(), Language::En, 3);
        assert_eq!(second.description, "Second entry");
    }

    #[test]
    fn missing_translation_falls_back() {
        let view = DetailView::derive(&sample(), Language::Fr, 0);
        assert!(!view.translated);
        assert_eq!(view.description, no_translation_message(Language::Fr));
        assert_eq!(view.display_name, "bulbasaur");

        let german = DetailView::derive(&sample(), Language::De, 0);
        assert_eq!(german.display_name, "Bisasam");
        assert_eq!(german.primary_type.as_deref(), Some("grass"));
    }
}
