use serde::{Deserialize, Serialize};

/// Content hash identifying one version of a menu item.
pub type MenuItemHash = String;

/// A meal period offered at a location (breakfast, lunch, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuType {
    pub slug: String,
    pub name: String,
    pub displayed: bool,
}

/// A dining location and the menu types it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub slug: String,
    pub name: String,
    pub menu_types: Vec<MenuType>,
    pub displayed: bool,
}

/// A dietary property a dish can carry (vegan, contains egg, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProperty {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub displayed: bool,
}

/// Serving size as served by the dining hall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingSize {
    pub amount: String,
    pub unit: String,
}

/// One row of a dish's nutrition table.
///
/// The server omits amounts it does not know, so `amount` stays optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFact {
    pub slug: String,
    pub amount: Option<String>,
}

/// A single dish with its nutrition profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub food_properties: Vec<String>,
    pub nutrition_information: Option<Vec<NutritionFact>>,
    pub ingredients: String,
    pub serving_size: ServingSize,
    pub hash: MenuItemHash,
}

/// A dish as it appeared on a specific date.
///
/// `latest_version` points at the newest revision of the same dish when the
/// server knows of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedMenuItem {
    pub menu_item: MenuItem,
    /// ISO 8601 date (`2023-12-31`)
    pub date: String,
    pub latest_version: Option<Box<DatedMenuItem>>,
}

/// A named section of a daily menu ("Breakfast Grill", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub name: String,
    pub menu_items: Vec<DatedMenuItem>,
}

/// The full menu for one location, menu type, and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// ISO 8601 date (`2023-12-31`)
    pub date: String,
    pub sections: Vec<MenuSection>,
}

/// One day of the monthly calendar view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyViewDay {
    pub day: String,
    pub has_menu_items: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_menu() {
        let json = r#"{
            "date": "2024-03-01",
            "sections": [
                {
                    "name": "Breakfast Grill",
                    "menu_items": [
                        {
                            "menu_item": {
                                "name": "Egg & Cheese Muffin",
                                "food_properties": ["egg"],
                                "nutrition_information": [
                                    {"slug": "calories", "amount": "238"},
                                    {"slug": "g_saturated_fat", "amount": null}
                                ],
                                "ingredients": "English Muffin, Egg, Cheese",
                                "serving_size": {"amount": "1", "unit": "each"},
                                "hash": "ab12"
                            },
                            "date": "2024-03-01",
                            "latest_version": null
                        }
                    ]
                }
            ]
        }"#;

        let menu: Menu = serde_json::from_str(json).unwrap();
        assert_eq!(menu.sections.len(), 1);
        let entry = &menu.sections[0].menu_items[0];
        assert_eq!(entry.menu_item.name, "Egg & Cheese Muffin");
        assert_eq!(
            entry.menu_item.nutrition_information.as_ref().unwrap()[1].amount,
            None
        );
        assert!(entry.latest_version.is_none());
    }

    #[test]
    fn test_deserialize_locations() {
        let json = r#"[{
            "slug": "dewick-dining",
            "name": "Dewick-MacPhie Dining Center",
            "menu_types": [{"slug": "breakfast", "name": "Breakfast", "displayed": true}],
            "displayed": true
        }]"#;

        let locations: Vec<Location> = serde_json::from_str(json).unwrap();
        assert_eq!(locations[0].menu_types[0].slug, "breakfast");
    }
}
