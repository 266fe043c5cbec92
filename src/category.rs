//! Transaction categories and how they are displayed.
//!
//! The backend encodes categories as integers: `-1` is uncategorized, small
//! non-negative integers are the built-in spending categories and user-defined
//! categories are offset by [CUSTOM_CATEGORY_OFFSET]. On our side they are a
//! [Category] so the offset arithmetic only happens at the serialization
//! boundary.

use serde::{Deserialize, Serialize};

use crate::database_id::CustomCategoryId;

/// The offset added to a custom category's database ID to get its code.
pub const CUSTOM_CATEGORY_OFFSET: i64 = 1000;

const UNCATEGORIZED_CODE: i64 = -1;

/// The code the category selector uses for "All categories".
const ANY_CATEGORY_CODE: i64 = -2;

const UNCATEGORIZED_NAME: &str = "Uncategorized";
const UNCATEGORIZED_ICON: &str = "❓";

/// Name and icon for each built-in category, indexed by category code.
const BUILT_IN_CATEGORIES: [(&str, &str); 38] = [
    ("Groceries", "🍎"),
    ("Restaurants", "🍴"),
    ("Software subs", "📅"),
    ("Travel", "✈️"),
    ("Airlines", "✈️"),
    ("Recreation", "⛵"),
    ("Gyms", "🏋️"),
    ("Transfer", "💵"),
    ("Deposit", "💵"),
    ("Income", "💵"),
    ("Credit card", "💵"),
    ("Fast food", "🍔"),
    ("Debit card", "💵"),
    ("Shops", "🛒"),
    ("Payment", "💵"),
    ("Coffee shop", "☕"),
    ("Taxi", "🚕"),
    ("Sporting goods", "⚽"),
    ("Electronics/software", "🔌"),
    ("Pets", "🐕"),
    ("Children", "🧒"),
    ("Mortgage and rent", "🏠"),
    ("Car", "🚗"),
    ("Home and garden", "🏡"),
    ("Medical", "☤"),
    ("Entertainment", "🎥"),
    ("Bills and utilities", "⚡"),
    ("Investments", "📈"),
    ("Fees", "💸"),
    ("Taxes", "🏛️"),
    ("Business services", "📈"),
    ("Cash and checks", "💵"),
    ("Gifts and donations", "🎁"),
    ("Education", "🎓"),
    ("Alcohol and bars", "🍺"),
    ("Health/personal care", "🛁"),
    ("Clothing", "👕"),
    ("Withdrawal", "💵"),
];

/// One of the fixed spending categories known to both client and backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuiltInCategory(u8);

impl BuiltInCategory {
    /// Bank and card fees. Rows in this category get a distinct background.
    pub const FEES: BuiltInCategory = BuiltInCategory(28);

    /// Look up the built-in category for `code`, if there is one.
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code)
            .ok()
            .filter(|index| (*index as usize) < BUILT_IN_CATEGORIES.len())
            .map(BuiltInCategory)
    }

    /// The integer code the backend uses for this category.
    pub fn code(self) -> i64 {
        self.0 as i64
    }

    /// The display name, e.g. "Groceries".
    pub fn name(self) -> &'static str {
        BUILT_IN_CATEGORIES[self.0 as usize].0
    }

    /// The emoji shown in place of the name when icons are enabled.
    pub fn icon(self) -> &'static str {
        BUILT_IN_CATEGORIES[self.0 as usize].1
    }

    /// All built-in categories in code order.
    pub fn all() -> impl Iterator<Item = BuiltInCategory> {
        (0..BUILT_IN_CATEGORIES.len() as u8).map(BuiltInCategory)
    }
}

/// The category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Category {
    /// The transaction has not been categorized.
    Uncategorized,
    /// One of the fixed spending categories.
    BuiltIn(BuiltInCategory),
    /// A user-defined category, holding its database ID (not its code).
    Custom(CustomCategoryId),
}

impl Category {
    /// The integer code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            Category::Uncategorized => UNCATEGORIZED_CODE,
            Category::BuiltIn(built_in) => built_in.code(),
            Category::Custom(id) => id + CUSTOM_CATEGORY_OFFSET,
        }
    }
}

impl From<i64> for Category {
    fn from(code: i64) -> Self {
        if code == UNCATEGORIZED_CODE {
            return Category::Uncategorized;
        }

        if code >= CUSTOM_CATEGORY_OFFSET {
            return Category::Custom(code - CUSTOM_CATEGORY_OFFSET);
        }

        match BuiltInCategory::from_code(code) {
            Some(built_in) => Category::BuiltIn(built_in),
            None => {
                tracing::warn!("Unknown category code {code}, treating it as uncategorized");
                Category::Uncategorized
            }
        }
    }
}

impl From<Category> for i64 {
    fn from(category: Category) -> Self {
        category.code()
    }
}

impl From<BuiltInCategory> for Category {
    fn from(built_in: BuiltInCategory) -> Self {
        Category::BuiltIn(built_in)
    }
}

/// A category created by the user on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCategory {
    /// The database ID of the category.
    pub id: CustomCategoryId,
    /// The display name.
    pub name: String,
}

/// The name and icon to show for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCategory<'a> {
    /// The display name.
    pub name: &'a str,
    /// An emoji for the category. Empty for custom categories.
    pub icon: &'static str,
}

impl ResolvedCategory<'_> {
    /// The icon followed by the name, as shown in category selectors.
    pub fn label(&self) -> String {
        format!("{}{}", self.icon, self.name)
    }
}

const UNCATEGORIZED: ResolvedCategory<'static> = ResolvedCategory {
    name: UNCATEGORIZED_NAME,
    icon: UNCATEGORIZED_ICON,
};

/// Resolve the display name and icon of `category`.
///
/// This never fails: a custom category that is missing from `custom_categories`
/// is logged and displayed as uncategorized.
pub fn resolve_category(
    category: Category,
    custom_categories: &[CustomCategory],
) -> ResolvedCategory<'_> {
    match category {
        Category::Uncategorized => UNCATEGORIZED,
        Category::BuiltIn(built_in) => ResolvedCategory {
            name: built_in.name(),
            icon: built_in.icon(),
        },
        Category::Custom(id) => match custom_categories.iter().find(|custom| custom.id == id) {
            Some(custom) => ResolvedCategory {
                name: &custom.name,
                icon: "",
            },
            None => {
                tracing::warn!(
                    "Could not resolve custom category {id} (code {})",
                    category.code()
                );
                UNCATEGORIZED
            }
        },
    }
}

/// The category selection used to filter transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum CategoryFilter {
    /// Match transactions in any category.
    #[default]
    Any,
    /// Match transactions that have this category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a transaction with `categories` passes this filter.
    pub fn matches(&self, categories: &[Category]) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Only(category) => categories.contains(category),
        }
    }
}

impl From<Option<i64>> for CategoryFilter {
    fn from(code: Option<i64>) -> Self {
        match code {
            None | Some(ANY_CATEGORY_CODE) => CategoryFilter::Any,
            Some(code) => CategoryFilter::Only(Category::from(code)),
        }
    }
}

impl From<CategoryFilter> for Option<i64> {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::Any => None,
            CategoryFilter::Only(category) => Some(category.code()),
        }
    }
}

/// An entry in a category selector.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOption {
    /// The category this option selects.
    pub category: Category,
    /// The text shown for the option.
    pub label: String,
}

/// Build the options for a category selector.
///
/// Custom categories come first, followed by the built-in categories sorted
/// by name. If `search` is not empty, only categories whose name contains it
/// (ignoring case) are kept.
pub fn category_options(custom_categories: &[CustomCategory], search: &str) -> Vec<CategoryOption> {
    let search = search.to_lowercase();
    let keep = |name: &str| search.is_empty() || name.to_lowercase().contains(&search);

    let custom = custom_categories
        .iter()
        .filter(|custom| keep(&custom.name))
        .map(|custom| CategoryOption {
            category: Category::Custom(custom.id),
            label: custom.name.clone(),
        });

    let mut built_in: Vec<(&str, CategoryOption)> = std::iter::once(Category::Uncategorized)
        .chain(BuiltInCategory::all().map(Category::BuiltIn))
        .map(|category| {
            let resolved = resolve_category(category, &[]);
            (
                resolved.name,
                CategoryOption {
                    category,
                    label: resolved.label(),
                },
            )
        })
        .filter(|(name, _)| keep(name))
        .collect();
    built_in.sort_by(|(a, _), (b, _)| a.cmp(b));

    custom
        .chain(built_in.into_iter().map(|(_, option)| option))
        .collect()
}
