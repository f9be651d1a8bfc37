use crate::icon::Icon;

/// Reserved id of the pseudo-category that lists saved articles.
pub const SAVED_CATEGORY_ID: &str = "saved";

/// A news topic, or the saved pseudo-category.
///
/// `name` doubles as the parameter sent to the gateway. Ids and names are
/// consumed by the navigation bar; the saved set is keyed independently of
/// them, so reordering the catalog needs no migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: Icon,
}

impl Category {
    /// True for the saved pseudo-category, which never hits the gateway.
    pub fn is_saved(&self) -> bool {
        self.id == SAVED_CATEGORY_ID
    }
}

/// The fixed navigation catalog. The first entry is the startup selection.
pub const CATEGORIES: [Category; 6] = [
    Category {
        id: "foryou",
        name: "For You",
        icon: Icon::Home,
    },
    Category {
        id: "world",
        name: "World",
        icon: Icon::Globe,
    },
    Category {
        id: "business",
        name: "Business",
        icon: Icon::Briefcase,
    },
    Category {
        id: "technology",
        name: "Technology",
        icon: Icon::Chip,
    },
    Category {
        id: "sports",
        name: "Sports",
        icon: Icon::Trophy,
    },
    Category {
        id: SAVED_CATEGORY_ID,
        name: "Saved",
        icon: Icon::Bookmark,
    },
];
