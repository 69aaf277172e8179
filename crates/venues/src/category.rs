//! Closed category enumeration and its label/icon lookup table.
//!
//! Category labels come from the CMS as free text. They are resolved once at
//! ingestion; everything downstream works on `Category`.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Cafe,
    Patisserie,
    IceCream,
    Bakery,
    FastFood,
    Pub,
    Bar,
    Restaurant,
    Burgers,
    Pizza,
    Pasta,
    Ramen,
    Donuts,
    Breakfast,
    FoodCourt,
    Greek,
    Mexican,
    Polish,
    Italian,
    Turkish,
    Vietnamese,
    Japanese,
    Spanish,
    Thai,
    MiddleEastern,
    European,
    Asian,
    American,
    Neapolitan,
    /// Any label missing from the table.
    Other,
}

pub const FALLBACK_ICON: &str = "/assets/svg/emoji/rest.svg";

struct Entry {
    category: Category,
    label: &'static str,
    icon: &'static str,
}

const fn entry(category: Category, label: &'static str, icon: &'static str) -> Entry {
    Entry {
        category,
        label,
        icon,
    }
}

const TABLE: &[Entry] = &[
    entry(Category::Cafe, "Kawiarnia", "/assets/svg/emoji/coffee.svg"),
    entry(Category::Patisserie, "Cukiernia", "/assets/svg/emoji/cake.svg"),
    entry(Category::IceCream, "Lody", "/assets/svg/emoji/ice-cream.svg"),
    entry(Category::Bakery, "Piekarnia", "/assets/svg/emoji/bread.svg"),
    entry(Category::FastFood, "Fast food", "/assets/svg/emoji/fast-food.svg"),
    entry(Category::Pub, "Pub", "/assets/svg/emoji/pub.svg"),
    entry(Category::Bar, "Bar", "/assets/svg/emoji/bar.svg"),
    entry(Category::Restaurant, "Restauracja", "/assets/svg/emoji/restaurant.svg"),
    entry(Category::Burgers, "Hamburgery", "/assets/svg/emoji/burger.svg"),
    entry(Category::Pizza, "Pizza", "/assets/svg/emoji/pizza.svg"),
    entry(Category::Pasta, "Makaron", "/assets/svg/emoji/pasta.svg"),
    entry(Category::Ramen, "Ramen", "/assets/svg/emoji/ramen.svg"),
    entry(Category::Donuts, "Pączkarnia", "/assets/svg/emoji/donut.svg"),
    entry(Category::Breakfast, "Śniadania", "/assets/svg/emoji/breakfast.svg"),
    entry(Category::FoodCourt, "Strefa gastronomiczna", "/assets/svg/emoji/food-zone.svg"),
    entry(Category::Greek, "Kuchnia grecka", "/assets/svg/emoji/greek-cuisine.svg"),
    entry(Category::Mexican, "Kuchnia meksykańska", "/assets/svg/emoji/mexican-cuisine.svg"),
    entry(Category::Polish, "Kuchnia polska", "/assets/svg/emoji/polish-cuisine.svg"),
    entry(Category::Italian, "Kuchnia włoska", "/assets/svg/emoji/italian-cuisine.svg"),
    entry(Category::Turkish, "Kuchnia turecka", "/assets/svg/emoji/turkish-cuisine.svg"),
    entry(Category::Vietnamese, "Kuchnia wietnamska", "/assets/svg/emoji/vietnamese-cuisine.svg"),
    entry(Category::Japanese, "Kuchnia japońska", "/assets/svg/emoji/japanese-cuisine.svg"),
    entry(Category::Spanish, "Kuchnia hiszpańska", "/assets/svg/emoji/spanish-cuisine.svg"),
    entry(Category::Thai, "Kuchnia tajska", "/assets/svg/emoji/thai-cuisine.svg"),
    entry(Category::MiddleEastern, "Kuchnia bliskowschodnia", "/assets/svg/emoji/middle-eastern-cuisine.svg"),
    entry(Category::European, "Kuchnia europejska", "/assets/svg/emoji/european-cuisine.svg"),
    entry(Category::Asian, "Kuchnia azjatycka", "/assets/svg/emoji/asian-cuisine.svg"),
    entry(Category::American, "Kuchnia amerykańska", "/assets/svg/emoji/american-cuisine.svg"),
    entry(Category::Neapolitan, "Kuchnia neapolitańska", "/assets/svg/emoji/italian-cuisine.svg"),
];

/// Spelling variants seen in CMS data, resolved to a canonical category.
const ALIASES: &[(&str, Category)] = &[
    ("Pączkaria", Category::Donuts),
    ("Burgery", Category::Burgers),
    ("Makarony", Category::Pasta),
];

impl Category {
    /// Resolves a CMS label. Comparison ignores surrounding whitespace and case.
    pub fn from_label(label: &str) -> Category {
        let wanted = label.trim().to_lowercase();
        TABLE
            .iter()
            .map(|e| (e.label, e.category))
            .chain(ALIASES.iter().copied())
            .find(|(l, _)| l.to_lowercase() == wanted)
            .map(|(_, c)| c)
            .unwrap_or(Category::Other)
    }

    /// Canonical display label; `None` for `Other`.
    pub fn label(self) -> Option<&'static str> {
        self.entry().map(|e| e.label)
    }

    pub fn icon(self) -> &'static str {
        self.entry().map(|e| e.icon).unwrap_or(FALLBACK_ICON)
    }

    /// Every known category, in table order.
    pub fn all() -> impl Iterator<Item = Category> {
        TABLE.iter().map(|e| e.category)
    }

    fn entry(self) -> Option<&'static Entry> {
        TABLE.iter().find(|e| e.category == self)
    }
}
